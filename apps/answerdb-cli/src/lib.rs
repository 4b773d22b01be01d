//! Composition root shared by the `answerdb` binary and its tests.

pub mod app;
pub mod ingest;
pub mod logging;

pub use app::App;
