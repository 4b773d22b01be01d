use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the global subscriber. Levels come from `ANSWERDB_LOG`
/// (e.g. `ANSWERDB_LOG=answerdb_engine=debug,answerdb_nlp=info`), falling back
/// to `answerdb=info`. Output goes to stderr so answers on stdout stay clean.
/// Calling it again is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("ANSWERDB_LOG").unwrap_or_else(|_| EnvFilter::new("answerdb=info"));
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
