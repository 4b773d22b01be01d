//! Answer text rendering.
//!
//! An answer is the document's passages joined by newlines, followed by a
//! line naming its source. Every link label found in that text is replaced by
//! a rendered link; the document's own `(title, url)` pair is treated as one
//! more link, so the trailing source line always points at the page the
//! answer came from.

use answerdb_core::types::{Document, Link, RenderStyle};

#[derive(Debug, Clone, Default)]
pub struct AnswerFormatter {
    source_link_prefix: String,
}

impl AnswerFormatter {
    pub fn new(source_link_prefix: impl Into<String>) -> Self {
        Self { source_link_prefix: source_link_prefix.into() }
    }

    pub fn format(&self, doc: &Document, style: RenderStyle) -> String {
        let mut body = doc.texts.join("\n");
        body.push('\n');
        body.push_str(&self.source_link_prefix);
        body.push_str(&doc.title);

        let source = Link::new(doc.title.clone(), doc.url.clone());
        let links: Vec<&Link> = doc.links.iter().chain(std::iter::once(&source)).collect();
        render_links(&body, &links, style)
    }
}

pub fn render_link(link: &Link, style: RenderStyle) -> String {
    match style {
        RenderStyle::Plain => format!("{} ({})", link.label, link.url),
        RenderStyle::Markup => format!("<a href='{}' target='_blank'>{}</a>", link.url, link.label),
    }
}

/// Replace label occurrences in one left-to-right pass, trying longer labels
/// first. Text produced by a replacement is never scanned again. Links with
/// an empty label or url are ignored.
pub fn render_links(text: &str, links: &[&Link], style: RenderStyle) -> String {
    let mut ordered: Vec<&Link> =
        links.iter().copied().filter(|l| !l.label.is_empty() && !l.url.is_empty()).collect();
    ordered.sort_by(|a, b| b.label.len().cmp(&a.label.len()));

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        match ordered.iter().find(|l| rest.starts_with(l.label.as_str())) {
            Some(link) => {
                out.push_str(&render_link(link, style));
                rest = &rest[link.label.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}
