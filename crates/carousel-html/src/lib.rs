//! Carousel HTML loader
//!
//! Parses markup with html5ever and converts the result into a
//! [`carousel_dom::DomTree`], so pages can be inspected and tested without a
//! browser.

mod parser;

pub use parser::HtmlParser;

use carousel_dom::DomTree;

/// Parse an HTML string into an element tree
pub fn parse(html: &str) -> Result<DomTree, HtmlError> {
    HtmlParser::new().parse(html)
}

/// HTML loading error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),
}
