//! Parsed HTML page wrapper exposing the three views the crawler needs:
//! hyperlink targets, visible-text tokens, and the structural tag count.

use scraper::{Html, Selector};

use crate::tokens::tokenize;

/// A parsed HTML document.
///
/// Not `Send`: parse, extract what you need, and drop it before the next
/// `.await`.
pub struct ParsedPage {
    document: Html,
}

impl ParsedPage {
    pub fn parse(content: &str) -> Self {
        Self {
            document: Html::parse_document(content),
        }
    }

    /// Raw `href` targets of every element carrying one, in document order.
    pub fn links(&self) -> Vec<String> {
        let selector = Selector::parse("[href]").expect("invalid CSS selector");

        self.document
            .select(&selector)
            .filter_map(|el| el.value().attr("href"))
            .map(|href| href.trim().to_string())
            .collect()
    }

    /// Lowercase alphanumeric tokens of all text content.
    pub fn text_tokens(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        for text in self.document.root_element().text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                tokens.extend(tokenize(trimmed));
            }
        }
        tokens
    }

    /// Number of element nodes in the document.
    pub fn tag_count(&self) -> usize {
        let selector = Selector::parse("*").expect("invalid CSS selector");
        self.document.select(&selector).count()
    }
}
