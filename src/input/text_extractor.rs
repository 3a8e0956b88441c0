//! Text extraction from various file formats

use crate::error::{AtsError, Result};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tokio::fs;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>").expect("Invalid script regex")
});
static LINE_BREAK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|ul|ol|h[1-6]|tr|section|article)\s*>")
        .expect("Invalid line break regex")
});
static LIST_ITEM_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li\b[^>]*>").expect("Invalid list item regex"));
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

/// Reduce HTML (or markup-bearing text) to plain text.
///
/// Block-level closing tags become line breaks and list items become `- `
/// bullets so the structure survives for later classification.
pub fn strip_markup(markup: &str) -> String {
    let text = SCRIPT_OR_STYLE.replace_all(markup, "");
    let text = LIST_ITEM_TAG.replace_all(&text, "\n- ");
    let text = LINE_BREAK_TAG.replace_all(&text, "\n");
    let text = ANY_TAG.replace_all(&text, "");

    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&bull;", "•")
        .replace("&amp;", "&");

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(AtsError::Io)?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            AtsError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;
        Ok(text)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await.map_err(AtsError::Io)?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await.map_err(AtsError::Io)?;

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(strip_markup(&html_output))
    }
}

pub struct HtmlExtractor;

impl TextExtractor for HtmlExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await.map_err(AtsError::Io)?;
        Ok(strip_markup(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_keeps_list_structure() {
        let html = "<h2>Skills</h2><ul><li>Python</li><li>AWS &amp; GCP</li></ul><p>Apply&nbsp;now</p>";
        assert_eq!(strip_markup(html), "Skills\n- Python\n- AWS & GCP\nApply now");
    }

    #[test]
    fn test_strip_markup_decodes_entities_once() {
        assert_eq!(strip_markup("<p>&amp;lt;br&amp;gt; &lt;tag&gt; R&amp;D</p>"), "&lt;br&gt; <tag> R&D");
    }

    #[test]
    fn test_strip_markup_drops_scripts() {
        let html = "<script>var x = '<b>';</script><div>Rust</div><style>p { color: red }</style>";
        assert_eq!(strip_markup(html), "Rust");
    }

    #[test]
    fn test_strip_markup_plain_text_passthrough() {
        assert_eq!(strip_markup("Senior engineer\n\n  Python"), "Senior engineer\nPython");
    }
}
