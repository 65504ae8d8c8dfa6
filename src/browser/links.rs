//! Anchor extraction from rendered HTML

use scraper::{Html, Selector};

/// Returns the raw `href` of every `<a>` element in the document
///
/// Hrefs are returned unresolved and in document order. Anchors carrying a
/// `download` attribute are skipped since following them never renders a page.
///
/// # Example
///
/// ```
/// use cookie_ripple::browser::extract_hrefs;
///
/// let html = r#"<a href="/about">About</a><a href="/report.pdf" download>PDF</a>"#;
/// assert_eq!(extract_hrefs(html), vec!["/about".to_string()]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut hrefs = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                hrefs.push(href.to_string());
            }
        }
    }

    hrefs
}
