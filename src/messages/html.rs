// src/messages/html.rs
// =============================================================================
// This module extracts links from HTML-formatted messages.
//
// We use the `scraper` crate which:
// - Parses HTML fragments into a DOM
// - Supports CSS selectors for finding elements
// - Decodes entities, so href="https://a.com/?x=1&amp;y=2" comes back with '&'
//
// Messages have no base URL, so relative hrefs are dropped.
// =============================================================================

use scraper::{Html, Selector};

// Extracts absolute HTTP/HTTPS hrefs from <a> tags
//
// Example:
//   html = "<a href='https://example.com/docs'>Docs</a>"
//   result = ["https://example.com/docs"]
pub fn extract_html_links(html: &str) -> Vec<String> {
    let document = Html::parse_fragment(html);

    // The selector is a constant and known to be valid
    let selector = Selector::parse("a[href]").expect("static selector is valid");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| is_checkable_link(href))
        .map(str::to_string)
        .collect()
}

fn is_checkable_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// The visible text of the fragment, tags and attributes removed
//
// Text nodes are joined with a space so words from neighbouring elements
// never run together.
pub fn html_text(html: &str) -> String {
    let document = Html::parse_fragment(html);
    document.root_element().text().collect::<Vec<_>>().join(" ")
}

// Cheap pre-check so plain messages never go through the parser
pub fn looks_like_html(text: &str) -> bool {
    text.contains("<a ") || text.contains("<A ")
}
