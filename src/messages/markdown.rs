// src/messages/markdown.rs
// =============================================================================
// This module extracts link destinations from Markdown-formatted messages.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Is a streaming parser, so nothing is built up in memory
//
// Link destinations come from extract_markdown_links. The rendered text,
// with link syntax removed, comes from markdown_text and is what the
// plain-text scanner sees.
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};

// Extracts HTTP/HTTPS link destinations from Markdown text
//
// Example input:
//   "Check out [Rust](https://www.rust-lang.org)!"
//
// Example output:
//   vec!["https://www.rust-lang.org"]
pub fn extract_markdown_links(markdown: &str) -> Vec<String> {
    let mut links = Vec::new();

    for event in Parser::new(markdown) {
        // In pulldown-cmark 0.9, Link is Tag::Link(link_type, dest_url, title)
        if let Event::Start(Tag::Link(_link_type, dest_url, _title)) = event {
            let url = dest_url.trim();
            if is_http_link(url) {
                links.push(url.to_string());
            }
        }
    }

    links
}

// The text a reader would see, without link destinations or other syntax
//
// Consecutive text events are glued back together (the parser may split one
// run of text into several events). Everything else becomes a space.
pub fn markdown_text(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());

    for event in Parser::new(markdown) {
        match event {
            Event::Text(chunk) | Event::Code(chunk) => text.push_str(&chunk),
            _ => text.push(' '),
        }
    }

    text
}

// Skips mailto:, tel:, relative paths and anchors
fn is_http_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// Cheap pre-check so plain messages never go through the parser
pub fn looks_like_markdown(text: &str) -> bool {
    text.contains("](") || text.contains("<http")
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why only the Start event?
//    - pulldown-cmark emits Start(Link), then the link text, then End(Link)
//    - The destination is already complete on Start, so End is not needed
//
// 2. What about URLs in the link text?
//    - Text like "[click here](...)" carries no URL
//    - In "[bit.ly/x](https://bit.ly/x)" the text scanner runs on
//      markdown_text, so it sees " bit.ly/x " and never the raw "](" syntax
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_link() {
        let markdown = "Check out [Rust](https://www.rust-lang.org)!";
        let links = extract_markdown_links(markdown);
        assert_eq!(links, vec!["https://www.rust-lang.org"]);
    }

    #[test]
    fn test_destination_with_parentheses() {
        let markdown = "[wiki](https://en.wikipedia.org/wiki/Rust_(programming_language))";
        let links = extract_markdown_links(markdown);
        assert_eq!(
            links,
            vec!["https://en.wikipedia.org/wiki/Rust_(programming_language)"]
        );
    }

    #[test]
    fn test_autolink() {
        let links = extract_markdown_links("short link: <https://bit.ly/abc>");
        assert_eq!(links, vec!["https://bit.ly/abc"]);
    }

    #[test]
    fn test_skip_mailto_and_relative_links() {
        let markdown = "Email [me](mailto:test@example.com) or see [docs](./docs/README.md)";
        assert!(extract_markdown_links(markdown).is_empty());
    }

    #[test]
    fn test_markdown_text_strips_link_syntax() {
        let text = markdown_text("see [bit.ly/x](https://bit.ly/x) now");
        assert!(text.contains("bit.ly/x"));
        assert!(!text.contains("]("));
        assert!(!text.contains("https://"));
    }

    #[test]
    fn test_looks_like_markdown() {
        assert!(looks_like_markdown("[a](https://b.com)"));
        assert!(!looks_like_markdown("just text with bit.ly/x"));
    }
}
