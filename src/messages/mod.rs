// src/messages/mod.rs
// =============================================================================
// Everything between the message file on disk and the canonical URL set.
//
// Submodules:
// - load: read the JSON / JSON Lines message store, apply the message limit
// - text: URLs written directly in the text (with or without a scheme)
// - markdown: destinations of Markdown links
// - html: hrefs of HTML anchors
//
// The canonical input of the resolver is a BTreeSet: de-duplicated and in
// sorted order, holding URLs exactly as they were written in the messages.
// =============================================================================

mod html;
mod load;
mod markdown;
mod text;

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde_json::Value;
use tracing::{debug, info};

pub use load::{apply_limit, load_messages};

use load::message_text;

use crate::resolve::PREVIEW_LEN;

// All URLs found in one message
//
// Link targets come from the parsers. The plain-text scanner only sees what
// is left once markup is rendered away, so "](", tags and entities never end
// up inside a URL.
pub fn extract_urls(text: &str) -> BTreeSet<String> {
    let mut urls = BTreeSet::new();
    let mut visible = Cow::Borrowed(text);

    if html::looks_like_html(text) {
        urls.extend(html::extract_html_links(text));
        visible = Cow::Owned(html::html_text(&visible));
    }
    if markdown::looks_like_markdown(text) {
        urls.extend(markdown::extract_markdown_links(text));
        visible = Cow::Owned(markdown::markdown_text(&visible));
    }

    urls.extend(text::extract_text_urls(&visible));
    urls
}

// Union of the URLs of every message
pub fn collect_urls(messages: &[Value]) -> BTreeSet<String> {
    info!(messages = messages.len(), "extracting URLs");

    let mut all_urls = BTreeSet::new();
    for (index, message) in messages.iter().enumerate() {
        let found = extract_urls(&message_text(message));
        if !found.is_empty() {
            debug!(message = index + 1, urls = found.len(), "URLs found in message");
            all_urls.extend(found);
        }
    }

    if all_urls.is_empty() {
        info!("no URLs found in messages");
    } else {
        info!(unique = all_urls.len(), "unique URLs found");
        for url in all_urls.iter().take(PREVIEW_LEN) {
            info!("  - {url}");
        }
    }

    all_urls
}
