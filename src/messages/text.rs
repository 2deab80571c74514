// src/messages/text.rs
// =============================================================================
// Finds URLs in plain text, with or without a scheme.
//
// - "https://example.com/a" is always taken
// - "example.com/a" is taken only when its host ends in a public suffix
//   known to the Public Suffix List (so "main.foo" is skipped but "rust-lang.org"
//   is not)
// - both halves of an e-mail address are skipped
// - trailing sentence punctuation and unbalanced closing brackets are trimmed
// =============================================================================

use std::sync::OnceLock;

use regex::Regex;

const URL_PATTERN: &str = r#"(?i)\bhttps?://[^\s<>"'`]+|\b(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,63}(?::\d{1,5})?(?:[/?#][^\s<>"'`]*)?"#;

fn url_regex() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| Regex::new(URL_PATTERN).expect("URL pattern is a valid regex"))
}

pub fn extract_text_urls(text: &str) -> Vec<String> {
    let mut urls = Vec::new();

    for found in url_regex().find_iter(text) {
        // first.name@example.com: neither side of the '@' is a link
        if text[..found.start()].ends_with('@') || text[found.end()..].starts_with('@') {
            continue;
        }

        let candidate = trim_trailing(found.as_str());
        let has_scheme = has_http_scheme(candidate);

        if has_scheme || has_known_suffix(candidate) {
            urls.push(candidate.to_string());
        }
    }

    urls
}

fn has_http_scheme(candidate: &str) -> bool {
    let lower = candidate.get(..8).unwrap_or(candidate).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn has_known_suffix(candidate: &str) -> bool {
    let host = candidate
        .split(['/', '?', '#', ':'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    psl::suffix(host.as_bytes()).is_some_and(|suffix| suffix.is_known())
}

// Drops punctuation that belongs to the surrounding sentence
//
// "(see example.com/page)." -> "example.com/page"
// "en.wikipedia.org/wiki/Rust_(language)" is kept whole
fn trim_trailing(candidate: &str) -> &str {
    let mut end = candidate.len();

    loop {
        let current = &candidate[..end];
        let Some(last) = current.chars().last() else {
            break;
        };

        let unbalanced = match last {
            ')' => current.matches(')').count() > current.matches('(').count(),
            ']' => current.matches(']').count() > current.matches('[').count(),
            '}' => current.matches('}').count() > current.matches('{').count(),
            '.' | ',' | ';' | ':' | '!' | '?' => true,
            _ => false,
        };

        if !unbalanced {
            break;
        }
        end -= last.len_utf8();
    }

    &candidate[..end]
}
