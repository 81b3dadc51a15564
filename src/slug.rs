use chrono::{DateTime, Utc};
use deunicode::deunicode;

/// slugify
///
/// Transliterates to ASCII, lowercases, drops punctuation and joins words with
/// single dashes: `"Yapay Zekâ & Görüntü İşleme"` becomes
/// `"yapay-zeka-goruntu-isleme"`. Underscores survive.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text).to_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        }
    }
    slug
}

/// Disambiguates an already-taken slug with the unix timestamp of `now`.
pub fn with_timestamp_suffix(slug: &str, now: DateTime<Utc>) -> String {
    format!("{slug}-{}", now.timestamp())
}
