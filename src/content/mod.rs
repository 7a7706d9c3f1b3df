use spdlog::warn;

use crate::wxr::ContentItem;

pub mod captions;
pub mod comments;
pub mod paragraphs;
pub mod urls;

pub use captions::expand_captions;
pub use comments::render_comments;
pub use paragraphs::wrap_paragraphs;
pub use urls::{find_site_references, localize_asset_urls};

/// Turns the raw `content:encoded` body into HTML ready for layout.
pub fn normalize_body(raw: &str, site_url: &str) -> String {
    let content = expand_captions(raw);
    let content = localize_asset_urls(&content, site_url);

    // Links back to the live site survive localization and may need a manual look
    for reference in find_site_references(&content, site_url) {
        warn!("Found URL: {}", reference);
    }

    wrap_paragraphs(&content)
}

/// Body followed by the comment thread, the markup laid out under an item heading.
pub fn render_item_html(item: &ContentItem, site_url: &str) -> String {
    let mut html = normalize_body(&item.body, site_url);
    html.push_str(&render_comments(&item.comments));
    html
}

/// Minimal escaping for text that ends up inside generated markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
