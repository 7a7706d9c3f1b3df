use lazy_static::lazy_static;
use regex::Regex;

use crate::content::escape_html;
use crate::wxr::Comment;

lazy_static! {
    // Likes slurped in by a Facebook cross-posting plugin
    static ref FACEBOOK_LIKE_REGEX: Regex = Regex::new(r"liked this on Facebook\.").unwrap();
    static ref TAG_REGEX: Regex = Regex::new(r"<[^<]+?>").unwrap();
}

pub fn strip_tags(html: &str) -> String {
    TAG_REGEX.replace_all(html, "").to_string()
}

/// Renders the approved comments under a `Comments (<n>)` heading.
/// No approved comment means no markup at all, not an empty heading.
pub fn render_comments(comments: &[Comment]) -> String {
    let approved: Vec<&Comment> = comments.iter().filter(|c| c.approved).collect();
    if approved.is_empty() {
        return String::new();
    }

    let mut buf = format!("<h3>Comments ({})</h3>", approved.len());

    for comment in approved {
        let author = escape_html(&comment.author);
        if FACEBOOK_LIKE_REGEX.is_match(&comment.body) {
            buf.push_str(&format!("<div class=\"comment\"><p><strong>{}</strong> gave this a <strong>LIKE</strong> on Facebook!</p></div>", author));
        } else {
            buf.push_str(&format!("<div class=\"comment\"><p><strong>{}</strong> on {}:</p>", author, comment.date));
            buf.push_str(&format!("<p>{}</p></div>", strip_tags(&comment.body)));
        }
    }

    buf
}
