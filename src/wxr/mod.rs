use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::DateTime;
use chrono_tz::Tz;

use crate::text_utils::{format_date_range, format_long_date_time};

pub mod parser;

pub use parser::{parse_wxr, parse_wxr_str};

pub const NO_TITLE: &str = "No Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Channel level data, built once per export.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogMetadata {
    pub title: String,
    pub description: String,
    pub url: String,
    pub date_range: Option<(DateTime<Tz>, DateTime<Tz>)>,
}

impl BlogMetadata {
    /// `January 1, 2021 - December 31, 2021`, or `N/A` when no item carries a usable date.
    pub fn date_range_label(&self) -> String {
        format_date_range(self.date_range.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Post,
    Page,
}

impl ItemKind {
    pub fn from_post_type(post_type: &str) -> Option<ItemKind> {
        match post_type.trim() {
            "post" => Some(ItemKind::Post),
            "page" => Some(ItemKind::Page),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub author: String,
    pub body: String,
    /// Already localized, e.g. `Saturday, January 2, 2021 @ 10:05 AM`
    pub date: String,
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub title: String,
    pub author: String,
    pub date: Option<DateTime<Tz>>,
    pub body: String,
    pub kind: ItemKind,
    pub comments: Vec<Comment>,
}

impl ContentItem {
    pub fn byline(&self) -> String {
        match self.date {
            Some(ref date) => format!("By {} on {}", self.author, format_long_date_time(date)),
            None => format!("By {}", self.author),
        }
    }
}

impl Display for ContentItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "kind={:?}, title={}, author={}, comments={}",
               self.kind,
               self.title,
               self.author,
               self.comments.len()
        )
    }
}

/// Everything the document needs, posts and pages kept in export order.
#[derive(Debug, Clone)]
pub struct Export {
    pub metadata: BlogMetadata,
    pub posts: Vec<ContentItem>,
    pub pages: Vec<ContentItem>,
}

impl Export {
    pub fn item_count(&self) -> usize {
        self.posts.len() + self.pages.len()
    }
}
