use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::DateTime;
use chrono_tz::Tz;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use spdlog::{debug, info, warn};

use crate::error::{ConvertError, Result};
use crate::text_utils::{format_long_date_time, parse_comment_date, parse_pub_date, COMMENT_TIMEZONE};
use crate::wxr::{BlogMetadata, Comment, ContentItem, Export, ItemKind, NO_TITLE, UNKNOWN_AUTHOR, UNKNOWN_DATE};

// WXR 1.0, 1.1 and 1.2 only differ in the version segment
const WP_NS_PREFIX: &[u8] = b"http://wordpress.org/export/";
const DC_NS: &[u8] = b"http://purl.org/dc/elements/1.1/";
const CONTENT_NS: &[u8] = b"http://purl.org/rss/1.0/modules/content/";

const PUBLISHED: &str = "publish";
const APPROVED: &str = "1";
const ZERO_DATE: &str = "0000-00-00 00:00:00";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ns {
    None,
    Wp,
    Dc,
    Content,
    Other,
}

impl Ns {
    fn classify(res: &ResolveResult) -> Ns {
        match res {
            ResolveResult::Unbound => Ns::None,
            ResolveResult::Bound(Namespace(uri)) if uri.starts_with(WP_NS_PREFIX) => Ns::Wp,
            ResolveResult::Bound(Namespace(uri)) if *uri == DC_NS => Ns::Dc,
            ResolveResult::Bound(Namespace(uri)) if *uri == CONTENT_NS => Ns::Content,
            _ => Ns::Other,
        }
    }
}

#[derive(Default)]
struct RawAuthor {
    login: Option<String>,
    display_name: Option<String>,
}

#[derive(Default)]
struct RawComment {
    author: Option<String>,
    content: Option<String>,
    date: Option<String>,
    date_gmt: Option<String>,
    approved: Option<String>,
}

#[derive(Default)]
struct RawItem {
    title: Option<String>,
    creator: Option<String>,
    pub_date: Option<String>,
    content: Option<String>,
    post_type: Option<String>,
    status: Option<String>,
    comments: Vec<RawComment>,
}

/// Collects the raw strings of the export while the reader walks it.
#[derive(Default)]
struct WxrBuilder {
    title: Option<String>,
    description: Option<String>,
    base_url: Option<String>,
    authors: Vec<RawAuthor>,
    items: Vec<RawItem>,

    author: Option<RawAuthor>,
    item: Option<RawItem>,
    comment: Option<RawComment>,
}

impl WxrBuilder {
    fn open(&mut self, ns: Ns, name: &str) {
        match (ns, name) {
            (Ns::None, "item") => self.item = Some(RawItem::default()),
            (Ns::Wp, "comment") if self.item.is_some() => self.comment = Some(RawComment::default()),
            (Ns::Wp, "author") if self.item.is_none() => self.author = Some(RawAuthor::default()),
            _ => {}
        }
    }

    fn close(&mut self, ns: Ns, name: &str, in_channel: bool, text: String) {
        match (ns, name) {
            (Ns::None, "item") => {
                if let Some(item) = self.item.take() {
                    self.items.push(item);
                }
            }
            (Ns::Wp, "comment") if self.comment.is_some() => {
                if let (Some(comment), Some(item)) = (self.comment.take(), self.item.as_mut()) {
                    item.comments.push(comment);
                }
            }
            (Ns::Wp, "author") if self.author.is_some() => {
                if let Some(author) = self.author.take() {
                    self.authors.push(author);
                }
            }
            _ => self.assign(ns, name, in_channel, text),
        }
    }

    fn assign(&mut self, ns: Ns, name: &str, in_channel: bool, text: String) {
        if let Some(comment) = self.comment.as_mut() {
            match (ns, name) {
                (Ns::Wp, "comment_author") => comment.author = Some(text),
                (Ns::Wp, "comment_content") => comment.content = Some(text),
                (Ns::Wp, "comment_date") => comment.date = Some(text),
                (Ns::Wp, "comment_date_gmt") => comment.date_gmt = Some(text),
                (Ns::Wp, "comment_approved") => comment.approved = Some(text),
                _ => {}
            }
            return;
        }

        if let Some(author) = self.author.as_mut() {
            match (ns, name) {
                (Ns::Wp, "author_login") => author.login = Some(text),
                (Ns::Wp, "author_display_name") => author.display_name = Some(text),
                _ => {}
            }
            return;
        }

        if let Some(item) = self.item.as_mut() {
            match (ns, name) {
                (Ns::None, "title") => item.title = Some(text),
                (Ns::None, "pubDate") => item.pub_date = Some(text),
                (Ns::Dc, "creator") => item.creator = Some(text),
                (Ns::Content, "encoded") => item.content = Some(text),
                (Ns::Wp, "post_type") => item.post_type = Some(text),
                (Ns::Wp, "status") => item.status = Some(text),
                _ => {}
            }
            return;
        }

        match (ns, name) {
            (Ns::None, "title") if in_channel => self.title = Some(text),
            (Ns::None, "description") if in_channel => self.description = Some(text),
            (Ns::Wp, "base_blog_url") => self.base_url = Some(text),
            _ => {}
        }
    }

    fn build(self, tz: &Tz) -> Result<Export> {
        let url = match self.base_url {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => return Err(ConvertError::MissingBaseUrl),
        };

        let author_map: HashMap<String, String> = self.authors.into_iter()
            .filter_map(|author| match (author.login, author.display_name) {
                (Some(login), Some(display_name)) => Some((login.trim().to_string(), display_name.trim().to_string())),
                _ => None,
            })
            .collect();

        let mut posts = vec![];
        let mut pages = vec![];
        let mut first: Option<DateTime<Tz>> = None;
        let mut last: Option<DateTime<Tz>> = None;

        for raw in self.items {
            let Some(item) = build_item(raw, &author_map, tz) else {
                continue;
            };

            if let Some(date) = item.date {
                first = Some(first.map_or(date, |d| d.min(date)));
                last = Some(last.map_or(date, |d| d.max(date)));
            }

            match item.kind {
                ItemKind::Post => posts.push(item),
                ItemKind::Page => pages.push(item),
            }
        }

        let metadata = BlogMetadata {
            title: non_empty(self.title).unwrap_or_else(|| NO_TITLE.to_string()),
            description: non_empty(self.description).unwrap_or_default(),
            url,
            date_range: first.zip(last),
        };

        Ok(Export {
            metadata,
            posts,
            pages,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn build_item(raw: RawItem, author_map: &HashMap<String, String>, tz: &Tz) -> Option<ContentItem> {
    let title = non_empty(raw.title).unwrap_or_else(|| NO_TITLE.to_string());

    let (Some(post_type), Some(status)) = (raw.post_type, raw.status) else {
        debug!("Item without type or status skipped: Title = {}", title);
        return None;
    };

    let Some(kind) = ItemKind::from_post_type(&post_type) else {
        debug!("Item of type {} skipped: Title = {}", post_type, title);
        return None;
    };

    // Anything else, including statuses unknown to this version, is left out
    if status.trim() != PUBLISHED {
        info!("Unpublished item skipped: Title = {}, Status = {}", title, status);
        return None;
    }

    let author = raw.creator
        .and_then(|login| author_map.get(login.trim()).cloned())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    let date = match raw.pub_date {
        Some(ref pub_date) => match parse_pub_date(pub_date, tz) {
            Ok(date) => Some(date),
            Err(e) => {
                warn!("{} - title={}", e, title);
                None
            }
        },
        None => None,
    };

    let comments = raw.comments.into_iter()
        .filter_map(build_comment)
        .collect();

    Some(ContentItem {
        title,
        author,
        date,
        body: raw.content.unwrap_or_default(),
        kind,
        comments,
    })
}

fn build_comment(raw: RawComment) -> Option<Comment> {
    if raw.approved.as_deref().map(str::trim) != Some(APPROVED) {
        return None;
    }

    // The GMT column is authoritative; the local one is read as UTC when it is all we have
    let parsed = raw.date_gmt.as_deref()
        .filter(|d| d.trim() != ZERO_DATE)
        .and_then(|d| parse_comment_date(d).ok())
        .or_else(|| raw.date.as_deref().and_then(|d| parse_comment_date(d).ok()));

    let date = match parsed {
        Some(date) => format_long_date_time(&date.with_timezone(&COMMENT_TIMEZONE)),
        None => UNKNOWN_DATE.to_string(),
    };

    Some(Comment {
        author: raw.author.map(|a| a.trim().to_string()).unwrap_or_default(),
        body: raw.content.unwrap_or_default(),
        date,
        approved: true,
    })
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn text_of(t: &BytesText) -> String {
    match t.unescape() {
        Ok(text) => text.into_owned(),
        // HTML entities such as &nbsp; are not XML entities, keep them for the HTML stage
        Err(_) => String::from_utf8_lossy(t).into_owned(),
    }
}

fn is_channel(element: Option<&(Ns, String)>) -> bool {
    matches!(element, Some((Ns::None, name)) if name == "channel")
}

/// Parses a WXR document held in memory, converting item dates into `tz`.
pub fn parse_wxr_str(xml: &str, tz: &Tz) -> Result<Export> {
    let mut reader = NsReader::from_str(xml);
    let mut builder = WxrBuilder::default();
    let mut stack: Vec<(Ns, String)> = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_resolved_event() {
            Ok((res, Event::Start(e))) => {
                let ns = Ns::classify(&res);
                let name = local_name(&e);
                builder.open(ns, &name);
                stack.push((ns, name));
                text.clear();
            }
            Ok((res, Event::Empty(e))) => {
                let ns = Ns::classify(&res);
                let name = local_name(&e);
                builder.open(ns, &name);
                builder.close(ns, &name, is_channel(stack.last()), String::new());
                text.clear();
            }
            Ok((_, Event::Text(t))) => text.push_str(&text_of(&t)),
            Ok((_, Event::CData(c))) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Ok((_, Event::End(_))) => {
                let Some((ns, name)) = stack.pop() else {
                    return Err(ConvertError::MalformedInput("unexpected closing tag".to_string()));
                };
                builder.close(ns, &name, is_channel(stack.last()), std::mem::take(&mut text));
            }
            Ok((_, Event::Eof)) => break,
            Err(e) => return Err(ConvertError::MalformedInput(e.to_string())),
            _ => {}
        }
    }

    if let Some((_, name)) = stack.last() {
        return Err(ConvertError::MalformedInput(format!("document ends inside <{}>", name)));
    }

    if builder.items.is_empty() && builder.base_url.is_none() && builder.title.is_none() {
        return Err(ConvertError::MalformedInput("no RSS channel found".to_string()));
    }

    builder.build(tz)
}

/// Reads and parses the export at `file_path`.
pub fn parse_wxr(file_path: &Path, tz: &Tz) -> Result<Export> {
    let xml = fs::read_to_string(file_path)?;
    info!("Parsing WXR export {}", file_path.display());
    let export = parse_wxr_str(&xml, tz)?;
    info!("Found {} posts and {} pages", export.posts.len(), export.pages.len());
    Ok(export)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::test_data::{WXR_EXPORT, WXR_NO_BASE_URL};
    use crate::text_utils::{parse_timezone, DEFAULT_TIMEZONE};

    use super::*;

    fn la() -> Tz {
        parse_timezone(DEFAULT_TIMEZONE).unwrap()
    }

    #[test]
    fn test_channel_metadata() {
        let export = parse_wxr_str(WXR_EXPORT, &la()).unwrap();
        let meta = &export.metadata;
        assert_eq!(meta.title, "Ferg's Notes");
        assert_eq!(meta.description, "Things I wrote down");
        assert_eq!(meta.url, "https://example.com");
        assert_eq!(meta.date_range_label(), "January 1, 2021 - December 31, 2021");
    }

    #[test]
    fn test_only_published_posts_and_pages() {
        let export = parse_wxr_str(WXR_EXPORT, &la()).unwrap();
        // 2 published posts, 1 published page; the draft, the attachment and the
        // item of unknown status are dropped
        assert_eq!(export.item_count(), 3);
        let titles: Vec<&str> = export.posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Hello World", "Year in Review"]);
        assert_eq!(export.pages.len(), 1);
        assert_eq!(export.pages[0].title, "About");
        assert_eq!(export.pages[0].kind, ItemKind::Page);
        assert!(export.posts.iter().all(|p| p.kind == ItemKind::Post));
    }

    #[test]
    fn test_item_fields() {
        let export = parse_wxr_str(WXR_EXPORT, &la()).unwrap();
        let hello = &export.posts[0];
        assert_eq!(hello.author, "Andrew Ferguson");
        assert_eq!(hello.date, Some(la().with_ymd_and_hms(2021, 1, 1, 4, 0, 0).unwrap()));
        assert!(hello.body.starts_with("First paragraph."));
        assert_eq!(hello.byline(), "By Andrew Ferguson on Friday, January 1, 2021 @ 4:00 AM");

        // Unknown login and missing creator
        assert_eq!(export.posts[1].author, UNKNOWN_AUTHOR);
        assert_eq!(export.pages[0].author, UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_undated_page() {
        let export = parse_wxr_str(WXR_EXPORT, &la()).unwrap();
        let about = &export.pages[0];
        assert!(about.date.is_none());
        assert_eq!(about.byline(), "By Unknown Author");
        assert_eq!(about.body, "");
    }

    #[test]
    fn test_only_approved_comments() {
        let export = parse_wxr_str(WXR_EXPORT, &la()).unwrap();
        let hello = &export.posts[0];
        assert_eq!(hello.comments.len(), 2);
        assert_eq!(hello.comments[0], Comment {
            author: "Jane".to_string(),
            body: "Nice <b>post</b>!".to_string(),
            date: "Saturday, January 2, 2021 @ 10:05 AM".to_string(),
            approved: true,
        });
        // No GMT column, local column read as UTC
        assert_eq!(hello.comments[1].date, "Sunday, January 3, 2021 @ 1:00 AM");
        assert!(export.posts[1].comments.is_empty());
    }

    #[test]
    fn test_comment_timezone_is_fixed() {
        let tz = parse_timezone("Europe/Berlin").unwrap();
        let export = parse_wxr_str(WXR_EXPORT, &tz).unwrap();
        assert_eq!(export.posts[0].comments[0].date, "Saturday, January 2, 2021 @ 10:05 AM");
        assert_eq!(export.posts[0].date, Some(tz.with_ymd_and_hms(2021, 1, 1, 13, 0, 0).unwrap()));
    }

    #[test]
    fn test_missing_base_url() {
        let res = parse_wxr_str(WXR_NO_BASE_URL, &la());
        assert!(matches!(res, Err(ConvertError::MissingBaseUrl)));
    }

    #[test]
    fn test_missing_channel_fields_use_placeholders() {
        let xml = r#"<?xml version="1.0"?>
<rss xmlns:wp="http://wordpress.org/export/1.2/"><channel>
<wp:base_blog_url>https://example.com</wp:base_blog_url>
</channel></rss>"#;
        let export = parse_wxr_str(xml, &la()).unwrap();
        assert_eq!(export.metadata.title, NO_TITLE);
        assert_eq!(export.metadata.description, "");
        assert_eq!(export.metadata.date_range_label(), "N/A");
        assert_eq!(export.item_count(), 0);
    }

    #[test]
    fn test_malformed_input() {
        let res = parse_wxr_str("<rss><channel><title>x</channel></rss>", &la());
        assert!(matches!(res, Err(ConvertError::MalformedInput(_))));

        let res = parse_wxr_str("<rss><channel><title>x</title>", &la());
        assert!(matches!(res, Err(ConvertError::MalformedInput(_))));

        let res = parse_wxr_str("this is not xml", &la());
        assert!(matches!(res, Err(ConvertError::MalformedInput(_))));
    }

    #[test]
    fn test_authors_after_items() {
        let xml = r#"<rss xmlns:wp="http://wordpress.org/export/1.1/" xmlns:dc="http://purl.org/dc/elements/1.1/"><channel>
<title>Late authors</title>
<wp:base_blog_url>https://example.com</wp:base_blog_url>
<item><title>Post</title><dc:creator>bob</dc:creator><wp:post_type>post</wp:post_type><wp:status>publish</wp:status></item>
<wp:author><wp:author_login>bob</wp:author_login><wp:author_display_name>Bob B.</wp:author_display_name></wp:author>
</channel></rss>"#;
        let export = parse_wxr_str(xml, &la()).unwrap();
        assert_eq!(export.posts[0].author, "Bob B.");
    }
}
