use lazy_static::lazy_static;
use regex::Regex;

use crate::html::entities::decode_entities;
use crate::html::{Block, BlockKind, InlineStyle, Run};

lazy_static! {
    static ref TOKEN_REGEX: Regex = Regex::new(
        r"(?s)<!--.*?-->|<(?P<close>/?)(?P<tag>[a-zA-Z][a-zA-Z0-9]*)(?P<attrs>[^>]*)>|(?P<text>[^<]+)|<"
    ).unwrap();

    static ref ATTR_REGEX: Regex = Regex::new(
        r#"(?P<key>[a-zA-Z_:-]+)\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#
    ).unwrap();

    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

fn attribute(attrs: &str, name: &str) -> Option<String> {
    ATTR_REGEX.captures_iter(attrs)
        .find(|caps| caps["key"].eq_ignore_ascii_case(name))
        .and_then(|caps| caps.name("dq").or_else(|| caps.name("sq")))
        .map(|value| decode_entities(value.as_str()))
}

#[derive(Clone, Copy)]
enum ListKind {
    Bullet,
    Numbered(u32),
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    runs: Vec<Run>,
    kind: Option<BlockKind>,
    bold: u32,
    italic: u32,
    mono: u32,
    pre: u32,
    skip: u32,
    quote_depth: u8,
    lists: Vec<ListKind>,
}

impl BlockBuilder {
    fn style(&self) -> InlineStyle {
        InlineStyle {
            bold: self.bold > 0,
            italic: self.italic > 0,
            mono: self.mono > 0 || self.pre > 0,
        }
    }

    fn indent(&self) -> u8 {
        self.quote_depth.saturating_add(self.lists.len() as u8)
    }

    fn push_text(&mut self, text: &str) {
        let style = self.style();
        if self.pre > 0 {
            for (i, line) in text.split('\n').enumerate() {
                if i > 0 {
                    self.runs.push(Run::line_break());
                }
                if !line.is_empty() {
                    self.push_run(line, style);
                }
            }
        } else {
            let collapsed = WHITESPACE_REGEX.replace_all(text, " ");
            self.push_run(&collapsed, style);
        }
    }

    fn push_run(&mut self, text: &str, style: InlineStyle) {
        if let Some(last) = self.runs.last_mut() {
            if last.style == style && !last.is_line_break() {
                // Collapsed whitespace from two adjacent text nodes
                if last.text.ends_with(' ') && text.starts_with(' ') {
                    last.text.push_str(&text[1..]);
                } else {
                    last.text.push_str(text);
                }
                return;
            }
        }
        self.runs.push(Run::new(text, style));
    }

    fn flush(&mut self) {
        let kind = self.kind.unwrap_or(BlockKind::Paragraph);
        let mut runs = std::mem::take(&mut self.runs);

        if kind != BlockKind::Preformatted {
            while runs.first().is_some_and(|r| r.is_line_break() || r.text.trim().is_empty()) {
                runs.remove(0);
            }
            while runs.last().is_some_and(|r| r.is_line_break() || r.text.trim().is_empty()) {
                runs.pop();
            }
            if let Some(first) = runs.first_mut() {
                first.text = first.text.trim_start().to_string();
            }
            if let Some(last) = runs.last_mut() {
                last.text = last.text.trim_end().to_string();
            }
        }

        // A list item keeps its marker even when it holds only an image
        let has_text = runs.iter().any(|r| !r.is_line_break() && !r.text.trim().is_empty());
        if has_text {
            self.blocks.push(Block::Text {
                kind,
                indent: self.indent(),
                runs,
            });
        }
    }

    fn start_block(&mut self, kind: Option<BlockKind>) {
        self.flush();
        self.kind = kind;
    }

    fn open(&mut self, tag: &str, attrs: &str) {
        match tag {
            "script" | "style" => self.skip += 1,
            "p" | "div" | "figure" | "section" | "article" | "center" | "table" | "tr" => self.start_block(None),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<u8>().unwrap_or(6);
                self.start_block(Some(BlockKind::Heading(level)));
            }
            "figcaption" => self.start_block(Some(BlockKind::Caption)),
            "blockquote" => {
                self.start_block(None);
                self.quote_depth = self.quote_depth.saturating_add(1);
            }
            "ul" => {
                self.start_block(None);
                self.lists.push(ListKind::Bullet);
            }
            "ol" => {
                self.start_block(None);
                self.lists.push(ListKind::Numbered(0));
            }
            "li" => {
                self.start_block(Some(BlockKind::ListItem));
                let marker = match self.lists.last_mut() {
                    Some(ListKind::Numbered(n)) => {
                        *n += 1;
                        format!("{}. ", n)
                    }
                    _ => "• ".to_string(),
                };
                self.runs.push(Run::new(&marker, InlineStyle::PLAIN));
            }
            "pre" => {
                self.start_block(Some(BlockKind::Preformatted));
                self.pre += 1;
            }
            "hr" => {
                self.start_block(None);
                self.blocks.push(Block::Rule);
            }
            "img" => {
                let kind = self.kind;
                let src = attribute(attrs, "src").unwrap_or_default();
                let alt = attribute(attrs, "alt").unwrap_or_default();
                self.flush();
                self.blocks.push(Block::Image { src, alt });
                self.kind = kind;
            }
            "br" => self.runs.push(Run::line_break()),
            "strong" | "b" => self.bold += 1,
            "em" | "i" | "cite" => self.italic += 1,
            "code" | "tt" | "kbd" | "samp" => self.mono += 1,
            "td" | "th" => self.push_text(" "),
            _ => {}
        }
    }

    fn close(&mut self, tag: &str) {
        match tag {
            "script" | "style" => self.skip = self.skip.saturating_sub(1),
            "p" | "div" | "figure" | "section" | "article" | "center" | "table" | "tr" => self.start_block(None),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "figcaption" | "li" => self.start_block(None),
            "blockquote" => {
                self.start_block(None);
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            "ul" | "ol" => {
                self.start_block(None);
                self.lists.pop();
            }
            "pre" => {
                self.start_block(None);
                self.pre = self.pre.saturating_sub(1);
            }
            "strong" | "b" => self.bold = self.bold.saturating_sub(1),
            "em" | "i" | "cite" => self.italic = self.italic.saturating_sub(1),
            "code" | "tt" | "kbd" | "samp" => self.mono = self.mono.saturating_sub(1),
            _ => {}
        }
    }
}

/// Splits `html` into layout blocks. Tags that carry no layout meaning (links,
/// spans, ...) are dropped and only their text is kept.
pub fn parse_blocks(html: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();

    for caps in TOKEN_REGEX.captures_iter(html) {
        if let Some(tag) = caps.name("tag") {
            let tag = tag.as_str().to_ascii_lowercase();
            let is_close = caps.name("close").is_some_and(|c| !c.as_str().is_empty());
            if is_close {
                builder.close(&tag);
            } else if builder.skip == 0 || tag == "script" || tag == "style" {
                let attrs = caps.name("attrs").map_or("", |a| a.as_str());
                builder.open(&tag, attrs);
                // <br/>, <img/> and friends never get a closing tag
            }
        } else if let Some(text) = caps.name("text") {
            if builder.skip == 0 {
                builder.push_text(&decode_entities(text.as_str()));
            }
        } else if caps[0].starts_with("<!--") {
            continue;
        } else if builder.skip == 0 {
            // A lone '<' that does not start a tag
            builder.push_text("<");
        }
    }

    builder.flush();
    builder.blocks
}
