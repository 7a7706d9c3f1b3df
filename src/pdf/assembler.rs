use spdlog::{debug, info};

use crate::config::Layout;
use crate::content::render_item_html;
use crate::html::parse_blocks;
use crate::pdf::fonts::FontFace;
use crate::pdf::toc::{pages_needed, render_toc, TocEntry};
use crate::pdf::{Align, Canvas, TextStyle};
use crate::wxr::{BlogMetadata, ContentItem, Export, ItemKind};

const PAGE_TITLE_PREFIX: &str = "Page: ";
const PAGES_DIVIDER_TITLE: &str = "Pages";
const PAGES_DIVIDER_DESCRIPTION: &str = "These are pages (separate from blog posts) on the site.";

const HEADING: TextStyle = TextStyle::new(FontFace::Bold, 20.0);
const BYLINE: TextStyle = TextStyle::new(FontFace::Italic, 12.0);

#[derive(Debug, Clone, Copy)]
pub struct LayoutSettings {
    pub body_font_size: f32,
    pub toc_line_height: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        LayoutSettings::from(&Layout::default())
    }
}

impl From<&Layout> for LayoutSettings {
    fn from(layout: &Layout) -> Self {
        LayoutSettings {
            body_font_size: layout.body_font_size,
            toc_line_height: layout.toc_line_height_mm,
        }
    }
}

fn add_title_page<C: Canvas>(canvas: &mut C, metadata: &BlogMetadata) {
    canvas.add_page();
    canvas.skip(100.0);
    canvas.text_line(&metadata.title, TextStyle::new(FontFace::Bold, 36.0), Align::Center);
    canvas.skip(10.0);
    canvas.text_line(&metadata.description, TextStyle::new(FontFace::Regular, 24.0), Align::Center);
    canvas.skip(10.0);
    canvas.text_line(&metadata.date_range_label(), TextStyle::new(FontFace::Italic, 14.0), Align::Center);
    canvas.skip(10.0);
    canvas.text_line(&format!("An archive of {}", metadata.url), TextStyle::new(FontFace::Regular, 10.0), Align::Center);
}

fn add_pages_divider<C: Canvas>(canvas: &mut C) {
    canvas.add_page();
    canvas.skip(100.0);
    canvas.text_line(PAGES_DIVIDER_TITLE, TextStyle::new(FontFace::Bold, 36.0), Align::Center);
    canvas.text_line(PAGES_DIVIDER_DESCRIPTION, TextStyle::new(FontFace::Regular, 12.0), Align::Center);
}

/// Lays one post or page out from a fresh page and returns its table of contents entry.
pub fn emit_section<C: Canvas>(canvas: &mut C, item: &ContentItem, site_url: &str, body: TextStyle) -> TocEntry {
    canvas.add_page();
    let page = canvas.page_no();
    let link = canvas.add_link();

    let title = match item.kind {
        ItemKind::Post => item.title.clone(),
        ItemKind::Page => format!("{}{}", PAGE_TITLE_PREFIX, item.title),
    };
    debug!("Emitting {} on page {}", item, page);

    canvas.text_line(&item.title, HEADING, Align::Left);
    canvas.text_line(&item.byline(), BYLINE, Align::Left);
    canvas.skip(5.0);

    let html = render_item_html(item, site_url);
    canvas.flow_blocks(&parse_blocks(&html), body);
    canvas.skip(10.0);

    TocEntry { title, page, link }
}

/// Builds the whole archive on a canvas: title page, table of contents, posts,
/// the pages divider, pages. The table of contents is filled in last, once
/// every section knows its page.
pub struct Assembler<'a, C: Canvas> {
    canvas: &'a mut C,
    settings: LayoutSettings,
    toc: Vec<TocEntry>,
}

impl<'a, C: Canvas> Assembler<'a, C> {
    pub fn new(canvas: &'a mut C, settings: LayoutSettings) -> Self {
        Assembler {
            canvas,
            settings,
            toc: vec![],
        }
    }

    fn reserve_toc(&mut self, entries: usize) -> u32 {
        let per_page = self.canvas.lines_per_page(self.settings.toc_line_height);
        let reserved = pages_needed(entries, per_page);
        let first_page = self.canvas.add_page();
        for _ in 1..reserved {
            self.canvas.add_page();
        }
        debug!("Reserved {} table of contents pages for {} entries", reserved, entries);
        first_page
    }

    fn emit_all(&mut self, items: &[ContentItem], site_url: &str) {
        let body = TextStyle::new(FontFace::Regular, self.settings.body_font_size);
        for item in items {
            let entry = emit_section(self.canvas, item, site_url, body);
            self.toc.push(entry);
        }
    }

    pub fn assemble(mut self, export: &Export) -> Vec<TocEntry> {
        let metadata = &export.metadata;

        add_title_page(self.canvas, metadata);
        let toc_first_page = self.reserve_toc(export.item_count());

        self.canvas.set_running_header(Some(format!("{} - {}", metadata.title, metadata.description)));

        self.emit_all(&export.posts, &metadata.url);
        add_pages_divider(self.canvas);
        self.emit_all(&export.pages, &metadata.url);

        render_toc(self.canvas, toc_first_page, &self.toc, self.settings.toc_line_height);
        info!("Laid out {} sections on {} pages", self.toc.len(), self.canvas.page_count());

        self.toc
    }
}
