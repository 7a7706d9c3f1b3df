use std::collections::HashMap;
use std::fs;
use std::fs::File;
use std::fmt::Display;
use std::io::{BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

use printpdf::lopdf::{Dictionary, Document, Object, ObjectId};
use printpdf::{IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex, PdfLayerReference,
               PdfPageIndex};
use spdlog::{debug, info, warn};

use crate::content::urls::LOCAL_CONTENT_PREFIX;
use crate::error::{ConvertError, Result};
use crate::html::{Block, BlockKind, Run};
use crate::pdf::fonts::{FontFace, FontSet};
use crate::pdf::line_breaker::{break_lines, Line};
use crate::pdf::toc::lines_between;
use crate::pdf::{Align, Canvas, LinkHandle, TextStyle};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const BOTTOM_MARGIN: f32 = 15.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const TEXT_LINE_HEIGHT: f32 = 10.0;
const HEADER_HEIGHT: f32 = 10.0;
const INDENT_STEP: f32 = 10.0;
const LAYER_NAME: &str = "Content";

const PT_TO_MM: f32 = 25.4 / 72.0;
const MM_TO_PT: f32 = 72.0 / 25.4;

const DECORATION: TextStyle = TextStyle::new(FontFace::Italic, 8.0);

struct PageRef {
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    content_top: f32,
}

struct LinkTarget {
    page: usize,
    y: f32,
}

/// A clickable area on page `page`, `rect` in points from the bottom left corner.
struct PageLink {
    page: usize,
    rect: [f32; 4],
    target: LinkHandle,
}

fn pdf_error<E: Display>(e: E) -> ConvertError {
    ConvertError::Pdf(e.to_string())
}

fn goto_annotation(rect: [f32; 4], target_page: ObjectId, top: f32) -> Dictionary {
    let mut action = Dictionary::new();
    action.set("S", Object::Name(b"GoTo".to_vec()));
    action.set("D", Object::Array(vec![
        Object::Reference(target_page),
        Object::Name(b"XYZ".to_vec()),
        Object::Null,
        Object::Real(top),
        Object::Null,
    ]));

    let mut annotation = Dictionary::new();
    annotation.set("Type", Object::Name(b"Annot".to_vec()));
    annotation.set("Subtype", Object::Name(b"Link".to_vec()));
    annotation.set("Rect", Object::Array(rect.iter().map(|v| Object::Real(*v)).collect()));
    annotation.set("Border", Object::Array(vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)]));
    annotation.set("A", Object::Dictionary(action));
    annotation
}

/// Adds one `/GoTo` link annotation per entry of `page_links` to the serialised document.
fn add_goto_links(pdf: &mut Document, page_links: &[PageLink], targets: &[LinkTarget]) -> Result<usize> {
    let page_ids = pdf.get_pages();
    let page_id = |index: usize| {
        page_ids.get(&(index as u32 + 1))
            .copied()
            .ok_or_else(|| ConvertError::Pdf(format!("Page {} is missing from the document", index + 1)))
    };

    let mut added = 0;
    for link in page_links {
        let Some(target) = targets.get(link.target.0) else {
            warn!("Link on page {} has no destination", link.page + 1);
            continue;
        };
        let source_id = page_id(link.page)?;
        let target_id = page_id(target.page)?;

        let annotation = pdf.add_object(goto_annotation(link.rect, target_id, (PAGE_HEIGHT - target.y) * MM_TO_PT));
        let page = pdf.get_object_mut(source_id).and_then(Object::as_dict_mut).map_err(pdf_error)?;
        if !page.has(b"Annots") {
            page.set("Annots", Object::Array(vec![]));
        }
        page.get_mut(b"Annots")
            .and_then(Object::as_array_mut)
            .map_err(pdf_error)?
            .push(Object::Reference(annotation));
        added += 1;
    }
    Ok(added)
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * 1.5
}

fn block_style(kind: BlockKind, body: TextStyle) -> TextStyle {
    match kind {
        BlockKind::Paragraph | BlockKind::ListItem => body,
        BlockKind::Heading(level) => {
            let size = match level {
                1 => 20.0,
                2 => 18.0,
                3 => 16.0,
                4 => 14.0,
                _ => body.size,
            };
            TextStyle::new(FontFace::Bold, size)
        }
        BlockKind::Caption => TextStyle::new(FontFace::Italic, body.size - 2.0),
        BlockKind::Preformatted => TextStyle::new(FontFace::Mono, body.size - 2.0),
    }
}

fn styled_runs(runs: &[Run], base: TextStyle) -> Vec<(String, FontFace)> {
    runs.iter()
        .map(|run| {
            let face = if run.style.mono || base.face == FontFace::Mono {
                FontFace::Mono
            } else {
                base.face.emphasized(run.style.bold, run.style.italic)
            };
            (run.text.clone(), face)
        })
        .collect()
}

/// `printpdf` backed canvas: A4 portrait, text measured with the embedded DejaVu metrics.
pub struct PdfCanvas<'a> {
    doc: PdfDocumentReference,
    fonts: &'a FontSet,
    font_refs: HashMap<FontFace, IndirectFontRef>,
    pages: Vec<PageRef>,
    first_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    current: usize,
    y: f32,
    links: Vec<LinkTarget>,
    page_links: Vec<PageLink>,
    running_header: Option<String>,
    content_dir: PathBuf,
}

impl<'a> PdfCanvas<'a> {
    pub fn new(title: &str, fonts: &'a FontSet, content_dir: &Path) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);

        let mut font_refs = HashMap::new();
        for face in FontFace::ALL {
            let font = fonts.get(face);
            let font_ref = doc.add_external_font(Cursor::new(font.data.clone()))
                .map_err(|e| ConvertError::Pdf(format!("Cannot embed {}: {:?}", font.path.display(), e)))?;
            font_refs.insert(face, font_ref);
        }

        Ok(PdfCanvas {
            doc,
            fonts,
            font_refs,
            pages: vec![],
            first_page: Some((page, layer)),
            current: 0,
            y: MARGIN,
            links: vec![],
            page_links: vec![],
            running_header: None,
            content_dir: content_dir.to_path_buf(),
        })
    }

    /// Serialises the document. The file only appears under `path` once it is complete.
    pub fn save(self, path: &Path) -> Result<()> {
        // printpdf only knows URI actions, in-document links are added on the serialised form
        let bytes = self.doc.save_to_bytes().map_err(|e| ConvertError::Pdf(format!("{:?}", e)))?;
        let mut pdf = Document::load_mem(&bytes).map_err(pdf_error)?;
        let links = add_goto_links(&mut pdf, &self.page_links, &self.links)?;
        debug!("Added {} table of contents links", links);

        let mut partial = path.as_os_str().to_owned();
        partial.push(".part");
        let partial = PathBuf::from(partial);

        let written = File::create(&partial).map_err(ConvertError::from).and_then(|file| {
            let mut writer = BufWriter::new(file);
            pdf.save_to(&mut writer).map_err(pdf_error)?;
            writer.flush()?;
            Ok(())
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }
        fs::rename(&partial, path)?;
        info!("PDF written to {}", path.display());
        Ok(())
    }

    fn layer(&self) -> PdfLayerReference {
        let page = &self.pages[self.current];
        self.doc.get_page(page.page).get_layer(page.layer)
    }

    fn bottom_limit(&self) -> f32 {
        PAGE_HEIGHT - BOTTOM_MARGIN
    }

    fn new_page_top(&self) -> f32 {
        match self.running_header {
            Some(_) => MARGIN + HEADER_HEIGHT,
            None => MARGIN,
        }
    }

    fn next_page(&mut self) {
        if self.current + 1 < self.pages.len() {
            self.current += 1;
            self.y = self.pages[self.current].content_top;
        } else {
            self.add_page();
        }
    }

    fn ensure_space(&mut self, height: f32) {
        let at_top = self.pages.get(self.current).is_some_and(|p| self.y <= p.content_top);
        if self.pages.is_empty() || (self.y + height > self.bottom_limit() && !at_top) {
            self.next_page();
        }
    }

    fn draw_line(&self, line: &Line, x: f32, top: f32, size: f32, height: f32) {
        let baseline = top + (height + size * PT_TO_MM * 0.7) / 2.0;
        let layer = self.layer();
        for segment in &line.segments {
            layer.use_text(segment.text.clone(), size, Mm(x + segment.x), Mm(PAGE_HEIGHT - baseline), &self.font_refs[&segment.face]);
        }
    }

    fn write_lines(&mut self, lines: &[Line], size: f32, height: f32, indent: f32, align: Align) {
        for line in lines {
            self.ensure_space(height);
            let x = match align {
                Align::Left => MARGIN + indent,
                Align::Center => MARGIN + indent + ((CONTENT_WIDTH - indent - line.width) / 2.0).max(0.0),
            };
            self.draw_line(line, x, self.y, size, height);
            self.y += height;
        }
    }

    // Page decorations are drawn outside the content area, the cursor is left alone
    fn decorate(&self, number: u32) {
        let height = TEXT_LINE_HEIGHT;
        let size = DECORATION.size;

        if let Some(ref header) = self.running_header {
            let lines = break_lines(&[(header.clone(), DECORATION.face)], size, CONTENT_WIDTH, self.fonts);
            if let Some(line) = lines.first() {
                let x = MARGIN + ((CONTENT_WIDTH - line.width) / 2.0).max(0.0);
                self.draw_line(line, x, MARGIN, size, height);
            }
        }

        if number > 1 {
            let footer = format!("Page {}", number);
            let lines = break_lines(&[(footer, DECORATION.face)], size, CONTENT_WIDTH, self.fonts);
            if let Some(line) = lines.first() {
                let x = MARGIN + ((CONTENT_WIDTH - line.width) / 2.0).max(0.0);
                self.draw_line(line, x, PAGE_HEIGHT - BOTTOM_MARGIN, size, height);
            }
        }
    }

    fn local_asset_path(&self, src: &str) -> Option<PathBuf> {
        src.strip_prefix(LOCAL_CONTENT_PREFIX).map(|rest| self.content_dir.join(rest))
    }

    fn image_placeholder(&mut self, src: &str, alt: &str, body: TextStyle) {
        match self.local_asset_path(src) {
            Some(path) if !path.is_file() => warn!("Image {} is missing from {}", src, self.content_dir.display()),
            None => warn!("Image {} was not localized", src),
            _ => {}
        }

        let label = if alt.trim().is_empty() {
            format!("[Image: {}]", src)
        } else {
            format!("[Image: {} ({})]", alt.trim(), src)
        };
        let style = TextStyle::new(FontFace::Italic, body.size - 2.0);
        let height = line_height(style.size);
        let lines = break_lines(&[(label, style.face)], style.size, CONTENT_WIDTH, self.fonts);
        self.write_lines(&lines, style.size, height, 0.0, Align::Center);
        self.y += height * 0.5;
    }
}

impl<'a> Canvas for PdfCanvas<'a> {
    fn add_page(&mut self) -> u32 {
        let (page, layer) = match self.first_page.take() {
            Some(first) => first,
            None => self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME),
        };
        let content_top = self.new_page_top();
        self.pages.push(PageRef { page, layer, content_top });
        self.current = self.pages.len() - 1;
        self.y = content_top;

        let number = self.pages.len() as u32;
        self.decorate(number);
        number
    }

    fn page_no(&self) -> u32 {
        self.current as u32 + 1
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn open_page(&mut self, page: u32) {
        let index = (page as usize).saturating_sub(1);
        if index < self.pages.len() {
            self.current = index;
            self.y = self.pages[index].content_top;
        }
    }

    fn lines_per_page(&self, line_height: f32) -> usize {
        lines_between(self.new_page_top(), self.bottom_limit(), line_height)
    }

    fn set_running_header(&mut self, header: Option<String>) {
        self.running_header = header;
    }

    fn skip(&mut self, mm: f32) {
        self.y += mm;
    }

    fn text_line(&mut self, text: &str, style: TextStyle, align: Align) {
        let lines = break_lines(&[(text.to_string(), style.face)], style.size, CONTENT_WIDTH, self.fonts);
        if lines.is_empty() {
            self.ensure_space(TEXT_LINE_HEIGHT);
            self.y += TEXT_LINE_HEIGHT;
            return;
        }
        self.write_lines(&lines, style.size, TEXT_LINE_HEIGHT, 0.0, align);
    }

    fn add_link(&mut self) -> LinkHandle {
        self.links.push(LinkTarget {
            page: self.current,
            y: self.y,
        });
        LinkHandle(self.links.len() - 1)
    }

    fn link_line(&mut self, text: &str, style: TextStyle, line_height: f32, target: LinkHandle) {
        self.ensure_space(line_height);
        let top = self.y;
        let lines = break_lines(&[(text.to_string(), style.face)], style.size, CONTENT_WIDTH, self.fonts);
        if let Some(line) = lines.first() {
            self.draw_line(line, MARGIN, top, style.size, line_height);
        }

        self.page_links.push(PageLink {
            page: self.current,
            rect: [
                MARGIN * MM_TO_PT,
                (PAGE_HEIGHT - top - line_height) * MM_TO_PT,
                (PAGE_WIDTH - MARGIN) * MM_TO_PT,
                (PAGE_HEIGHT - top) * MM_TO_PT,
            ],
            target,
        });

        self.y += line_height;
    }

    fn flow_blocks(&mut self, blocks: &[Block], body: TextStyle) {
        for block in blocks {
            match block {
                Block::Text { kind, indent, runs } => {
                    let style = block_style(*kind, body);
                    let height = line_height(style.size);
                    let indent = *indent as f32 * INDENT_STEP;
                    if matches!(kind, BlockKind::Heading(_)) {
                        self.y += height * 0.25;
                    }
                    let lines = break_lines(&styled_runs(runs, style), style.size, CONTENT_WIDTH - indent, self.fonts);
                    let align = match kind {
                        BlockKind::Caption => Align::Center,
                        _ => Align::Left,
                    };
                    self.write_lines(&lines, style.size, height, indent, align);
                    self.y += height * 0.5;
                }
                Block::Image { src, alt } => self.image_placeholder(src, alt, body),
                Block::Rule => self.text_line("* * *", body, Align::Center),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env;

    use tempfile::TempDir;

    use crate::html::InlineStyle;
    use crate::pdf::toc::{pages_needed, TOC_STYLE};

    use super::*;

    const SYSTEM_FONTS_DIR: &str = "/usr/share/fonts/truetype/dejavu";

    /// The DejaVu faces from `WXR2PDF_FONTS_DIR` or the usual system location;
    /// `None` skips the test on machines without them.
    fn dejavu_fonts() -> Option<FontSet> {
        let dir = env::var("WXR2PDF_FONTS_DIR").unwrap_or_else(|_| SYSTEM_FONTS_DIR.to_string());
        match FontSet::load(Path::new(&dir)) {
            Ok(fonts) => Some(fonts),
            Err(e) => {
                eprintln!("Skipping, DejaVu fonts unavailable: {}", e);
                None
            }
        }
    }

    /// (page holding the link, page it jumps to) for every GoTo annotation.
    fn goto_links(pdf: &Document) -> Vec<(u32, u32)> {
        let pages = pdf.get_pages();
        let numbers: HashMap<ObjectId, u32> = pages.iter().map(|(n, id)| (*id, *n)).collect();
        let mut links = vec![];
        for (number, id) in &pages {
            let page = pdf.get_dictionary(*id).unwrap();
            let Ok(annots) = page.get(b"Annots").and_then(Object::as_array) else {
                continue;
            };
            for annot in annots {
                let (_, annot) = pdf.dereference(annot).unwrap();
                let action = annot.as_dict().unwrap().get(b"A").unwrap().as_dict().unwrap();
                if action.get(b"S").unwrap().as_name().unwrap() != b"GoTo" {
                    continue;
                }
                let dest = action.get(b"D").unwrap().as_array().unwrap();
                links.push((*number, numbers[&dest[0].as_reference().unwrap()]));
            }
        }
        links
    }

    #[test]
    fn test_toc_lines_stay_on_reserved_pages() {
        let Some(fonts) = dejavu_fonts() else {
            return;
        };

        for (line_height, entries) in [(8.0, 34), (8.0, 68), (6.8, 40), (6.8, 80), (5.44, 50), (5.44, 100)] {
            let mut canvas = PdfCanvas::new("Reservation", &fonts, Path::new("./content")).unwrap();
            canvas.add_page();
            let reserved = pages_needed(entries, canvas.lines_per_page(line_height));
            let toc_page = canvas.add_page();
            for _ in 1..reserved {
                canvas.add_page();
            }
            canvas.set_running_header(Some("Blog - About".to_string()));
            let section_page = canvas.add_page();
            let link = canvas.add_link();

            canvas.open_page(toc_page);
            for i in 0..entries {
                canvas.link_line(&format!("Entry {}", i), TOC_STYLE, line_height, link);
            }

            assert_eq!(canvas.page_links.len(), entries);
            let last_toc_page = canvas.page_links.iter().map(|l| l.page as u32 + 1).max().unwrap();
            assert!(last_toc_page < section_page,
                    "{} lines of {}mm reached page {}, section starts on {}", entries, line_height, last_toc_page, section_page);
            assert_eq!(canvas.page_count(), section_page);
        }
    }

    #[test]
    fn test_save_writes_goto_links() {
        let Some(fonts) = dejavu_fonts() else {
            return;
        };
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.pdf");

        let mut canvas = PdfCanvas::new("Links", &fonts, dir.path()).unwrap();
        canvas.add_page();
        let toc_page = canvas.add_page();
        canvas.add_page();
        let first = canvas.add_link();
        canvas.add_page();
        let second = canvas.add_link();
        canvas.open_page(toc_page);
        canvas.link_line("First", TOC_STYLE, 8.0, first);
        canvas.link_line("Second", TOC_STYLE, 8.0, second);
        canvas.save(&path).unwrap();

        assert!(path.is_file());
        assert!(!dir.path().join("links.pdf.part").exists());

        let pdf = Document::load(&path).unwrap();
        assert_eq!(pdf.get_pages().len(), 4);
        assert_eq!(goto_links(&pdf), vec![(2, 3), (2, 4)]);
    }

    #[test]
    fn test_block_style() {
        let body = TextStyle::new(FontFace::Regular, 12.0);
        assert_eq!(block_style(BlockKind::Paragraph, body), body);
        assert_eq!(block_style(BlockKind::Heading(3), body), TextStyle::new(FontFace::Bold, 16.0));
        assert_eq!(block_style(BlockKind::Heading(6), body), TextStyle::new(FontFace::Bold, 12.0));
        assert_eq!(block_style(BlockKind::Caption, body), TextStyle::new(FontFace::Italic, 10.0));
        assert_eq!(block_style(BlockKind::Preformatted, body), TextStyle::new(FontFace::Mono, 10.0));
    }

    #[test]
    fn test_styled_runs() {
        let runs = vec![
            Run::new("plain ", InlineStyle::PLAIN),
            Run::new("bold ", InlineStyle::BOLD),
            Run::new("code", InlineStyle::MONO),
        ];
        let caption = TextStyle::new(FontFace::Italic, 10.0);
        assert_eq!(styled_runs(&runs, caption), vec![
            ("plain ".to_string(), FontFace::Italic),
            ("bold ".to_string(), FontFace::BoldItalic),
            ("code".to_string(), FontFace::Mono),
        ]);
    }

    #[test]
    fn test_line_height() {
        assert!((line_height(12.0) - 6.35).abs() < 0.01);
    }
}
