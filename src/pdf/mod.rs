use crate::html::Block;
use crate::pdf::fonts::FontFace;

pub mod assembler;
pub mod fonts;
pub mod line_breaker;
pub mod pdf_canvas;
pub mod toc;

pub use assembler::Assembler;
pub use pdf_canvas::PdfCanvas;
pub use toc::TocEntry;

/// Opaque handle of an in-document link destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkHandle(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    /// Points
    pub size: f32,
}

impl TextStyle {
    pub const fn new(face: FontFace, size: f32) -> TextStyle {
        TextStyle { face, size }
    }
}

/// The drawing surface the assembler lays the archive out on.
///
/// Pages are numbered from 1. Content always flows forward: when a write does
/// not fit, the canvas moves to the next existing page or appends a new one.
/// That is what lets reserved pages be filled after the rest of the document
/// has been laid out, through `open_page`.
pub trait Canvas {
    /// Appends a page, makes it current and returns its number.
    fn add_page(&mut self) -> u32;

    fn page_no(&self) -> u32;

    fn page_count(&self) -> u32;

    /// Moves the cursor to the top of an existing page.
    fn open_page(&mut self, page: u32);

    /// How many `line_height` tall lines a page created now holds before the
    /// canvas breaks to the next page.
    fn lines_per_page(&self, line_height: f32) -> usize;

    /// Pages created from now on carry this header line.
    fn set_running_header(&mut self, header: Option<String>);

    fn skip(&mut self, mm: f32);

    fn text_line(&mut self, text: &str, style: TextStyle, align: Align);

    /// Registers the current cursor position as a link destination.
    fn add_link(&mut self) -> LinkHandle;

    /// One line, `line_height` tall, that jumps to `target` when clicked.
    fn link_line(&mut self, text: &str, style: TextStyle, line_height: f32, target: LinkHandle);

    fn flow_blocks(&mut self, blocks: &[Block], body: TextStyle);
}
