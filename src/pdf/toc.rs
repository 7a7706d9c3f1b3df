use crate::pdf::fonts::FontFace;
use crate::pdf::{Canvas, LinkHandle, TextStyle};

pub const TOC_TITLE_WIDTH: usize = 60;
pub const TOC_FILL_COLUMN: usize = 70;
const TOC_FILL_CHAR: char = '.';
pub const TOC_STYLE: TextStyle = TextStyle::new(FontFace::Mono, 12.0);

#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    pub title: String,
    pub page: u32,
    pub link: LinkHandle,
}

/// `Title..........12`: the title cut to 60 characters, dots up to column 70, then the page.
pub fn toc_line(title: &str, page: u32) -> String {
    let title: String = title.chars().take(TOC_TITLE_WIDTH).collect();
    let fill = TOC_FILL_COLUMN.saturating_sub(title.chars().count());
    let dots: String = std::iter::repeat(TOC_FILL_CHAR).take(fill).collect();
    format!("{}{}{}", title, dots, page)
}

/// Lines of `line_height` that fit between `top` and `bottom`, stepping the
/// cursor the way a canvas does: a line fits while `y + line_height <= bottom`.
/// The first line always fits.
pub fn lines_between(top: f32, bottom: f32, line_height: f32) -> usize {
    if line_height <= 0.0 {
        return 1;
    }
    let mut y = top;
    let mut lines = 0;
    while y + line_height <= bottom {
        y += line_height;
        lines += 1;
    }
    lines.max(1)
}

/// Pages to reserve for `entries` lines; there is always at least one.
pub fn pages_needed(entries: usize, lines_per_page: usize) -> u32 {
    let lines_per_page = lines_per_page.max(1);
    entries.div_ceil(lines_per_page).max(1) as u32
}

/// Back-fills the reserved pages starting at `first_page`, one linked line per entry.
pub fn render_toc<C: Canvas>(canvas: &mut C, first_page: u32, entries: &[TocEntry], line_height: f32) {
    canvas.open_page(first_page);
    for entry in entries {
        canvas.link_line(&toc_line(&entry.title, entry.page), TOC_STYLE, line_height, entry.link);
    }
}
