//! Reduces the normalized item HTML to the handful of block and inline
//! constructs the PDF layout knows how to draw.

pub mod entities;
pub mod markup;

pub use markup::parse_blocks;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub mono: bool,
}

impl InlineStyle {
    pub const PLAIN: InlineStyle = InlineStyle { bold: false, italic: false, mono: false };
    pub const BOLD: InlineStyle = InlineStyle { bold: true, italic: false, mono: false };
    pub const ITALIC: InlineStyle = InlineStyle { bold: false, italic: true, mono: false };
    pub const MONO: InlineStyle = InlineStyle { bold: false, italic: false, mono: true };
}

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: InlineStyle,
}

impl Run {
    pub fn new(text: &str, style: InlineStyle) -> Run {
        Run { text: text.to_string(), style }
    }

    /// Forced line break (`<br>` or a newline inside `<pre>`).
    pub fn line_break() -> Run {
        Run { text: "\n".to_string(), style: InlineStyle::PLAIN }
    }

    pub fn is_line_break(&self) -> bool {
        self.text == "\n"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading(u8),
    ListItem,
    Caption,
    Preformatted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text {
        kind: BlockKind,
        /// Nesting depth of blockquotes and lists
        indent: u8,
        runs: Vec<Run>,
    },
    Image {
        src: String,
        alt: String,
    },
    Rule,
}

impl Block {
    pub fn plain_text(&self) -> String {
        match self {
            Block::Text { runs, .. } => runs.iter().map(|r| r.text.as_str()).collect(),
            Block::Image { src, .. } => src.clone(),
            Block::Rule => String::new(),
        }
    }
}
