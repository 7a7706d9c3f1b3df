use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use spdlog::debug;

use crate::error::{ConvertError, Result};
use crate::html::InlineStyle;

const PT_TO_MM: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    Italic,
    BoldItalic,
    Mono,
}

impl FontFace {
    pub const ALL: [FontFace; 5] = [
        FontFace::Regular,
        FontFace::Bold,
        FontFace::Italic,
        FontFace::BoldItalic,
        FontFace::Mono,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            FontFace::Regular => "DejaVuSans.ttf",
            FontFace::Bold => "DejaVuSans-Bold.ttf",
            FontFace::Italic => "DejaVuSans-Oblique.ttf",
            FontFace::BoldItalic => "DejaVuSans-BoldOblique.ttf",
            FontFace::Mono => "DejaVuSansMono.ttf",
        }
    }

    pub fn for_style(style: InlineStyle) -> FontFace {
        match (style.mono, style.bold, style.italic) {
            (true, _, _) => FontFace::Mono,
            (false, true, true) => FontFace::BoldItalic,
            (false, true, false) => FontFace::Bold,
            (false, false, true) => FontFace::Italic,
            (false, false, false) => FontFace::Regular,
        }
    }

    /// Same family with bold and/or italic added on top.
    pub fn emphasized(self, bold: bool, italic: bool) -> FontFace {
        match self {
            FontFace::Mono => FontFace::Mono,
            face => {
                let bold = bold || matches!(face, FontFace::Bold | FontFace::BoldItalic);
                let italic = italic || matches!(face, FontFace::Italic | FontFace::BoldItalic);
                FontFace::for_style(InlineStyle { bold, italic, mono: false })
            }
        }
    }
}

/// Width of a piece of text, in millimetres, for a face and a size in points.
pub trait TextMeasure {
    fn text_width(&self, text: &str, face: FontFace, size: f32) -> f32;
}

/// Horizontal advances of the glyphs a blog archive is likely to contain.
pub struct FontMetrics {
    units_per_em: f32,
    advances: HashMap<char, u16>,
    fallback_advance: u16,
}

const MEASURED_RANGES: [(u32, u32); 4] = [
    (0x20, 0x24F),
    (0x370, 0x52F),
    (0x2000, 0x206F),
    (0x20A0, 0x20CF),
];

impl FontMetrics {
    pub fn from_data(data: &[u8]) -> std::result::Result<FontMetrics, String> {
        let face = ttf_parser::Face::parse(data, 0).map_err(|e| e.to_string())?;

        let mut advances = HashMap::new();
        for (start, end) in MEASURED_RANGES {
            for c in (start..=end).filter_map(char::from_u32) {
                if let Some(advance) = face.glyph_index(c).and_then(|id| face.glyph_hor_advance(id)) {
                    advances.insert(c, advance);
                }
            }
        }

        let units_per_em = face.units_per_em();
        let fallback_advance = advances.get(&'M').copied().unwrap_or(units_per_em);

        Ok(FontMetrics {
            units_per_em: units_per_em as f32,
            advances,
            fallback_advance,
        })
    }

    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars()
            .map(|c| *self.advances.get(&c).unwrap_or(&self.fallback_advance) as u32)
            .sum();
        units as f32 / self.units_per_em * size * PT_TO_MM
    }
}

pub struct LoadedFont {
    pub path: PathBuf,
    pub data: Vec<u8>,
    pub metrics: FontMetrics,
}

/// The five DejaVu faces the document is set in.
pub struct FontSet {
    fonts: HashMap<FontFace, LoadedFont>,
}

impl FontSet {
    /// Every face must be present; a missing file stops the run before anything is parsed.
    pub fn load(fonts_dir: &Path) -> Result<FontSet> {
        let mut fonts = HashMap::new();
        for face in FontFace::ALL {
            let path = fonts_dir.join(face.file_name());
            if !path.is_file() {
                return Err(ConvertError::MissingFont(path));
            }
            let data = fs::read(&path)?;
            let metrics = FontMetrics::from_data(&data)
                .map_err(|e| ConvertError::InvalidFont(path.clone(), e))?;
            debug!("Loaded font {}", path.display());
            fonts.insert(face, LoadedFont { path, data, metrics });
        }
        Ok(FontSet { fonts })
    }

    pub fn get(&self, face: FontFace) -> &LoadedFont {
        // load() fills every face
        &self.fonts[&face]
    }
}

impl TextMeasure for FontSet {
    fn text_width(&self, text: &str, face: FontFace, size: f32) -> f32 {
        self.get(face).metrics.text_width(text, size)
    }
}
