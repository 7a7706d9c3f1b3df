use std::path::Path;

use crate::config::{read_config, Config};
use crate::error::{ConvertError, Result};
use crate::pdf::assembler::LayoutSettings;
use crate::pdf::fonts::FontSet;
use crate::pdf::{Assembler, PdfCanvas};
use crate::text_utils::parse_timezone;
use crate::wxr::parse_wxr;

pub mod config;
pub mod content;
pub mod error;
pub mod html;
pub mod logger;
pub mod pdf;
pub mod text_utils;
pub mod wxr;

#[cfg(test)]
mod test_data;

/// Reads the TOML configuration at `path`.
pub fn load_config(path: &Path) -> Result<Config> {
    read_config(path).map_err(|e| ConvertError::Config(e.to_string()))
}

/// Reads the export at `input` and writes the archive PDF to `output`.
///
/// Nothing is written when the export, the timezone or the fonts are invalid.
pub fn convert(config: &Config, input: &Path, output: &Path, timezone: &str) -> Result<()> {
    let tz = parse_timezone(timezone)?;
    let fonts = FontSet::load(&config.paths.fonts_dir)?;
    let export = parse_wxr(input, &tz)?;

    let mut canvas = PdfCanvas::new(&export.metadata.title, &fonts, &config.paths.content_dir)?;
    Assembler::new(&mut canvas, LayoutSettings::from(&config.layout)).assemble(&export);
    canvas.save(output)
}
