use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

#[derive(Deserialize)]
pub struct Paths {
    #[serde(default = "default_fonts_dir")]
    pub fonts_dir: PathBuf,
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Paths {
            fonts_dir: default_fonts_dir(),
            content_dir: default_content_dir(),
        }
    }
}

#[derive(Deserialize)]
pub struct Layout {
    #[serde(default = "default_toc_line_height")]
    pub toc_line_height_mm: f32,
    #[serde(default = "default_body_font_size")]
    pub body_font_size: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            toc_line_height_mm: default_toc_line_height(),
            body_font_size: default_body_font_size(),
        }
    }
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub layout: Layout,
    pub log: Option<Log>,
}

fn default_fonts_dir() -> PathBuf {
    PathBuf::from("./fonts")
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("./content")
}

fn default_toc_line_height() -> f32 {
    8.0
}

fn default_body_font_size() -> f32 {
    12.0
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if path.starts_with("${exe_dir}") {
        let cur_exe = env::current_exe()?;
        let exe_dir = cur_exe.parent().unwrap_or(Path::new("."));
        let rest = path.strip_prefix("${exe_dir}").unwrap_or(&path);
        Ok(exe_dir.join(rest))
    } else {
        Ok(path)
    }
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        fonts_dir: parse_path(cfg.paths.fonts_dir)?,
        content_dir: parse_path(cfg.paths.content_dir)?,
    };

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
