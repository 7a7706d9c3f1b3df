use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use spdlog::{info, warn};

use wxr2pdf::config::Config;
use wxr2pdf::{convert, load_config};
use wxr2pdf::logger::configure_logger;
use wxr2pdf::text_utils::DEFAULT_TIMEZONE;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// WordPress WXR export to archive
    #[arg(short = 'i', long)]
    wxr_file: PathBuf,

    /// Where the PDF is written
    #[arg(short = 'o', long)]
    output_pdf: PathBuf,

    /// Timezone the post dates are shown in
    #[arg(short = 't', long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// Configuration file. Defaults are used when missing
    #[arg(short = 'c', long)]
    config_path: Option<PathBuf>,
}

fn open_config(config_path: &Option<PathBuf>) -> anyhow::Result<Config> {
    match config_path {
        Some(path) => load_config(path).with_context(|| format!("Cannot load {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = open_config(&args.config_path)?;

    if let Err(e) = configure_logger(&config) {
        warn!("Could not configure logging: {}", e);
    }

    convert(&config, &args.wxr_file, &args.output_pdf, &args.timezone)
        .with_context(|| format!("Cannot archive {}", args.wxr_file.display()))?;

    info!("PDF created: {}", args.output_pdf.display());
    Ok(())
}
