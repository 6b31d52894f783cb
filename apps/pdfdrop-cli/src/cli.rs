use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pdfdrop")]
#[command(version, about = "Submit PDF files to a PDF processing service")]
pub struct Args {
    /// merge, split, watermark, toImages, rotate, addText, extractText, organize or secure
    pub operation: String,

    /// Input files, in submission order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Service base URL, e.g. http://localhost:5000
    #[arg(short, long)]
    pub server: Option<String>,

    /// Operation parameter, by control id (e.g. --set page-ranges=1-3)
    #[arg(long = "set", value_name = "CONTROL=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Where the result is written
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Per-file size limit in bytes
    #[arg(long)]
    pub max_size: Option<u64>,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// Parse `control=value`; the value may itself contain '='
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (control, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CONTROL=VALUE, got '{}'", raw))?;

    let control = control.trim();
    if control.is_empty() {
        return Err(format!("missing control id in '{}'", raw));
    }
    Ok((control.to_string(), value.to_string()))
}
