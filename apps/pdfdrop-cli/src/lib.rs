//! Command-line front end for the PDF processing service
//!
//! Runs the same widget pipeline as the browser binding, with local files
//! as input, `reqwest` as transport and the output directory as the
//! download target.

pub mod cli;
pub mod input;
pub mod output;
pub mod transport;

use anyhow::{bail, Context, Result};
use pdfdrop_core::{StaticFields, Widget, WidgetConfig};
use std::time::Duration;
use tracing::info;

pub use cli::Args;
pub use output::TerminalSurface;
pub use transport::ReqwestTransport;

/// Build the widget configuration: file, then command-line overrides
pub fn resolve_config(args: &Args) -> Result<WidgetConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            WidgetConfig::from_toml_str(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => WidgetConfig::default(),
    };

    if let Some(server) = &args.server {
        config.endpoint_base = server.clone();
    }
    if let Some(max_size) = args.max_size {
        config.max_file_size = max_size;
    }

    let config = config.validated()?;
    if config.endpoint_base.trim().is_empty() {
        bail!("No service URL: pass --server or set endpoint_base in the config file");
    }
    Ok(config)
}

/// Control values given with `--set`
pub fn fields_from(args: &Args) -> StaticFields {
    args.set
        .iter()
        .fold(StaticFields::new(), |fields, (control, value)| {
            fields.with(control.clone(), value.clone())
        })
}

pub async fn run(args: Args) -> Result<()> {
    let config = resolve_config(&args)?;
    let transport = ReqwestTransport::new(args.timeout_secs.map(Duration::from_secs))
        .context("Failed to build HTTP client")?;

    let candidates = args
        .files
        .iter()
        .map(|path| input::load_file(path))
        .collect::<Result<Vec<_>>>()?;

    let surface = TerminalSurface::new(args.output_dir.clone());
    let mut widget = Widget::new(config, surface, fields_from(&args));

    let report = widget.handle_files(candidates);
    if !report.rejected.is_empty() {
        bail!("{} of {} file(s) rejected", report.rejected.len(), args.files.len());
    }

    let outcome = widget
        .submit(&transport, &args.operation)
        .await
        .with_context(|| format!("{} failed", args.operation))?;

    info!(
        operation = %args.operation,
        artifact = %outcome.artifact().filename,
        "done"
    );
    Ok(())
}
