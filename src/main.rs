use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use megapix::{render_to_png, Backend, PixmapBackend, PngCompression, RenderOptions};

#[derive(Parser)]
#[command(name = "megapix")]
#[command(about = "Re-render a PNG through the subsampling/squash correction pipeline")]
struct Cli {
    /// Input PNG file
    input: PathBuf,

    /// Output PNG file path
    #[arg(short, long)]
    output: PathBuf,

    /// Target width in pixels (derived from the aspect ratio when omitted)
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Target height in pixels (derived from the aspect ratio when omitted)
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// PNG compression level
    #[arg(long, value_enum, default_value = "balanced")]
    compression: CompressionArg,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CompressionArg {
    Fast,
    Balanced,
    Best,
}

impl From<CompressionArg> for PngCompression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::Fast => PngCompression::Fast,
            CompressionArg::Balanced => PngCompression::Balanced,
            CompressionArg::Best => PngCompression::Best,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "megapix=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();
    let backend = PixmapBackend::new();

    let bytes = fs::read(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let image = backend.decode_png(&bytes)?;

    let mut options = RenderOptions::new().compression(cli.compression.into());
    if let Some(width) = cli.width {
        options = options.width(width);
    }
    if let Some(height) = cli.height {
        options = options.height(height);
    }

    let png = render_to_png(&backend, &image, &options)?;
    fs::write(&cli.output, &png)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    println!("Wrote {} ({} bytes)", cli.output.display(), png.len());
    Ok(())
}
