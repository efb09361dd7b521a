use crate::config::load_config;
use crate::ir::parse_hierarchy;
use crate::layout::compute_layout;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::render::{render_svg, write_output_png, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "hvr",
    version,
    about = "Render a Values → Goals → Metrics hierarchy as a diagram"
)]
pub struct Args {
    /// Hierarchy payload (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and layout output if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Minimum canvas width; grows to fit the widest tier
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    /// JSON dump of the computed boxes and connectors
    Layout,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.layout.canvas_width = width;
    }
    if let Some(height) = args.height {
        config.layout.canvas_height = height;
    }

    let input = read_input(args.input.as_deref())?;
    let data = parse_hierarchy(&input)?;
    info!(
        values = data.values.len(),
        goals = data.goals.len(),
        metrics = data.metrics.len(),
        "loaded hierarchy"
    );

    let layout = compute_layout(&data, &config.theme, &config.layout);
    debug!(width = layout.width, height = layout.height, edges = layout.edges.len(), "computed layout");

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&layout, &config.theme);
            write_output_png(&svg, &output, &config.render)?;
        }
        OutputFormat::Layout => match args.output.as_deref() {
            Some(path) => write_layout_dump(path, &layout)?,
            None => println!("{}", LayoutDump::from_layout(&layout).to_json()?),
        },
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("HVR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(io::stderr))
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
