use anyhow::{Context, Result, bail};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use jj_log_graph::config::Config;
use jj_log_graph::layout::{NodeCreation, ParentLineCreation};
use jj_log_graph::render::svg;
use jj_log_graph::render_graph;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Json,
    Svg,
}

/// CLI arguments
#[derive(Default)]
struct CliArgs {
    /// Graph text file (stdin when absent)
    input: Option<PathBuf>,
    /// Settings file overriding the user config
    config: Option<PathBuf>,
    format: OutputFormat,
    parent_line_creation: Option<String>,
    node_creation: Option<String>,
    pretty: bool,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = CliArgs::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--input" => {
                args.input = iter.next().map(PathBuf::from);
            }
            "--config" => {
                args.config = iter.next().map(PathBuf::from);
            }
            "--format" => {
                args.format = match iter.next().as_deref() {
                    Some("json") => OutputFormat::Json,
                    Some("svg") => OutputFormat::Svg,
                    other => bail!("unknown output format: {other:?}"),
                };
            }
            "--parent-line-creation" => {
                args.parent_line_creation = iter.next();
            }
            "--node-creation" => {
                args.node_creation = iter.next();
            }
            "--pretty" => {
                args.pretty = true;
            }
            other if !other.starts_with('-') => {
                // Positional arg = input file
                args.input = Some(PathBuf::from(other));
            }
            other => {
                tracing::debug!("ignoring unknown flag {other}");
            }
        }
    }

    Ok(args)
}

fn load_config(args: &CliArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    if let Some(value) = &args.parent_line_creation {
        config.layout.parent_line_creation = value.parse::<ParentLineCreation>()?;
    }
    if let Some(value) = &args.node_creation {
        config.layout.node_creation = value.parse::<NodeCreation>()?;
    }

    Ok(config)
}

fn read_input(args: &CliArgs) -> Result<String> {
    match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read graph text from {path:?}")),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read graph text from stdin")?;
            Ok(text)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = parse_args()?;
    let config = load_config(&args)?;
    let text = read_input(&args)?;

    let render = render_graph(&text, &config);
    tracing::info!(
        nodes = render.nodes.len(),
        edges = render.edges.len(),
        max_column = render.max_column,
        "rendered graph"
    );

    let output = match args.format {
        OutputFormat::Json if args.pretty => {
            serde_json::to_string_pretty(&render).context("Failed to serialize graph")?
        }
        OutputFormat::Json => serde_json::to_string(&render).context("Failed to serialize graph")?,
        OutputFormat::Svg => {
            svg::to_svg_document(&render, &config.path).context("Failed to write SVG")?
        }
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes()).context("Failed to write output")?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n").context("Failed to write output")?;
    }

    Ok(())
}
