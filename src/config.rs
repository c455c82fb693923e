//! Command line configuration.

use crate::charts::ChartConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "avocado_charts")]
#[command(about = "Aggregate avocado sales data and render descriptive charts", long_about = None)]
pub struct Cli {
    /// Delimited avocado sales file with a header row
    #[arg(value_name = "INPUT", env = "AVOCADO_CSV", default_value = "avocado.csv")]
    pub input: PathBuf,

    /// Directory the PNG charts are written to
    #[arg(short, long, env = "AVOCADO_CHARTS_DIR", default_value = "charts")]
    pub out_dir: PathBuf,

    /// Chart width in pixels
    #[arg(long, default_value_t = 1400)]
    pub width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = 700)]
    pub height: u32,

    /// Field separator of the input file
    #[arg(long, default_value_t = ',')]
    pub separator: char,

    /// Also write every aggregate as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    /// Open each chart in the system viewer once rendered
    #[arg(long, default_value_t = false)]
    pub open: bool,
}

/// Resolved settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub separator: u8,
    pub charts: ChartConfig,
    pub summary: Option<PathBuf>,
    pub open: bool,
}

impl TryFrom<Cli> for Config {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if !cli.separator.is_ascii() {
            anyhow::bail!("separator must be a single ASCII character, got {:?}", cli.separator);
        }
        if cli.width == 0 || cli.height == 0 {
            anyhow::bail!("chart size must be non-zero, got {}x{}", cli.width, cli.height);
        }

        Ok(Self {
            input: cli.input,
            separator: cli.separator as u8,
            charts: ChartConfig {
                out_dir: cli.out_dir,
                width: cli.width,
                height: cli.height,
            },
            summary: cli.summary,
            open: cli.open,
        })
    }
}
