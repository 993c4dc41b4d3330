use clap::Parser;
use flash2openpmd::config::ConversionConfig;
use flash2openpmd::source::JsonSource;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "flash2openpmd")]
#[command(about = "Convert an exported FLASH snapshot into an openPMD mesh record")]
struct Args {
    /// Path to the JSON conversion configuration
    config: PathBuf,

    /// Refinement level of the covering grid, overrides the configuration
    #[arg(long)]
    level: Option<u32>,

    /// Divide the field by its maximum before writing
    #[arg(long)]
    normalize: bool,

    /// Directory the container is written to, overrides the configuration
    #[arg(long = "output-dir")]
    output_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), flash2openpmd::Error> {
    let mut config = ConversionConfig::from_path(&args.config)?;

    if let Some(level) = args.level {
        config.level = level;
    }
    if args.normalize {
        config.normalize = true;
    }
    if let Some(directory) = args.output_dir {
        config.output.directory = directory;
    }

    let report = flash2openpmd::pipeline::convert(&JsonSource, &config)?;

    info!(shape = ?report.shape, "wrote {}", report.output.display());

    Ok(())
}
