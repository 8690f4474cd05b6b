use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use snafu::ResultExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use plancal_core::consts::*;
use plancal_core::error::IoReadSnafu;
use plancal_core::{FrenchMonth, PaddleOcr, PaddleOcrConfig, Planner, PlannerConfigBuilder};

#[derive(Parser)]
#[command(name = "plancal")]
#[command(about = "Turn a scanned planning pdf into a spreadsheet and a calendar")]
struct Args {
    #[arg(help = "Input PDF file path")]
    input: PathBuf,

    #[arg(short, long, default_value = DEFAULT_MONTH, help = "French name of the planning month")]
    month: FrenchMonth,

    #[arg(short, long, default_value_t = DEFAULT_YEAR, help = "Year of the planning")]
    year: i32,

    #[arg(short, long, default_value = "output", help = "Output directory")]
    output: PathBuf,

    #[arg(long, env = DET_MODEL_PATH_ENV_NAME, help = "PaddleOCR detection model")]
    det_model: PathBuf,

    #[arg(long, env = REC_MODEL_PATH_ENV_NAME, help = "PaddleOCR recognition model")]
    rec_model: PathBuf,

    #[arg(long, default_value_t = RENDER_SCALE, help = "Page render scale")]
    render_scale: f32,

    #[arg(long, help = "Print the events as json instead of writing files")]
    dry_run: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "plancal_core=info".into()),
        )
        .init();

    let args = Args::parse();
    info!("Input PDF: {}", args.input.display());

    let config = PlannerConfigBuilder::default()
        .month(args.month)
        .year(args.year)
        .build()?;

    let document = std::fs::read(&args.input).context(IoReadSnafu {
        path: args.input.to_string_lossy(),
    })?;

    let mut engine = PaddleOcr::new(
        &args.det_model,
        &args.rec_model,
        PaddleOcrConfig {
            render_scale: args.render_scale,
            ..PaddleOcrConfig::default()
        },
    )?;
    let planner = Planner::new(config);

    if args.dry_run {
        let events = planner.events(&mut engine, &document);
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    let output = planner.process(&mut engine, &document, &args.output)?;
    println!("{}", output.paths.xlsx.display());
    println!("{}", output.paths.ics.display());

    Ok(())
}
