//! Server binary entry point

use std::path::PathBuf;

use clap::Parser;
use plancal_core::{
    FrenchMonth, PaddleOcr, PaddleOcrConfig, Planner, PlannerConfigBuilder,
    consts::{DEFAULT_MONTH, DEFAULT_YEAR},
};
use plancal_server::{AppState, start_server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "plancal-server")]
#[command(about = "Serve planning pdf conversions over HTTP")]
struct Args {
    #[arg(long, env = "PLANCAL_ADDR", default_value = "0.0.0.0:8080")]
    addr: String,

    #[arg(long, env = "PLANCAL_OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    #[arg(long, env = "PLANCAL_MONTH", default_value = DEFAULT_MONTH)]
    month: FrenchMonth,

    #[arg(long, env = "PLANCAL_YEAR", default_value_t = DEFAULT_YEAR)]
    year: i32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plancal_server=info,plancal_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = PlannerConfigBuilder::default()
        .month(args.month)
        .year(args.year)
        .build()?;

    // models load once; every upload reuses them
    let engine = PaddleOcr::from_env(PaddleOcrConfig::default())?;
    let state = AppState::new(engine, Planner::new(config), args.output_dir);

    start_server(&args.addr, state).await?;
    Ok(())
}
