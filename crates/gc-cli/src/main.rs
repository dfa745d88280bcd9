use anyhow::Context;
use clap::Parser;
use tracing::info;

use gc_config::GravConfig;
use gc_pipeline::Pipeline;

mod cli;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("gvc error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    if let cli::Commands::InitConfig { dir } = &cli.command {
        let path = GravConfig::write_template(dir)
            .with_context(|| format!("failed to write template into {}", dir.display()))?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let config = GravConfig::load(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;
    let pipeline = Pipeline::open(config)
        .await
        .context("failed to open project")?;

    match cli.command {
        cli::Commands::InitConfig { .. } => unreachable!("handled above"),
        cli::Commands::Load => {
            let summary = pipeline.load().await?;
            info!(?summary, "load complete");
        }
        cli::Commands::Process => pipeline.process().await?,
        cli::Commands::Export => {
            let files = pipeline.export().await?;
            info!(files, "export complete");
        }
        cli::Commands::Run => pipeline.run().await?,
    }
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("GRAVICORR_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
