mod app;
mod browser;
mod cli;
mod preview;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nn_visualizer_3d=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
