//! QROS CLI — a ROS2 co-pilot in the terminal.
//!
//! Answers ROS2 questions grounded in a local documentation folder and
//! triages colcon build logs, launch files and TF trees with an LLM.

mod commands;
mod render;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
