//! xpc - render HTML templates with conditional and responsive-image helpers.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use xpc_tags::cli::{self, Cli, Commands};
use xpc_tags::config::XpcConfig;
use xpc_tags::{debug, logger};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Render { args } => {
            let config = XpcConfig::load(&cli.config)?;
            if let Some(path) = &config.config_path {
                debug!("config"; "using {}", path.display());
            }
            cli::render::run_render(args, &config).await
        }
        Commands::Markers => cli::markers::print_markers(),
    }
}
