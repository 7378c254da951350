use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;
mod cursor;
mod error;
mod group;
mod registry;
mod view;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser, Debug)]
#[command(name = "cy-alias")]
#[command(about = "Manage a tree of short aliases for filesystem paths", long_about = None)]
struct Cli {
    /// Registry file to read and update.
    #[arg(long, global = true, env = config::REGISTRY_ENV, value_name = "PATH")]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    cmd: commands::Command,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let path = config::resolve_registry_path(cli.registry)?;

    // 1) Load; a missing file is an empty registry.
    let mut registry = registry::Registry::load(&path)
        .with_context(|| format!("could not load alias registry {}", path.display()))?;

    // 2) Apply the command; output is written as each argument is handled.
    commands::execute(&cli.cmd, &mut registry, &mut std::io::stdout().lock())?;

    // 3) Persist, only if something changed.
    registry.save(&path)?;

    Ok(())
}
