use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use shaderlens::cli::{
    load_sources, run_builtins, run_check, run_functions, run_graph, run_resolve, Args, Command,
};
use shaderlens::config::Config;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(args.command.path())?,
    };
    let sources = load_sources(args.command.path(), &config)?;
    let registry = &sources.registry;

    let clean = match &args.command {
        Command::Check { .. } => run_check(&sources),
        Command::Resolve { name, list, .. } => {
            run_resolve(registry, name, *list)?;
            true
        }
        Command::Builtins { name, .. } => {
            run_builtins(registry, name)?;
            true
        }
        Command::Functions { path, json } => {
            run_functions(registry, path, *json)?;
            true
        }
        Command::Graph { path, json, output } => {
            run_graph(registry, path, *json, output.as_deref())?;
            true
        }
    };

    if !clean {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "shaderlens=debug" } else { "shaderlens=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
