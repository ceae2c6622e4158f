use std::fs::OpenOptions;

use clap::Parser;
use log::LevelFilter;
use termium::cli::commands::{cmd_browse, cmd_render};
use termium::cli::config::{AppConfig, Cli, Commands, load_config, resolve_trace_path};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    init_logging(&config, cli.verbose);

    let trace = resolve_trace_path(cli.trace.as_deref(), &config);

    match cli.command {
        Commands::Browse { url } => {
            cmd_browse(url.as_deref(), &config, trace)?;
        }
        Commands::Render { url, tree } => {
            let rendered = cmd_render(url.as_deref(), tree.as_deref(), &config, trace)?;
            if !rendered {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// The terminal belongs to the UI, so logs go to a file.
/// `RUST_LOG` wins over the -v count.
fn init_logging(config: &AppConfig, verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let file = match OpenOptions::new().create(true).append(true).open(&config.log.file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file '{}': {}", config.log.file, e);
            return;
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}
