//! prn-split
//!
//! Extracts the page images embedded in a printer spool (PRN) capture and
//! writes one file per page.

mod app;
mod config;
mod error;
mod sink;

use std::io;
use std::process;

use app::App;
use clap::Parser;
use config::{CliArgs, Config};
use sink::{DirectorySink, ListingSink};

fn main() {
    // Initialize logging with "warn" level by default
    // Users can set RUST_LOG=info or RUST_LOG=debug for more verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();

    // Load configuration with precedence: CLI > env > file > defaults
    let config = match Config::load_with_args(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    log::debug!(
        "Commands per page: {}, line break: {:?}, PJL aware: {}",
        config.commands_per_page,
        config.line_break,
        config.pjl_aware
    );

    let directory = config.output.directory.clone();
    let extension = config.output.extension.clone();
    let overwrite = config.output.overwrite;
    let app = App::new(config, args.input.clone());

    let result = if args.list {
        app.run(&mut ListingSink::new(io::stdout().lock()))
    } else {
        let stem = app
            .input()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "page".to_string());
        let mut sink = DirectorySink::new(&directory, &stem, &extension, overwrite);
        let result = app.run(&mut sink);
        for path in sink.written() {
            println!("{}", path.display());
        }
        result
    };

    match result {
        Ok(total) => log::info!("{} page(s) extracted from {}", total, app.input().display()),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("prn-split: {}", e);
            process::exit(1);
        }
    }
}
