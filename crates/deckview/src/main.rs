mod animation;
mod app;
mod audio;
mod background;
mod cli;
mod colors;
mod commands;
mod config;
mod image_links;
mod nav_config;
mod navigation;
mod render;
mod schema;
mod state;
mod storage;
mod theme;

use clap::Parser;

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = cli.run() {
        log::debug!("{e:?}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
