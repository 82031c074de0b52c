mod api;
mod app;
mod config;
mod error;
mod gallery;
mod models;
mod storage;
mod ui;

#[cfg(test)]
mod test_utils;

use std::ffi::OsStr;
use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::filter::Directive;

use app::{Command, FolioApp, USAGE};
use config::Config;

fn parse_path(s: &OsStr) -> Result<PathBuf, &'static str> {
    Ok(PathBuf::from(s))
}

fn main() -> Result<()> {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "folio=info".parse::<Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{}", USAGE);
        return Ok(());
    }

    let db = args.opt_value_from_os_str("--db", parse_path)?;
    let command = Command::from_args(args)?;

    let config = Config::load(db)?;
    FolioApp::new(config).run(command)
}
