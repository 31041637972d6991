use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::annotation::build_annotations;
use crate::config::{ConfigLoader, CONFIG_ENV};
use crate::sources;

pub mod commands;

use self::commands::Session;

#[derive(Parser, Debug)]
#[command(
    name = "todo-report",
    version,
    about = "Collects TODO comments from source files and prints them as tables"
)]
pub struct Cli {
    /// Directory to scan (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// File extension to scan, overriding the config file
    #[arg(long)]
    pub extension: Option<String>,

    /// Override the config file location (takes precedence over TODO_REPORT_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Run one command (e.g. `sort date`) and exit instead of prompting
    #[arg(trailing_var_arg = true)]
    pub command: Vec<String>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        env::set_var(CONFIG_ENV, path);
    }

    init_tracing(&cli.log_level)
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;
    let loader = ConfigLoader::discover()?;
    let mut config = loader.load_or_init()?;
    if let Some(extension) = cli.extension {
        config.scan.extension = extension;
        config.scan.normalize();
    }

    let root = match cli.root {
        Some(root) => root,
        None => env::current_dir().context("resolving current directory")?,
    };
    let files = sources::collect(&root, &config.scan)
        .with_context(|| format!("collecting .{} files under {}", config.scan.extension, root.display()))?;
    let annotations = build_annotations(&files);
    tracing::info!(
        files = files.len(),
        annotations = annotations.len(),
        "loaded todo comments"
    );

    let session = Session::new(annotations, config.collation.collator());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.command.is_empty() {
        let prompt = atty::is(atty::Stream::Stdin);
        session.run_interactive(io::stdin().lock(), &mut out, prompt)
    } else {
        session.run_once(&cli.command.join(" "), &mut out)
    }
}

fn init_tracing(level: &str) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| anyhow::anyhow!("{err}"))
    })
    .map(|_| ())
}
