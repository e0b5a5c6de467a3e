// scanlog CLI - interactive analyzer for zipped HTTP exchange captures

mod editor;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use editor::EditorSource;
use scanlog_core::{paths, Config, ScriptSource, Session, Shell};
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scanlog")]
#[command(about = "Interactive analyzer for zipped HTTP exchange logs", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Zip archive of captured exchanges
    archive: Option<PathBuf>,

    /// Run shell commands from a file instead of prompting
    #[arg(long, global = true)]
    script: Option<PathBuf>,

    /// Config file (defaults to ~/.scanlog/config.toml)
    #[arg(long, global = true, env = "SCANLOG_CONFIG")]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze logs from a zip file
    Analyze {
        /// Zip archive of captured exchanges
        archive: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scanlog={0},scanlog_core={0}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let archive = match cli.command {
        Some(Commands::Analyze { archive }) => archive,
        None => match cli.archive {
            Some(archive) => archive,
            None => {
                eprintln!("Error: no archive given (usage: scanlog <archive.zip>)");
                std::process::exit(2);
            }
        },
    };

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let session = match Session::load(&archive, &config.loader) {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to load {}: {}", archive.display(), e);
            eprintln!("Error processing zip file: {}", e);
            std::process::exit(1);
        }
    };
    info!("Session ready with {} records", session.len());

    let mut shell = Shell::new(session, config.clone());
    let mut stdout = io::stdout().lock();

    if let Some(script) = &cli.script {
        let file = File::open(script)
            .with_context(|| format!("Failed to open script {}", script.display()))?;
        debug!("Running script {}", script.display());
        let mut source = ScriptSource::new(BufReader::new(file));
        shell.run(&mut source, &mut stdout)?;
        return Ok(());
    }

    if !io::stdin().is_terminal() {
        debug!("stdin is not a terminal, reading commands from it");
        let mut source = ScriptSource::new(io::stdin().lock());
        shell.run(&mut source, &mut stdout)?;
        return Ok(());
    }

    let history_path = if config.shell.history {
        match paths::ensure_data_dir() {
            Ok(_) => Some(paths::get_history_path()),
            Err(e) => {
                debug!("History disabled, data dir unavailable: {}", e);
                None
            }
        }
    } else {
        None
    };

    let mut source = EditorSource::new(history_path).context("Failed to start line editor")?;
    shell.greet(&mut stdout)?;
    shell.run(&mut source, &mut stdout)?;
    source.save_history();

    Ok(())
}
