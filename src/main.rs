use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use retrace::engine::{ChoiceMode, RewriteEngine};
use retrace::history::RowOrder;
use retrace::ui::{self, components::Theme, OutputFormat, Program};
use retrace::{util, App, Config, Controller};
use tracing_subscriber::filter::Directive;

/// Step through the reductions of a rewrite program and rewind to any point
#[derive(Debug, Parser)]
#[command(name = "retrace", version, about)]
struct Args {
    /// Program file to reduce
    program: PathBuf,

    /// Which choices are offered at each state
    #[arg(long, value_enum)]
    mode: Option<ChoiceMode>,

    /// Binding whose expression is reduced
    #[arg(long)]
    entry: Option<String>,

    /// Config file (default: ~/.retrace/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory for logs and config (default: ~/.retrace)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Apply these choices (comma separated, numbered from 1) and print the
    /// history instead of starting the interactive view. Pass "" for none.
    #[arg(long, value_name = "CHOICES")]
    batch: Option<String>,

    /// Print batch output as JSON
    #[arg(long, requires = "batch")]
    json: bool,

    /// Show the oldest step first
    #[arg(long)]
    oldest_first: bool,

    /// Default log directive, e.g. `debug` or `retrace=trace`
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_logging(level: &str) -> Result<()> {
    fs::create_dir_all(util::logs_dir())
        .with_context(|| format!("Failed to create {}", util::logs_dir().display()))?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())
        .with_context(|| format!("Failed to open {}", util::log_file_path().display()))?;

    let directive: Directive = level
        .parse()
        .with_context(|| format!("Invalid log level `{level}`"))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .with_writer(log_file)
        .with_ansi(false)
        .init();
    Ok(())
}

fn parse_picks(list: &str) -> Result<Vec<usize>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .with_context(|| format!("Invalid choice `{s}` in --batch"))
        })
        .collect()
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(entry) = &args.entry {
        config.entry = entry.clone();
    }
    if args.oldest_first {
        config.order = RowOrder::OldestFirst;
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    util::init_data_dir(args.data_dir.clone());
    init_logging(&args.log_level)?;

    let config = load_config(&args)?;
    let program = Program::read(args.program.clone())
        .with_context(|| format!("Failed to read {}", args.program.display()))?;

    let mut controller = Controller::new(RewriteEngine::new())
        .with_mode(config.mode)
        .with_parse_options(config.parse_options())
        .with_history(config.order, config.tie_break);

    if let Some(list) = &args.batch {
        let picks = parse_picks(list)?;
        let format = if args.json {
            OutputFormat::Json
        } else if io::stdout().is_terminal() {
            OutputFormat::Color
        } else {
            OutputFormat::Plain
        };
        let mut stdout = io::stdout().lock();
        return ui::run_batch(&mut controller, &program.source, &picks, format, &mut stdout);
    }

    ui::install_panic_hook();
    let mut app = App::new(controller, program, Theme::from_config(&config.theme));
    app.run().await
}
