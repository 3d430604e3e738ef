mod commands;
mod core;
mod metrics;
mod utils;

use clap::{Args, Parser, Subcommand};
use crate::commands::QueryRequest;
use crate::core::config::{QuerySettings, TraversalKind};
use crate::core::error::{KeysError, print_error};
use crate::core::hooks::{NoopHooks, QueryHooks, TracingHooks};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// DevOps four key metrics from a repository's release tags
#[derive(Parser)]
#[command(name = "four-keys")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,

  #[command(flatten)]
  query: QueryArgs,
}

#[derive(Subcommand)]
enum Commands {
  /// List every release in the window with its classification
  Releases,
}

#[derive(Args)]
struct QueryArgs {
  /// Local path or remote URL of the repository (default: current directory)
  #[arg(short, long, global = true)]
  repository: Option<String>,

  /// Start of the window, inclusive (YYYY-MM-DD or RFC 3339; default: 365 days before --until)
  #[arg(long, global = true)]
  since: Option<String>,

  /// End of the window, exclusive; a bare date covers that whole day (default: now)
  #[arg(long, global = true)]
  until: Option<String>,

  /// Skip tags whose name matches this regex
  #[arg(long, global = true)]
  ignore_pattern: Option<String>,

  /// Commit messages matching this regex mark a fix (default: hotfix)
  #[arg(long, global = true)]
  fix_commit_pattern: Option<String>,

  /// Commit-range traversal backend (default: native for paths, in-process for URLs)
  #[arg(long, global = true, value_enum)]
  traversal: Option<TraversalKind>,

  /// Read options from this file instead of searching for four-keys.toml
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Pretty-print the JSON output
  #[arg(long, global = true)]
  pretty: bool,

  /// Log debug output to stderr
  #[arg(long, global = true)]
  debug: bool,

  /// Log phase timings to stderr
  #[arg(long, global = true)]
  timer: bool,
}

impl QueryArgs {
  fn request(&self) -> QueryRequest {
    QueryRequest {
      repository: self.repository.clone(),
      config: self.config.clone(),
      settings: QuerySettings {
        since: self.since.clone(),
        until: self.until.clone(),
        ignore_pattern: self.ignore_pattern.clone(),
        fix_commit_pattern: self.fix_commit_pattern.clone(),
        traversal: self.traversal,
      },
    }
  }

  fn log_level(&self) -> Level {
    if self.debug {
      Level::DEBUG
    } else if self.timer {
      Level::INFO
    } else {
      Level::WARN
    }
  }
}

fn get_styles() -> clap::builder::Styles {
  let yellow = anstyle::Color::Ansi(anstyle::AnsiColor::Yellow);
  let green = anstyle::Color::Ansi(anstyle::AnsiColor::Green);
  let red = anstyle::Color::Ansi(anstyle::AnsiColor::Red);

  clap::builder::Styles::styled()
    .usage(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
    .header(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
    .literal(anstyle::Style::new().fg_color(Some(green)))
    .invalid(anstyle::Style::new().bold().fg_color(Some(red)))
    .error(anstyle::Style::new().bold().fg_color(Some(red)))
    .valid(anstyle::Style::new().bold().underline().fg_color(Some(green)))
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Logs go to stderr so stdout stays valid JSON. `RUST_LOG` wins over flags.
fn init_tracing(level: Level) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

  tracing_subscriber::registry()
    .with(env_filter)
    .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
    .try_init()
    .ok();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.query.log_level());

  let hooks: Box<dyn QueryHooks> = if cli.query.debug || cli.query.timer {
    Box::new(TracingHooks::new(cli.query.timer))
  } else {
    Box::new(NoopHooks)
  };
  let request = cli.query.request();

  let result = match cli.command {
    None => commands::run_metrics(request, cli.query.pretty, hooks.as_ref()),
    Some(Commands::Releases) => commands::run_releases(request, cli.query.pretty, hooks.as_ref()),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: KeysError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
