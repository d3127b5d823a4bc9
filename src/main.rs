use clap::{ArgAction, Parser, Subcommand};
use dropgen::commands;
use dropgen::core::context::GenerationContext;
use dropgen::core::error::{DropError, print_error};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Synthesize release-protocol methods for resource-owning types
#[derive(Parser)]
#[command(name = "dropgen")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
  #[arg(short, long, global = true, action = ArgAction::Count)]
  verbose: u8,

  /// Use this config file instead of dropgen.toml discovery
  #[arg(long, global = true, value_name = "PATH")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show the release plan synthesized for each marked type
  Plan {
    /// Metadata snapshot (JSON)
    snapshot: PathBuf,
    /// Only show this type
    #[arg(long = "type", value_name = "NAME")]
    type_name: Option<String>,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show the methods and statements to emit for each marked type
  Actions {
    /// Metadata snapshot (JSON)
    snapshot: PathBuf,
    /// Only show this type
    #[arg(long = "type", value_name = "NAME")]
    type_name: Option<String>,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Plan every marked type; exit 3 if any cannot be planned
  Check {
    /// Metadata snapshot (JSON)
    snapshot: PathBuf,
    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },
}

impl Commands {
  fn snapshot(&self) -> &PathBuf {
    match self {
      Commands::Plan { snapshot, .. } | Commands::Actions { snapshot, .. } | Commands::Check { snapshot, .. } => {
        snapshot
      }
    }
  }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_logging(verbose: u8) {
  let default = match verbose {
    0 => "dropgen=warn",
    1 => "dropgen=info",
    _ => "dropgen=debug",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(DropError::message(format!("Failed to get current directory: {}", e))),
  };

  // Config and snapshot are loaded once and shared by the command
  let ctx = match GenerationContext::build(&root, cli.command.snapshot(), cli.config.as_deref()) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };
  debug!(
    snapshot = %ctx.snapshot_path.display(),
    release_method = %ctx.config.protocol.release_method,
    "context ready"
  );

  let result = match cli.command {
    Commands::Plan { type_name, json, .. } => commands::run_plan(&ctx, type_name, json),
    Commands::Actions { type_name, json, .. } => commands::run_actions(&ctx, type_name, json),
    Commands::Check { strict, json, .. } => commands::run_check(&ctx, strict, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: DropError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
