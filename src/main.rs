use clap::{Args, Parser, Subcommand};
use shiplog::commands;
use shiplog::core::context::ProjectContext;
use shiplog::core::error::{ShipError, print_error};
use shiplog::pipeline::Target;
use std::path::PathBuf;

/// Version stamping, changelog generation and gated release stages
#[derive(Parser)]
#[command(name = "shiplog")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Log filter for diagnostics on stderr (RUST_LOG takes precedence)
  #[arg(long, global = true, default_value = "warn")]
  log_level: String,

  #[command(subcommand)]
  command: Commands,
}

/// Flags shared by every pipeline target
#[derive(Args)]
struct RunFlags {
  /// Print the stage plan without running anything
  #[arg(long)]
  dry_run: bool,
  /// Output the run report in JSON format
  #[arg(long)]
  json: bool,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Pipeline targets
  // ============================================================================
  /// Stamp the working-copy version and build
  Build {
    #[command(flatten)]
    flags: RunFlags,
  },

  /// Build, then run the test step
  Test {
    #[command(flatten)]
    flags: RunFlags,
  },

  /// Build, then install
  Install {
    #[command(flatten)]
    flags: RunFlags,
  },

  /// Distribution build: version, build, test, changelog, package
  Dist {
    /// Snapshot suffix appended to the release version (overrides package.snapshot)
    #[arg(long)]
    snapshot: Option<String>,
    #[command(flatten)]
    flags: RunFlags,
  },

  /// Build, then generate documentation
  Doc {
    #[command(flatten)]
    flags: RunFlags,
  },

  /// Remove transient build outputs
  Clean {
    #[command(flatten)]
    flags: RunFlags,
  },

  // ============================================================================
  // Standalone tools
  // ============================================================================
  /// Show the version a build would use
  Version {
    /// Resolve for a distribution build
    #[arg(long)]
    dist: bool,
    /// Snapshot suffix for distribution builds
    #[arg(long)]
    snapshot: Option<String>,
    /// Write the version file
    #[arg(long)]
    write: bool,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Generate the changelog from the log export
  Changelog {
    /// Read the log export from this file instead of the configured source
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output file, or `-` for stdout (default: changelog.file)
    #[arg(short, long)]
    output: Option<String>,
    /// Output format: text (default), json
    #[arg(long, default_value = "text")]
    format: String,
  },

  /// Create shiplog.toml in the current directory
  Init {
    /// Overwrite an existing configuration
    #[arg(long)]
    force: bool,
  },
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

fn main() {
  let cli = Cli::parse();
  shiplog::logging::init(&cli.log_level);

  let project_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  // init runs before shiplog.toml exists
  if let Commands::Init { force } = cli.command {
    if let Err(err) = commands::run_init(&project_root, force) {
      handle_error(err);
    }
    return;
  }

  let ctx = match ProjectContext::load(&project_root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Build { flags } => commands::run_target(&ctx, Target::Build, None, flags.dry_run, flags.json),
    Commands::Test { flags } => commands::run_target(&ctx, Target::Test, None, flags.dry_run, flags.json),
    Commands::Install { flags } => commands::run_target(&ctx, Target::Install, None, flags.dry_run, flags.json),
    Commands::Dist { snapshot, flags } => commands::run_target(&ctx, Target::Dist, snapshot, flags.dry_run, flags.json),
    Commands::Doc { flags } => commands::run_target(&ctx, Target::Doc, None, flags.dry_run, flags.json),
    Commands::Clean { flags } => commands::run_target(&ctx, Target::Clean, None, flags.dry_run, flags.json),

    Commands::Version {
      dist,
      snapshot,
      write,
      json,
    } => commands::run_version(&ctx, dist, snapshot, write, json),
    Commands::Changelog { input, output, format } => commands::run_changelog(&ctx, input, output, format),
    Commands::Init { .. } => Ok(()),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ShipError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
