use clap::{Parser, Subcommand, ValueEnum};
use gencheck_compare::ExpectedProject;
use gencheck_driver::Driver;
use gencheck_model::Project;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gencheck")]
#[command(author, version, about = "Verify build files produced by a project generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (use multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Set log level (overrides --verbose/--quiet)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Set log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List the targets a grammar exists for
    Targets,

    /// Parse generated artifacts and print the recovered project
    Parse {
        /// Grammar identifier
        #[arg(short, long)]
        target: String,

        /// Project name
        #[arg(short, long)]
        name: String,

        /// Project directory, relative to the workspace
        #[arg(long, default_value = ".")]
        path: String,

        /// Directory holding the generated artifacts
        #[arg(short, long, default_value = ".")]
        workspace: PathBuf,

        /// How to print the project
        #[arg(long, default_value = "debug")]
        format: OutputFormat,
    },

    /// Run a scenario file and compare the result with its expectation
    Check {
        /// Scenario file
        scenario: PathBuf,

        /// Workspace to use instead of the scenario's own
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Rust debug rendering
    Debug,
    /// The full model as JSON
    Json,
    /// An `[expect]` table matching the project exactly
    Expect,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet, cli.log_level, cli.log_format);

    match cli.command {
        Commands::Targets => {
            for id in gencheck_grammar::IDENTIFIERS {
                println!("{id}");
            }
        }

        Commands::Parse {
            target,
            name,
            path,
            workspace,
            format,
        } => {
            let project = Driver::new(workspace).parse(&target, &name, &path)?;
            println!("{}", render(&project, format)?);
        }

        Commands::Check {
            scenario,
            workspace,
        } => {
            let project = gencheck_driver::check_scenario(&scenario, workspace.as_deref())?;
            println!(
                "{}: OK ({} packages, {} configurations)",
                scenario.display(),
                project.packages().len(),
                project.configurations().len()
            );
        }
    }

    Ok(())
}

fn render(project: &Project, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Debug => Ok(format!("{project:#?}")),
        OutputFormat::Json => serde_json::to_string_pretty(project).into_diagnostic(),
        OutputFormat::Expect => toml::to_string_pretty(&ExpectedProject::exact(project)).into_diagnostic(),
    }
}

fn setup_logging(verbose: u8, quiet: bool, log_level: Option<LogLevel>, log_format: LogFormat) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if let Some(level) = log_level {
        EnvFilter::new(match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    } else if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Results go to stdout; keep it clean for `--format json`.
    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_level(true);

    match log_format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(formatter)
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(formatter.json())
                .with(filter)
                .init();
        }
    }
}
