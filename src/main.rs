//! ReleaseRunner CLI Entry Point
//!
//! Walks the operator through the release procedure.
//!
//! # Usage
//!
//! ```bash
//! # Run the whole release procedure
//! releaserunner
//!
//! # Resume from a named step
//! releaserunner bumpversion
//!
//! # Show the step names available as resume targets
//! releaserunner --list
//!
//! # Stop when an automated command fails
//! releaserunner --strict
//!
//! # Use a custom procedure
//! releaserunner --procedure release.yaml
//! ```
//!
//! Exit status is 0 on completion, 1 when the operator interrupts a step
//! and 2 for any other failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use log::info;

use releaserunner::config::{
    RunConfig, DEFAULT_CI_URL, DEFAULT_DESCRIPTOR, DEFAULT_DOCS_URL, DEFAULT_VERSION_FILE,
};
use releaserunner::execution::{ConsoleOperator, Engine};
use releaserunner::workflow::{
    load_procedure, release_procedure, Context, PackageMetadataResolver, Procedure,
};
use releaserunner::{Result, APP_NAME, VERSION};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "releaserunner", version, about = "Resumable, operator-supervised release procedure")]
struct Cli {
    /// Step to resume from; every earlier step is skipped
    target: Option<String>,

    /// List the procedure's steps and exit
    #[arg(long)]
    list: bool,

    /// Stop the release when an automated command exits non-zero
    #[arg(long, env = "RELEASE_STRICT")]
    strict: bool,

    /// YAML procedure to run instead of the built-in one
    #[arg(long, value_name = "FILE", env = "RELEASE_PROCEDURE")]
    procedure: Option<PathBuf>,

    /// Project root
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Package descriptor holding the NAME = "..." line
    #[arg(long, value_name = "FILE", default_value = DEFAULT_DESCRIPTOR)]
    descriptor: PathBuf,

    /// Version file; {pkgname} is replaced by the lower-cased package name
    #[arg(long, value_name = "TEMPLATE", default_value = DEFAULT_VERSION_FILE)]
    version_file: String,

    /// CI status page opened after each push
    #[arg(long, value_name = "URL", env = "RELEASE_CI_URL", default_value = DEFAULT_CI_URL)]
    ci_url: String,

    /// Documentation build page
    #[arg(long, value_name = "URL", env = "RELEASE_DOCS_URL", default_value = DEFAULT_DOCS_URL)]
    docs_url: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> RunConfig {
        RunConfig {
            root: self.root.clone(),
            descriptor: self.descriptor.clone(),
            version_file: self.version_file.clone(),
            ci_url: self.ci_url.clone(),
            docs_url: self.docs_url.clone(),
            strict: self.strict,
            procedure_file: self.procedure.clone(),
        }
    }
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints the application banner with version information.
fn print_banner() {
    println!();
    println!("{} v{}", APP_NAME, VERSION);
    println!();
}

/// Prints each step name with a short description.
fn print_procedure(procedure: &Procedure) {
    let width = procedure.names().iter().map(|n| n.len()).max().unwrap_or(0);
    for (index, entry) in procedure.iter().enumerate() {
        println!(
            "{:>3}. {:width$}  {}",
            index + 1,
            entry.name,
            entry.step.describe(),
            width = width
        );
    }
}

/// Main application logic.
fn run(cli: Cli) -> Result<()> {
    let config = cli.config();
    let resolver = PackageMetadataResolver::new(&config);

    let procedure = match &config.procedure_file {
        Some(path) => load_procedure(path, &resolver)?,
        None => release_procedure(&config, &resolver)?,
    };

    if cli.list {
        print_procedure(&procedure);
        return Ok(());
    }

    print_banner();

    let metadata = resolver.resolve()?;
    info!("Releasing {} (current version {})", metadata.pkgname, metadata.version);
    if config.strict {
        info!("Strict mode: failing commands stop the release");
    }

    let mut context = Context::from_metadata(metadata).with_strict(config.strict);
    let mut engine = Engine::new(procedure);
    engine.set_target_opt(cli.target);

    let mut operator = ConsoleOperator::new()?;
    let timeline = engine.run(&mut context, &mut operator)?;

    println!();
    print!("{}", timeline.summary());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_interrupt() => {
            eprintln!("{}", "Release cancelled.".red());
            ExitCode::from(e.exit_code())
        }
        Err(e) => {
            eprintln!();
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::from(e.exit_code())
        }
    }
}
