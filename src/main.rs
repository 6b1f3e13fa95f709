//! tauri-spy - Enable WebKitGTK DevTools in Tauri release builds
//!
//! Validates the target, then runs it with libspy.so preloaded so the web
//! inspector becomes available (Ctrl+Shift+I).

mod launch;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use spy::error::LaunchError;
use launch::LaunchOptions;

/// Enable WebKitGTK DevTools in Tauri release builds
#[derive(Parser, Debug)]
#[command(name = "tauri-spy", author, version, about, long_about = None)]
struct Args {
    /// Path to the target Tauri application binary
    target: PathBuf,

    /// Automatically open the inspector on launch
    #[arg(long, default_value_t = false)]
    auto_open: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Additional arguments to pass to the target application
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn report(err: &anyhow::Error) {
    eprintln!("{} {:#}", "error:".red().bold(), err);
    let hint = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<LaunchError>())
        .and_then(LaunchError::hint);
    if let Some(hint) = hint {
        eprintln!("  {} {}", "hint:".yellow().bold(), hint);
    }
}

fn main() -> ExitCode {
    // 1. Parse command line arguments
    let args = Args::parse();

    // 2. Initialize logger with verbosity level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        },
    ))
    .init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    log::debug!("Target: {:?}", args.target);
    log::debug!("Auto-open: {}", args.auto_open);

    // 3. Validate the target binary
    let info = launch::validate_target(&args.target)?;
    log::info!("Interpreter: {}", info.interpreter);
    if !info.links_webkit() {
        eprintln!(
            "{} {} does not link WebKitGTK directly",
            "warning:".yellow().bold(),
            args.target.display()
        );
    }

    // 4. Check WebKitGTK availability
    if !launch::check_webkit_available() {
        eprintln!(
            "{} WebKitGTK 4.1 not found on this system",
            "warning:".yellow().bold()
        );
        eprintln!(
            "  {} Install with: {}",
            "hint:".yellow().bold(),
            "sudo apt install libwebkit2gtk-4.1-dev".dimmed()
        );
        eprintln!(
            "  {} Continuing anyway, injection may still work if the target bundles WebKitGTK",
            "note:".cyan().bold()
        );
    }

    // 5. Find the injection library
    let library = launch::find_preload_library()?;

    println!(
        "{} Launching {} with DevTools enabled",
        "tauri-spy".cyan().bold(),
        args.target.display().to_string().green()
    );
    println!(
        "{} Injecting {}",
        "       >>>".cyan(),
        library.display().to_string().dimmed()
    );

    // 6. Run the target and mirror its exit code
    let options = LaunchOptions {
        target: args.target,
        args: args.args,
        auto_open: args.auto_open,
    };
    let status = launch::launch(&options, &library).context("Failed to launch target")?;
    if status.success() {
        return Ok(ExitCode::SUCCESS);
    }

    let code = launch::exit_code(&status);
    eprintln!("{} Target exited with code {}", "note:".cyan().bold(), code);
    Ok(ExitCode::from(code))
}
