//! Command line entry point: argument parsing, dispatch, exit codes.

use clap::{Parser, Subcommand};

mod commands;

use commands::convert::ConvertArgs;

#[derive(Parser)]
#[command(name = "recast", version, about = "Convert line-structured source between languages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a source file to a target language
    Convert(ConvertArgs),
    /// List registered readers and writers
    Languages,
}

/// Reset SIGPIPE to default behavior so piping to `head` etc. doesn't panic.
#[cfg(unix)]
fn reset_sigpipe() {
    // SAFETY: signal(2) with SIG_DFL only changes the process signal
    // disposition; no Rust state is touched.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}

fn main() {
    reset_sigpipe();

    let cli = Cli::parse();
    let code = match cli.command {
        Command::Convert(args) => commands::convert::run(args),
        Command::Languages => commands::languages::run(),
    };
    std::process::exit(code);
}
