//! The `mlc` command: compile one ML source file.
//!
//! Usage: `mlc <file> [-g | --debug]`. Unrecognized flags are ignored. The
//! debug flag prints the AST tree and pauses for a newline before exiting.

use std::ffi::OsString;
use std::io::BufRead;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use mlc::{compile_file, Config};

#[derive(Parser)]
#[command(name = "mlc", version, about = "The ML compiler front-end")]
struct Cli {
    /// Path to the ML source file
    file: PathBuf,

    /// Print the AST tree and pause at shutdown
    #[arg(short = 'g', long = "debug")]
    debug: bool,

    /// Anything else is accepted and ignored.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    _rest: Vec<OsString>,
}

fn main() {
    #[cfg(windows)]
    let _ = ansi_term::enable_ansi_support();

    let cli = Cli::parse();
    let config = Config { debug: cli.debug };
    let code = compile_file(&cli.file.to_string_lossy(), &config);

    if cli.debug {
        eprintln!("press enter to exit");
        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
    }

    process::exit(code);
}
