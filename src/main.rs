//! statgate entry point.
//!
//! A minimal dispatcher: parse arguments, run the selected command, print
//! errors to stderr, exit non-zero on failure. All logic lives in the
//! library.

use statgate::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
