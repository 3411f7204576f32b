//! Binary entry point for `st`.
//!
//! Exit codes: 0 on success, 1 on any error (including merge conflicts,
//! which are rendered before exiting).

use stratum::{cli, ui::output};

fn main() {
    if let Err(e) = cli::run() {
        output::error(e);
        std::process::exit(1);
    }
}
