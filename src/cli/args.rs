//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug output
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stratum - a minimal content-addressed version control engine
#[derive(Parser, Debug)]
#[command(name = "st")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if st was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a repository in the current directory
    Init {
        /// Name of the default branch (default: master)
        #[arg(long)]
        branch: Option<String>,
    },

    /// Stage file snapshots for the next commit
    Add {
        /// Worktree-relative paths to stage
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Freeze the staged snapshot into a commit
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Show the commit history of the current branch
    Log {
        /// Emit machine-readable JSON, one record per commit
        #[arg(long)]
        json: bool,
    },

    /// Create a branch at the current tip, or list branches
    Branch {
        /// Name of the branch to create; omit to list branches
        name: Option<String>,
    },

    /// Switch HEAD to another branch
    Switch {
        /// Branch to make active
        name: String,
    },

    /// Merge a branch into the current branch
    Merge {
        /// Branch to merge in
        name: String,
    },

    /// Copy the repository byte-for-byte to a new directory
    Clone {
        /// Target directory (must not exist)
        target: PathBuf,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
