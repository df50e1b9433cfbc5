//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <file>`: Use this config file instead of searching
//! - `--locations <file>`: Use this location set instead of the configured one
//! - `--debug`: Enable debug logging
//! - `--log-json`: Emit log events as JSON lines
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gitfleet - Live status across many git working copies
#[derive(Parser, Debug)]
#[command(name = "gitfleet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Location set (JSON) to use instead of the configured one
    #[arg(long, global = true, value_name = "FILE")]
    pub locations: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Emit log events as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

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
    /// Classify every repository and print fleet-wide counters
    #[command(
        name = "summary",
        long_about = "Classify every repository and print fleet-wide counters.\n\n\
            Repositories are resolved from the location set, each one is opened and \
            classified from scratch, and the results are folded into counters: how many \
            are dirty, ahead of or behind their upstream, drifting from other remote \
            branches, not trackable, without remote branches, or missing.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Morning check across all working copies
    gitfleet summary

    # Which repositories need attention, grouped by condition
    gitfleet summary --details

READING THE OUTPUT:
    Behind / Ahead                  relative to the configured upstream
    Non-Tracking Behind / Ahead     relative to any other remote branch
    Not tracking                    a branch pair could not be compared"
    )]
    Summary {
        /// List the repositories behind each counter
        #[arg(short, long)]
        details: bool,

        /// Print counters as JSON
        #[arg(long)]
        json: bool,
    },

    /// List resolved repositories with a one-word state
    #[command(
        name = "list",
        after_help = "\
STATES:
    not-found      no repository at the path
    no-remote      no remote-tracking branches
    not-tracking   a branch pair could not be compared
    behind/ahead   relative to the configured upstream
    nt-behind/nt-ahead  relative to another remote branch
    dirty / clean  working tree state"
    )]
    List {
        /// Print paths only
        #[arg(short, long)]
        paths: bool,
    },

    /// Verbose per-repository status
    #[command(
        name = "status",
        long_about = "Show the verbose status of repositories.\n\n\
            For each repository prints the clean flag, change categories (when dirty), \
            and the ahead/behind counts of every local branch against every \
            remote-tracking branch. With --full, also lists branches, remotes and the \
            upstream of the checked-out branch.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Every repository in the location set
    gitfleet status

    # Just one, with everything
    gitfleet status --full ~/src/project"
    )]
    Status {
        /// Show every change category, branches and remotes
        #[arg(long)]
        full: bool,

        /// Repositories to report on (defaults to the whole location set)
        #[arg(value_name = "PATH")]
        paths: Vec<String>,
    },

    /// Write the CSV report
    #[command(
        name = "csv",
        after_help = "\
WORKFLOW EXAMPLES:
    # Write to the configured file (default 'Repository Summary.csv')
    gitfleet csv

    # Pipe to another tool
    gitfleet csv -o - | column -s, -t"
    )]
    Csv {
        /// Output file, or '-' for stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show or edit the location set
    Locations {
        #[command(subcommand)]
        action: LocationsAction,
    },

    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion script
    #[command(
        name = "completion",
        after_help = "\
INSTALLATION:
    # Bash
    gitfleet completion bash > ~/.local/share/bash-completion/completions/gitfleet

    # Zsh
    gitfleet completion zsh > ~/.zfunc/_gitfleet

    # Fish
    gitfleet completion fish > ~/.config/fish/completions/gitfleet.fish

    # PowerShell
    gitfleet completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Location set subcommands.
#[derive(Subcommand, Debug)]
pub enum LocationsAction {
    /// Print the location set
    Show {
        /// Print the raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a directory whose immediate subdirectories are repositories
    AddParent { path: String },
    /// Add a single repository
    AddRepo { path: String },
    /// Exclude a repository
    Exclude { path: String },
    /// Remove a path from every list
    Remove { path: String },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration and where it came from
    Show,
    /// Write a default config file if none exists
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Shell types for completion generation.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
