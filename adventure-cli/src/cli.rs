use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "adventure-cli")]
#[command(about = "Monthly activity grid for the adventure log")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an account and log in
    Signup {
        email: String,
    },
    /// Log in with email and password
    Login {
        email: String,
    },
    /// End the session and remove it from disk
    Logout,
    /// Render the grid for a month
    Show {
        /// Month as YYYY-MM; defaults to the current month
        #[arg(long)]
        month: Option<String>,
    },
    /// Set one cell, e.g. `set 15 Reading 1:30`. An empty value clears it
    Set {
        /// Day of month (15) or full date (2026-01-15)
        day: String,
        /// Category name or id
        category: String,
        /// Minutes (90) or h:mm (1:30)
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Month the day number belongs to; defaults to the current month
        #[arg(long)]
        month: Option<String>,
    },
    /// List categories
    Categories,
    /// Add a category column
    AddCategory {
        name: String,
    },
    /// Print config path and create default file if missing
    ConfigPath,
}
