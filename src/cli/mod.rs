//! CLI module - Command-line interface for contenthub
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// contenthub - multimedia content publishing backend
#[derive(Parser)]
#[command(name = "contenthub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Grant a role to a user by email
    GrantRole {
        /// Email the account was registered with
        email: String,
        /// admin, moderator or content_creator
        role: String,
    },

    /// Show the roles a user holds
    Roles {
        /// Email the account was registered with
        email: String,
    },

    /// List every user with their roles
    #[command(alias = "ls")]
    Users,
}

pub use commands::*;
