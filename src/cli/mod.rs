//! CLI module for todo-auth
//!
//! - `serve`: run the HTTP server
//! - `hash-password`: print an Argon2 hash for provisioning seed users

pub mod hash_password;
pub mod serve;

use clap::{Parser, Subcommand};

/// Stateless bearer-token authentication service
#[derive(Parser)]
#[command(name = "todo-auth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Hash a password for use as a seed user's `password_hash`
    HashPassword(hash_password::HashPasswordArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["todo-auth", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));

        let cli = Cli::try_parse_from(["todo-auth", "hash-password", "s3cret-value"]).unwrap();
        match cli.command {
            Command::HashPassword(args) => assert_eq!(args.password, "s3cret-value"),
            Command::Serve => panic!("expected hash-password"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["todo-auth"]).is_err());
    }
}
