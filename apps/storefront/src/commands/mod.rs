//! # CLI Commands
//!
//! Each subcommand drives one or two storefront operations and returns a
//! JSON value for stdout.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (Cli, dispatch to handlers)
//! ├── catalog.rs   ◄─── packages, package, featured
//! ├── auth.rs      ◄─── login, register, logout, refresh, profile, whoami
//! └── bookings.rs  ◄─── bookings
//! ```
//!
//! Logs go to stderr, so stdout carries only the JSON result:
//! ```text
//! $ storefront packages --category Beach | jq '.packages[].title'
//! "Sunny Beach Paradise"
//! "Island Hopping"
//! ```

pub mod auth;
pub mod bookings;
pub mod catalog;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use wayfare_client::BackendKind;

use crate::error::ApiResult;
use crate::state::Storefront;

/// Travel storefront client.
#[derive(Debug, Parser)]
#[command(name = "storefront", version, about)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured backend (http | simulated)
    #[arg(long, global = true)]
    pub backend: Option<BackendKind>,

    /// Keep the session in memory for this run only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List packages, narrowed by filters and free-text search
    Packages(catalog::PackagesArgs),

    /// Show one package
    Package {
        id: String,
    },

    /// List featured packages
    Featured,

    /// Sign in
    Login(auth::LoginArgs),

    /// Create an account and sign in
    Register(auth::RegisterArgs),

    /// Sign out and forget the stored session
    Logout,

    /// Rotate the stored tokens
    Refresh,

    /// Update profile fields of the current session
    Profile(auth::ProfileArgs),

    /// List bookings of the signed-in user
    Bookings(bookings::BookingsArgs),

    /// Show the stored session
    Whoami,
}

/// Runs one command against the store.
pub async fn execute(store: &Storefront, command: Command) -> ApiResult<Value> {
    match command {
        Command::Packages(args) => catalog::packages(store, args).await,
        Command::Package { id } => catalog::package(store, &id).await,
        Command::Featured => catalog::featured(store).await,
        Command::Login(args) => auth::login(store, args).await,
        Command::Register(args) => auth::register(store, args).await,
        Command::Logout => auth::logout(store).await,
        Command::Refresh => auth::refresh(store).await,
        Command::Profile(args) => auth::profile(store, args).await,
        Command::Bookings(args) => bookings::bookings(store, args).await,
        Command::Whoami => Ok(auth::whoami(store)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "storefront",
            "--backend",
            "http",
            "packages",
            "--category",
            "Beach",
        ])
        .unwrap();

        assert_eq!(cli.backend, Some(BackendKind::Http));
        match cli.command {
            Command::Packages(args) => assert_eq!(args.category.as_deref(), Some("Beach")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["storefront", "--backend", "grpc", "featured"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
