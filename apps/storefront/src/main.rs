//! # Storefront CLI Entry Point
//!
//! ```text
//! $ storefront --backend simulated login jdoe --password secret1
//! $ storefront packages --category Beach --search bali
//! $ storefront whoami
//! ```
//!
//! The result is printed to stdout as JSON. A failure prints the
//! `{code, message}` error as JSON and exits non-zero.

use std::process::ExitCode;

use clap::Parser;

use wayfare_storefront::commands::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (output, code) = match wayfare_storefront::run(cli).await {
        Ok(value) => (serde_json::to_string_pretty(&value), ExitCode::SUCCESS),
        Err(error) => (serde_json::to_string_pretty(&error), ExitCode::FAILURE),
    };

    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to render output: {}", e);
            return ExitCode::FAILURE;
        }
    }
    code
}
