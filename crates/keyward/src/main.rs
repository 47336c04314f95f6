// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyward - a self-hosted password manager backend.
//!
//! This is the binary entry point.

mod check;
mod serve;
mod shutdown;
mod tools;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use keyward_config::model::KeywardConfig;
use keyward_vault::GeneratorOptions;
use keyward_vault::generator::{DEFAULT_LENGTH, MAX_LENGTH, MIN_LENGTH};
use secrecy::ExposeSecret;

/// Keyward - a self-hosted password manager backend.
#[derive(Parser, Debug)]
#[command(name = "keyward", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server.
    Serve,
    /// Validate configuration and report whether the secret key is set.
    Check,
    /// Encrypt stdin into a ciphertext token.
    Encrypt,
    /// Decrypt a ciphertext token read from stdin.
    Decrypt,
    /// Generate a random password.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Password length.
    #[arg(
        long,
        default_value_t = DEFAULT_LENGTH as u16,
        value_parser = clap::value_parser!(u16).range(MIN_LENGTH as i64..=MAX_LENGTH as i64)
    )]
    length: u16,
    /// Include lowercase letters.
    #[arg(long)]
    lowercase: bool,
    /// Leave out uppercase letters.
    #[arg(long)]
    no_uppercase: bool,
    /// Leave out digits.
    #[arg(long)]
    no_numbers: bool,
    /// Leave out symbols.
    #[arg(long)]
    no_symbols: bool,
    /// Extra characters to draw from.
    #[arg(long, default_value = "")]
    custom: String,
    /// Characters never to use.
    #[arg(long, default_value = "")]
    exclude: String,
    /// Text that must appear verbatim in the password.
    #[arg(long, default_value = "")]
    required: String,
    /// Shuffle this password instead of generating a new one.
    #[arg(long, value_name = "PASSWORD")]
    shuffle: Option<String>,
}

impl From<&GenerateArgs> for GeneratorOptions {
    fn from(args: &GenerateArgs) -> Self {
        Self {
            length: usize::from(args.length),
            uppercase: !args.no_uppercase,
            lowercase: args.lowercase,
            numbers: !args.no_numbers,
            symbols: !args.no_symbols,
            custom_chars: args.custom.clone(),
            exclude_chars: args.exclude.clone(),
            required: args.required.clone(),
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> KeywardConfig {
    let loaded = match path {
        Some(path) => keyward_config::load_and_validate_path(path),
        None => keyward_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            keyward_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    init_tracing(&config.log.level);

    let result = match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Check => check::run_check(&config),
        Commands::Encrypt => tools::run_encrypt(&config.cipher)
            .await
            .map(|token| println!("{token}")),
        Commands::Decrypt => tools::run_decrypt(&config.cipher)
            .await
            .map(|plaintext| println!("{}", plaintext.expose_secret())),
        Commands::Generate(args) => {
            tools::run_generate(&GeneratorOptions::from(&args), args.shuffle.as_deref())
                .map(|password| println!("{password}"))
        }
    };

    if let Err(e) = result {
        eprintln!("keyward: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so `encrypt`, `decrypt`, and `generate` output stays
/// pipeable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("keyward={log_level},tower_http=info,warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
