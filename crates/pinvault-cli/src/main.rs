//! PinVault CLI — manage a PIN-protected recovery phrase from the terminal
//!
//! # Usage
//!
//! ```bash
//! pinvault status
//! PINVAULT_PIN=582071 pinvault save < phrase.txt
//! PINVAULT_PIN=582071 pinvault load
//! pinvault remove
//! ```

mod config;

use anyhow::{Context, Result};
use pinvault_core::pin::analyze_pin;
use pinvault_core::{Signer, WordCount};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use zeroize::Zeroizing;

/// Vault operations exposed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Status,
    Save,
    Load,
    Remove,
    Generate(WordCount),
    CheckPin,
    Validate,
}

fn main() -> Result<()> {
    // Parse CLI args (minimal — no clap dependency needed)
    let args: Vec<String> = std::env::args().collect();

    let mut config_path = PathBuf::from("pinvault.toml");
    let mut command = None;
    let mut words = WordCount::Words24;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i < args.len() {
                    config_path = PathBuf::from(&args[i]);
                } else {
                    anyhow::bail!("--config requires a path argument");
                }
            }
            "--words" | "-w" => {
                i += 1;
                let count = args
                    .get(i)
                    .and_then(|v| v.parse::<usize>().ok())
                    .and_then(WordCount::from_count)
                    .context("--words must be 12, 15, 18, 21, or 24")?;
                words = count;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--version" | "-V" => {
                println!("pinvault {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "status" => command = Some(Command::Status),
            "save" => command = Some(Command::Save),
            "load" => command = Some(Command::Load),
            "remove" => command = Some(Command::Remove),
            "generate" => command = Some(Command::Generate(WordCount::Words24)),
            "check-pin" => command = Some(Command::CheckPin),
            "validate" => command = Some(Command::Validate),
            other => {
                anyhow::bail!("Unknown argument: {}", other);
            }
        }
        i += 1;
    }

    let command = match command {
        Some(Command::Generate(_)) => Command::Generate(words),
        Some(c) => c,
        None => {
            print_help();
            return Ok(());
        }
    };

    // Load config
    let mut cli_config = config::CliConfig::from_file_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Apply env overrides
    cli_config.apply_env_overrides();

    // Validate
    cli_config
        .validate()
        .context("Configuration validation failed")?;

    // Init logger
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli_config.log.level.as_str()),
    )
    .init();

    if command == Command::Validate {
        println!("Configuration is valid.");
        println!("  Storage key:  {}", cli_config.vault.storage_key);
        println!("  Backend:      {}", cli_config.storage.backend);
        println!("  Store path:   {}", cli_config.store_path()?.display());
        println!(
            "  Argon2id:     m={} KiB, t={}, p={}",
            cli_config.kdf.m_cost, cli_config.kdf.t_cost, cli_config.kdf.p_cost
        );
        return Ok(());
    }

    let vault = cli_config.open_vault()?;

    // Build tokio runtime
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;

    match command {
        Command::Status => {
            if vault.exists() {
                println!("A wallet is stored under '{}'.", vault.storage_key());
            } else {
                println!("No wallet stored.");
            }
        }
        Command::Save => {
            let phrase = read_secret("PINVAULT_MNEMONIC", "Recovery phrase: ")?;
            let signer = Signer::from_phrase(&phrase).context("Invalid recovery phrase")?;

            let pin = read_secret("PINVAULT_PIN", "PIN: ")?;
            warn_weak_pin(&pin);

            rt.block_on(vault.save(&pin, &signer))
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Wallet saved.");
        }
        Command::Load => {
            let pin = read_secret("PINVAULT_PIN", "PIN: ")?;
            match rt.block_on(vault.load(&pin)) {
                Some(phrase) => println!("{}", phrase.as_str()),
                None => anyhow::bail!("No wallet could be unlocked with that PIN"),
            }
        }
        Command::Remove => {
            vault.remove();
            println!("Wallet removed.");
        }
        Command::Generate(words) => {
            let signer = Signer::generate(words)?;
            if let Some(phrase) = signer.mnemonic_phrase() {
                println!("{}", phrase.as_str());
            }
        }
        Command::CheckPin => {
            let pin = read_secret("PINVAULT_PIN", "PIN: ")?;
            let analysis = analyze_pin(&pin);
            println!("{}", analysis.strength.description());
            for warning in &analysis.warnings {
                println!("  - {}", warning);
            }
        }
        Command::Validate => unreachable!("handled above"),
    }

    Ok(())
}

/// Read a secret from `env_var`, or prompt on stderr and read one line from stdin.
fn read_secret(env_var: &str, prompt: &str) -> Result<Zeroizing<String>> {
    if let Ok(value) = std::env::var(env_var) {
        return Ok(Zeroizing::new(value));
    }

    eprint!("{}", prompt);
    io::stderr().flush().ok();

    let mut line = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    Ok(Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn warn_weak_pin(pin: &str) {
    let analysis = analyze_pin(pin);
    if !analysis.strength.is_recommended() {
        log::warn!("{}", analysis.strength.description());
        for warning in &analysis.warnings {
            log::warn!("PIN: {}", warning);
        }
    }
}

fn print_help() {
    println!(
        r#"PinVault — PIN-protected recovery phrase storage

USAGE:
    pinvault [OPTIONS] <COMMAND>

COMMANDS:
    status        Report whether a wallet is stored
    save          Encrypt a recovery phrase under a PIN and store it
    load          Decrypt and print the stored recovery phrase
    remove        Delete the stored wallet
    generate      Print a new random recovery phrase
    check-pin     Rate the strength of a PIN
    validate      Validate the configuration and exit

OPTIONS:
    -c, --config <PATH>   Config file path (default: pinvault.toml, optional)
    -w, --words <N>       Words for `generate`: 12, 15, 18, 21 or 24 (default: 24)
    -h, --help            Show this help message
    -V, --version         Show version

ENVIRONMENT VARIABLES:
    PINVAULT_PIN          PIN (otherwise read from stdin)
    PINVAULT_MNEMONIC     Recovery phrase for `save` (otherwise read from stdin)
    PINVAULT_STORAGE_KEY  Storage key override
    PINVAULT_BACKEND      Storage backend (file/sqlite)
    PINVAULT_DATA_DIR     Directory for the store file
    PINVAULT_LOG_LEVEL    Log level (error/warn/info/debug/trace)
"#
    );
}
