//! CLI tool for credit card validation.
//!
//! # Usage
//!
//! ```bash
//! # Validate a card number and expiration date
//! cardvalidate validate 4111111111111111 12/2030
//!
//! # Validate against a fixed reference time
//! cardvalidate validate 4111111111111111 12/2030 --now 2029-06-01T00:00:00Z
//!
//! # Identify the issuer
//! cardvalidate identify 6011111111111117
//!
//! # Luhn check only
//! cardvalidate luhn 4111111111111111
//!
//! # Print the active rule table as JSON
//! cardvalidate rules
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use cardvalidate::{
    luhn, mask, rules_json::RulesLoader, IssuerTable, ValidationError, Validator, DEFAULT_RULES,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(name = "cardvalidate")]
#[command(author, version, about = "Credit card number and expiration date validation")]
struct Cli {
    /// JSON rule file replacing the built-in issuer table
    #[arg(long, global = true, env = "CARDVALIDATE_RULES")]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a card number and its expiration date
    Validate {
        /// Card number (digits only)
        card_number: String,

        /// Expiration date (MM/YYYY)
        exp_date: String,

        /// Reference time in RFC 3339 (defaults to now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Identify the card issuer from the number's prefix
    Identify {
        /// Card number (digits only)
        card_number: String,
    },

    /// Check if a card number passes the Luhn algorithm
    Luhn {
        /// Card number (digits only)
        card_number: String,
    },

    /// Print the active issuer rules as JSON
    Rules,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            card_number,
            exp_date,
            now,
            output,
        } => {
            let card_number = Zeroizing::new(card_number);
            match load_table(cli.rules.as_ref()) {
                Ok(table) => cmd_validate(
                    &Validator::new(table),
                    &card_number,
                    &exp_date,
                    now.unwrap_or_else(Utc::now),
                    output,
                ),
                Err(code) => code,
            }
        }
        Commands::Identify { card_number } => {
            let card_number = Zeroizing::new(card_number);
            match load_table(cli.rules.as_ref()) {
                Ok(table) => cmd_identify(&table, &card_number),
                Err(code) => code,
            }
        }
        Commands::Luhn { card_number } => cmd_luhn(&Zeroizing::new(card_number)),
        Commands::Rules => cmd_rules(cli.rules.as_ref()),
    }
}

fn load_table(path: Option<&PathBuf>) -> Result<IssuerTable, ExitCode> {
    let result = match path {
        Some(path) => RulesLoader::load_table(path).map_err(|e| e.to_string()),
        None => IssuerTable::default_table().map_err(|e| e.to_string()),
    };
    result.map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(2)
    })
}

fn cmd_validate(
    validator: &Validator,
    card_number: &str,
    exp_date: &str,
    now: DateTime<Utc>,
    output: OutputFormat,
) -> ExitCode {
    let outcome = validator.validate_at(card_number, exp_date, now);
    let masked = mask::mask_number(card_number);

    match output {
        OutputFormat::Text => {
            println!("Card: {}", masked);
            match outcome {
                Ok(issuer) => {
                    println!("Valid: yes");
                    println!("Issuer: {}", issuer);
                }
                Err(e) => {
                    println!("Valid: no");
                    println!("Error: {}", e);
                }
            }
        }
        OutputFormat::Json => {
            let body = match outcome {
                Ok(issuer) => json!({ "valid": true, "card": masked, "issuer": issuer.name() }),
                Err(e) => json!({ "valid": false, "card": masked, "error": error_json(e) }),
            };
            println!("{:#}", body);
        }
    }

    if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn error_json(e: ValidationError) -> serde_json::Value {
    json!({ "code": e.code(), "message": e.message() })
}

fn cmd_identify(table: &IssuerTable, card_number: &str) -> ExitCode {
    let (issuer, length) = table.identify(card_number);
    if !issuer.is_known() {
        println!("Issuer: Unknown");
        return ExitCode::FAILURE;
    }

    println!("Issuer: {}", issuer);
    println!("Valid Lengths: {}", length);
    if !length.contains(card_number.len() as u64) {
        println!("Note: {} digits is not a valid length for {}", card_number.len(), issuer);
    }
    ExitCode::SUCCESS
}

fn cmd_luhn(card_number: &str) -> ExitCode {
    if luhn::passes(card_number) {
        println!("Luhn check: PASS");
        ExitCode::SUCCESS
    } else {
        println!("Luhn check: FAIL");
        ExitCode::FAILURE
    }
}

fn cmd_rules(path: Option<&PathBuf>) -> ExitCode {
    let rules = match path {
        Some(path) => RulesLoader::from_file(path),
        None => Ok(DEFAULT_RULES.to_vec()),
    };

    match rules.and_then(|rules| RulesLoader::to_json(&rules)) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
