use clap::{Parser, Subcommand};
use flagwise_core::AttributeValue;
use std::path::PathBuf;

const DEFAULT_DATAFILE: &str = "../datafile.json";

#[derive(Parser)]
#[command(name = "flagwise")]
#[command(version)]
#[command(about = "Feature flag decisions from local or CDN datafiles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decide one flag for many users and report throughput
    Perf {
        /// Path to the datafile
        #[arg(long, default_value = DEFAULT_DATAFILE)]
        datafile: PathBuf,

        /// Download the datafile for this SDK key instead of reading a file
        #[arg(long)]
        sdk_key: Option<String>,

        /// Flag to decide
        #[arg(long, default_value = "buy_button")]
        flag: String,

        /// Number of users to decide for
        #[arg(long, default_value_t = 1_000_000)]
        users: u64,

        /// User ids are this prefix followed by 0..users
        #[arg(long, default_value = "user")]
        prefix: String,
    },

    /// Decide a flag for one user and show the events it would send
    Decide {
        #[arg(long)]
        flag: String,

        #[arg(long)]
        user: String,

        /// User attribute as key=value (repeatable)
        #[arg(long = "attr", value_parser = parse_attribute)]
        attributes: Vec<(String, AttributeValue)>,

        #[arg(long, default_value = DEFAULT_DATAFILE)]
        datafile: PathBuf,

        /// Include decision reasons
        #[arg(long)]
        reasons: bool,
    },

    /// Summarize a datafile
    Inspect {
        #[arg(long, default_value = DEFAULT_DATAFILE)]
        datafile: PathBuf,
    },

    /// Print version information
    Version,
}

/// Parse `key=value`, inferring booleans, numbers and `null`
fn parse_attribute(input: &str) -> Result<(String, AttributeValue), String> {
    let (key, raw) = input
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {input:?}"))?;
    if key.is_empty() {
        return Err(format!("attribute name is empty in {input:?}"));
    }

    let value = match raw {
        "null" => AttributeValue::Null,
        "true" => AttributeValue::Bool(true),
        "false" => AttributeValue::Bool(false),
        _ => {
            if let Ok(n) = raw.parse::<i64>() {
                AttributeValue::Int(n)
            } else {
                match raw.parse::<f64>() {
                    Ok(f) if f.is_finite() => AttributeValue::Float(f),
                    _ => AttributeValue::String(raw.to_string()),
                }
            }
        }
    };
    Ok((key.to_string(), value))
}
