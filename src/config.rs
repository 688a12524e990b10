use anyhow::{Context, Result, bail};
use clap::Parser;
use std::{env, path::PathBuf};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// File holding the JSON records; stdin when unset.
    pub input: Option<PathBuf>,
    pub pretty: bool,
    pub fail_fast: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Normalize and validate datalake metadata records")]
pub struct Args {
    /// Read records from this file instead of stdin (overrides DATALAKE_METADATA_INPUT)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Pretty-print accepted records (overrides DATALAKE_METADATA_PRETTY)
    #[arg(long)]
    pub pretty: bool,

    /// Stop at the first rejected record (overrides DATALAKE_METADATA_FAIL_FAST)
    #[arg(long)]
    pub fail_fast: bool,

    /// Print the content hash of FILE and exit
    #[arg(long, value_name = "FILE")]
    pub hash: Option<PathBuf>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and the optional
    /// file to hash.
    pub fn from_env_and_args() -> Result<(Self, Option<PathBuf>)> {
        let args = Args::parse();
        Self::merge(args)
    }

    fn merge(args: Args) -> Result<(Self, Option<PathBuf>)> {
        // --- Environment fallback ---
        let env_input = env::var_os("DATALAKE_METADATA_INPUT").map(PathBuf::from);
        let env_pretty = env_flag("DATALAKE_METADATA_PRETTY")?;
        let env_fail_fast = env_flag("DATALAKE_METADATA_FAIL_FAST")?;

        // --- Merge ---
        let cfg = Self {
            input: args.input.or(env_input),
            pretty: args.pretty || env_pretty,
            fail_fast: args.fail_fast || env_fail_fast,
        };

        Ok((cfg, args.hash))
    }
}

fn env_flag(name: &str) -> Result<bool> {
    match env::var(name) {
        Ok(value) => parse_flag(&value).with_context(|| format!("parsing {name} value `{value}`")),
        Err(env::VarError::NotPresent) => Ok(false),
        Err(err) => Err(err).with_context(|| format!("reading {name}")),
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("expected a boolean, got `{other}`"),
    }
}
