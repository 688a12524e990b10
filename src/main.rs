use anyhow::{Context, Result, bail};
use std::{fs::File, io};
use tracing_subscriber::EnvFilter;

mod config;
mod handlers;

fn main() -> Result<()> {
    // --- Logging setup ---
    // stdout carries records, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // --- Parse config + hash flag ---
    let (cfg, hash) = config::AppConfig::from_env_and_args()?;

    // --- Handle hash mode ---
    if let Some(path) = hash {
        handlers::hash_handlers::print_file_hash(&path, &mut io::stdout().lock())?;
        return Ok(()); // exit after hashing
    }

    tracing::debug!("Normalizing metadata with config: {:?}", cfg);

    let mut out = io::stdout().lock();
    let mut rejects = io::stderr().lock();
    let summary = match &cfg.input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            handlers::normalize_handlers::normalize_stream(
                &cfg,
                io::BufReader::new(file),
                &mut out,
                &mut rejects,
            )?
        }
        None => handlers::normalize_handlers::normalize_stream(
            &cfg,
            io::stdin().lock(),
            &mut out,
            &mut rejects,
        )?,
    };

    if summary.rejected > 0 {
        bail!(
            "{} of {} metadata records rejected",
            summary.rejected,
            summary.accepted + summary.rejected
        );
    }

    Ok(())
}
