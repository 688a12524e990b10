//! `--hash FILE`: print the content hash used for a record's `hash` field.

use anyhow::{Context, Result};
use datalake_metadata::file_hash;
use std::{io::Write, path::Path};
use tracing::debug;

pub fn print_file_hash<W: Write>(path: &Path, out: &mut W) -> Result<()> {
    let digest =
        file_hash(path).with_context(|| format!("hashing {}", path.display()))?;
    debug!("hashed {} => {}", path.display(), digest);
    writeln!(out, "{digest}")?;
    Ok(())
}
