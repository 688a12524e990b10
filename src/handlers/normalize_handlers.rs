//! Stream handler for the default mode: read JSON records, write normalized
//! records to one sink and rejection reports to another.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use datalake_metadata::{MetadataError, normalize_value};
use serde::Serialize;
use serde_json::Value;
use std::io::{Read, Write};
use tracing::{info, warn};

/// Counts of what happened to the input stream.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub accepted: usize,
    pub rejected: usize,
}

/// One line of the rejection report.
#[derive(Serialize, Debug)]
struct Rejection<'a> {
    index: usize,
    kind: &'static str,
    error: &'a str,
}

/// Normalize every JSON value in `reader`.
///
/// Accepted records go to `out`, one per line. Each rejected record yields a
/// JSON line on `rejects`. Input that is not valid JSON aborts the run since
/// no later record can be located reliably.
pub fn normalize_stream<R, W, E>(
    cfg: &AppConfig,
    reader: R,
    out: &mut W,
    rejects: &mut E,
) -> Result<NormalizeSummary>
where
    R: Read,
    W: Write,
    E: Write,
{
    let mut summary = NormalizeSummary::default();
    let stream = serde_json::Deserializer::from_reader(reader).into_iter::<Value>();

    for (index, item) in stream.enumerate() {
        let value = item.with_context(|| format!("reading record #{index}"))?;
        match normalize_value(&value) {
            Ok(record) => {
                if cfg.pretty {
                    serde_json::to_writer_pretty(&mut *out, &record)?;
                } else {
                    serde_json::to_writer(&mut *out, &record)?;
                }
                out.write_all(b"\n")?;
                summary.accepted += 1;
            }
            Err(err) => {
                report_rejection(rejects, index, &err)?;
                summary.rejected += 1;
                if cfg.fail_fast {
                    break;
                }
            }
        }
    }
    out.flush()?;
    rejects.flush()?;

    info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        "finished normalizing metadata"
    );
    Ok(summary)
}

fn report_rejection<E: Write>(rejects: &mut E, index: usize, err: &MetadataError) -> Result<()> {
    warn!(index, kind = err.kind(), "rejected metadata record: {}", err);
    let message = err.to_string();
    let line = Rejection {
        index,
        kind: err.kind(),
        error: &message,
    };
    serde_json::to_writer(&mut *rejects, &line)?;
    rejects.write_all(b"\n")?;
    Ok(())
}
