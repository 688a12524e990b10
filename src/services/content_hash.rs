//! Content hashing for the `hash` field of a record.

use md5::Context;
use std::{fs::File, io, io::Read, path::Path};

const CHUNK_SIZE: usize = 64 * 1024;

/// MD5 of everything `reader` yields, as lowercase hex.
///
/// Reads in fixed-size chunks so large objects are never held in memory.
pub fn content_hash<R: Read>(mut reader: R) -> io::Result<String> {
    let mut digest = Context::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        digest.consume(&buf[..n]);
    }
    Ok(format!("{:x}", digest.compute()))
}

/// MD5 of a file on disk.
pub fn file_hash(path: impl AsRef<Path>) -> io::Result<String> {
    content_hash(File::open(path)?)
}
