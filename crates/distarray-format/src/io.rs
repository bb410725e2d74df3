//! Exact-length reads over arbitrary byte streams.

use std::io::{ErrorKind, Read};

use distarray_core::{Error, Result};

/// Largest single read; the output buffer only grows as data arrives.
const READ_CHUNK: usize = 8 * 1024;

/// Read exactly `size` bytes, retrying short reads.
///
/// Interrupted and would-block reads are retried. If the stream ends first
/// the error reports how many of the `size` bytes arrived; `what` names the
/// field being read. `size` comes from untrusted headers, so memory is
/// never reserved for bytes that have not been read.
pub fn read_bytes<R: Read + ?Sized>(
    reader: &mut R,
    size: usize,
    what: &'static str,
) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(size.min(READ_CHUNK));
    let mut scratch = [0u8; READ_CHUNK];
    while buf.len() < size {
        let want = (size - buf.len()).min(READ_CHUNK);
        match reader.read(&mut scratch[..want]) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&scratch[..n]),
            Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {}
            Err(e) => return Err(e.into()),
        }
    }

    if buf.len() != size {
        return Err(Error::end_of_stream(what, size, buf.len()));
    }
    Ok(buf)
}

/// Read a fixed-size array.
pub fn read_array<const N: usize, R: Read + ?Sized>(
    reader: &mut R,
    what: &'static str,
) -> Result<[u8; N]> {
    let bytes = read_bytes(reader, N, what)?;
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}
