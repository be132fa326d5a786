use super::Residual;
use crate::transport::Transport;
use crate::{Error, Result};

const CRLF: &[u8] = b"\r\n";

/// Decodes a chunked transfer-encoded body, handing each chunk's payload to
/// `on_chunk` as soon as it is complete so callers can render the reply
/// while the rest is still in flight.
///
/// Chunks are length-prefixed with a hexadecimal size line; a size of zero
/// ends the body. Trailer headers after the final chunk are not parsed.
/// Returns the raw body - every chunk payload concatenated in order.
pub fn read_chunked<T, F>(
    transport: &mut T,
    residual: &mut Residual,
    mut on_chunk: F,
) -> Result<Vec<u8>>
where
    T: Transport + ?Sized,
    F: FnMut(&[u8]) -> Result<()>,
{
    let mut raw_body = Vec::new();
    loop {
        let size_line = read_line(transport, residual)?;
        let chunk_size = parse_chunk_size(&size_line)?;
        tracing::debug!(chunk_size, "chunk size line {size_line:?}");
        if chunk_size == 0 {
            break;
        }

        let buffered = residual.len();
        if buffered < chunk_size {
            transport.read_exact(chunk_size - buffered, residual)?;
        }
        let payload = residual.take(chunk_size);
        on_chunk(&payload)?;
        raw_body.extend_from_slice(&payload);

        // the mandatory CRLF after every chunk payload
        read_line(transport, residual)?;
    }
    Ok(raw_body)
}

/// Reads exactly `len` body bytes, consuming buffered residual first and
/// requesting only the remaining deficit from the transport. Never requests
/// more than the deficit, so bytes that belong to a later response are left
/// alone.
pub fn read_fixed<T>(transport: &mut T, residual: &mut Residual, len: usize) -> Result<Vec<u8>>
where
    T: Transport + ?Sized,
{
    let mut body = residual.take(len);
    if body.len() < len {
        let deficit = len - body.len();
        transport.read_exact(deficit, residual)?;
        body.extend(residual.take(deficit));
    }
    Ok(body)
}

/// Reads one CRLF-terminated line, touching the transport only when the
/// terminator is not already buffered in the residual.
fn read_line<T>(transport: &mut T, residual: &mut Residual) -> Result<String>
where
    T: Transport + ?Sized,
{
    if residual.peek_until(CRLF).is_none() {
        transport.read_until(CRLF, residual)?;
    }
    let line = residual.take_until(CRLF).ok_or_else(|| {
        Error::TransportError(std::io::Error::from(std::io::ErrorKind::UnexpectedEof))
    })?;
    Ok(String::from_utf8_lossy(&line).into_owned())
}

fn parse_chunk_size(line: &str) -> Result<usize> {
    let line = line.trim_start();
    let end = line
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(line.len());
    let digits = &line[..end];
    if digits.is_empty() {
        return Err(Error::DecodeError(format!(
            "invalid chunk size line: {line:?}"
        )));
    }
    usize::from_str_radix(digits, 16)
        .map_err(|err| Error::DecodeError(format!("invalid chunk size line {line:?}: {err}")))
}
