use std::io::{Read, Write};
use std::net::TcpStream;

use crate::Result;
use crate::http::Residual;

/// Narrow view of an already-open bidirectional byte stream.
///
/// Reads land in a caller-owned [`Residual`] so that bytes fetched past what
/// the current parse step needs stay available to the next one. Both read
/// operations block until satisfied; neither trims what an earlier call left
/// buffered.
pub trait Transport {
    /// Blocks until `delim` is present in `residual`, appending whatever the
    /// stream delivers along the way - possibly more than up to the
    /// delimiter. A no-op when the delimiter is already buffered.
    fn read_until(&mut self, delim: &[u8], residual: &mut Residual) -> Result<()>;

    /// Blocks until exactly `n` further bytes have been appended to
    /// `residual`, never more.
    fn read_exact(&mut self, n: usize, residual: &mut Residual) -> Result<()>;

    /// Writes the entire buffer to the stream.
    fn write(&mut self, data: &[u8]) -> Result<()>;
}

/// [`Transport`] over a connected TCP socket, one per conversation turn.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Opens a connection to `host:port`.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let stream = TcpStream::connect((host, port))?;
        tracing::debug!(host, port, "connected to AI server");
        Ok(TcpTransport { stream })
    }
}

impl Transport for TcpTransport {
    fn read_until(&mut self, delim: &[u8], residual: &mut Residual) -> Result<()> {
        let mut buf = [0u8; 4096];
        while residual.peek_until(delim).is_none() {
            let n = self.stream.read(&mut buf)?;
            if n == 0 {
                return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
            }
            residual.extend(&buf[..n]);
        }
        Ok(())
    }

    fn read_exact(&mut self, n: usize, residual: &mut Residual) -> Result<()> {
        let mut buf = vec![0u8; n];
        self.stream.read_exact(&mut buf)?;
        residual.extend(&buf);
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.stream.write_all(data)?;
        Ok(())
    }
}


#[cfg(test)]
mod test {
    use std::io::Write as _;
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    fn serve_once(payload: &'static [u8]) -> (String, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            socket.write_all(payload).unwrap();
        });
        ("127.0.0.1".to_string(), port)
    }

    #[test]
    fn test_read_until_buffers_through_delimiter() {
        let (host, port) = serve_once(b"HTTP/1.1 200 OK\r\n\r\nbody");
        let mut transport = TcpTransport::connect(&host, port).unwrap();
        let mut residual = Residual::new();

        transport.read_until(b"\r\n\r\n", &mut residual).unwrap();
        assert!(residual.peek_until(b"\r\n\r\n").is_some());
    }

    #[test]
    fn test_read_until_is_noop_when_already_buffered() {
        let (host, port) = serve_once(b"");
        let mut transport = TcpTransport::connect(&host, port).unwrap();
        let mut residual = Residual::new();
        residual.extend(b"already\r\nhere");

        // the server sent nothing, so any actual read would fail
        transport.read_until(b"\r\n", &mut residual).unwrap();
        assert_eq!(b"already\r\nhere", residual.as_bytes());
    }

    #[test]
    fn test_read_exact_appends_requested_count() {
        let (host, port) = serve_once(b"0123456789");
        let mut transport = TcpTransport::connect(&host, port).unwrap();
        let mut residual = Residual::new();

        transport.read_exact(4, &mut residual).unwrap();
        assert_eq!(b"0123", residual.as_bytes());

        transport.read_exact(6, &mut residual).unwrap();
        assert_eq!(b"0123456789", residual.as_bytes());
    }

    #[test]
    fn test_closed_connection_is_a_transport_error() {
        let (host, port) = serve_once(b"short");
        let mut transport = TcpTransport::connect(&host, port).unwrap();
        let mut residual = Residual::new();

        let err = transport.read_until(b"\r\n", &mut residual).unwrap_err();
        assert!(matches!(err, crate::Error::TransportError(_)));
    }
}
