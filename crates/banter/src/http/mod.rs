//! Incremental HTTP/1.1 response decoding over a blocking, partially
//! buffered byte source.

mod body;
mod headers;
mod residual;

pub use body::{read_chunked, read_fixed};
pub use headers::{ResponseHeaders, STATUS_KEY, parse_response_headers};
pub use residual::Residual;

use crate::{Error, Result};

/// How the extent of a response body is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// `Transfer-Encoding: chunked` - length-prefixed segments terminated by
    /// a zero-size chunk.
    Chunked,
    /// `Content-Length: n` - exactly `n` body bytes.
    ContentLength(usize),
}

impl Framing {
    /// Chooses a decoding strategy from the parsed response headers.
    ///
    /// Header values may still carry the carriage return left behind by line
    /// splitting; both checks tolerate it. A `Content-Length` that does not
    /// parse as a non-negative integer counts as absent.
    pub fn from_headers(headers: &ResponseHeaders) -> Result<Self> {
        if let Some(encoding) = headers.get("Transfer-Encoding") {
            if encoding.trim_end_matches('\r') == "chunked" {
                tracing::debug!("chunked encoding detected");
                return Ok(Framing::Chunked);
            }
        }
        if let Some(value) = headers.get("Content-Length") {
            if let Ok(length) = value.trim().parse::<usize>() {
                tracing::debug!(length, "Content-Length header found");
                return Ok(Framing::ContentLength(length));
            }
        }
        Err(Error::FramingError)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn headers_from(raw: &[u8]) -> ResponseHeaders {
        let mut residual = Residual::new();
        residual.extend(raw);
        parse_response_headers(&mut residual)
    }

    #[test]
    fn test_selects_chunked() {
        let headers =
            headers_from(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n");
        assert_eq!(Framing::Chunked, Framing::from_headers(&headers).unwrap());
    }

    #[test]
    fn test_selects_content_length() {
        let headers = headers_from(b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\n");
        assert_eq!(
            Framing::ContentLength(5),
            Framing::from_headers(&headers).unwrap()
        );
    }

    #[test]
    fn test_chunked_wins_over_content_length() {
        let headers = headers_from(
            b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nContent-Length: 5\r\n\r\n",
        );
        assert_eq!(Framing::Chunked, Framing::from_headers(&headers).unwrap());
    }

    #[test]
    fn test_other_transfer_encoding_falls_back_to_length() {
        let headers = headers_from(
            b"HTTP/1.1 200 OK\r\nTransfer-Encoding: gzip\r\nContent-Length: 12\r\n\r\n",
        );
        assert_eq!(
            Framing::ContentLength(12),
            Framing::from_headers(&headers).unwrap()
        );
    }

    #[test]
    fn test_no_framing_information_fails() {
        let headers = headers_from(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\n");
        let err = Framing::from_headers(&headers).unwrap_err();
        assert!(matches!(err, Error::FramingError));
        assert_eq!(
            "no length or chunking information in response",
            err.to_string()
        );
    }

    #[test]
    fn test_unparseable_content_length_fails() {
        let headers = headers_from(b"HTTP/1.1 200 OK\r\nContent-Length: banana\r\n\r\n");
        assert!(matches!(
            Framing::from_headers(&headers).unwrap_err(),
            Error::FramingError
        ));

        let headers = headers_from(b"HTTP/1.1 200 OK\r\nContent-Length: -5\r\n\r\n");
        assert!(matches!(
            Framing::from_headers(&headers).unwrap_err(),
            Error::FramingError
        ));
    }
}
