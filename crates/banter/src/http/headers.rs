use std::collections::HashMap;

use super::Residual;

/// Synthetic key the status line is stored under.
pub const STATUS_KEY: &str = "Status";

/// Parsed response header fields, keyed case-sensitively as received.
///
/// Values keep the carriage return that line-by-line splitting leaves at the
/// end ("application/json\r"): the framing checks downstream compare against
/// that exact shape.
/// TODO: move the framing comparisons to trimmed values so the stored `\r`
/// can finally go away.
#[derive(Debug, Default)]
pub struct ResponseHeaders {
    fields: HashMap<String, String>,
}

impl ResponseHeaders {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The raw status line, when the response carried one.
    pub fn status(&self) -> Option<&str> {
        self.get(STATUS_KEY)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Parses the status line and header fields out of `residual`.
///
/// The caller must already have buffered through the end-of-headers blank
/// line (`\r\n\r\n`); any body bytes past it are left in the residual for
/// the body decoders. The first line becomes the [`STATUS_KEY`] entry unless
/// it is empty or terminator-only. Field lines split on the first colon,
/// skipping the colon and the single delimiter character after it; lines
/// with no colon are skipped. An empty input yields an empty mapping.
pub fn parse_response_headers(residual: &mut Residual) -> ResponseHeaders {
    let mut fields = HashMap::new();

    if let Some(line) = next_line(residual) {
        if !(line.is_empty() || line == "\r") {
            fields.insert(STATUS_KEY.to_string(), line);
        }
    }

    while let Some(line) = next_line(residual) {
        if line == "\r" {
            break;
        }
        let Some(colon) = line.find(':') else {
            continue;
        };
        let name = line[..colon].to_string();
        let value = line.get(colon + 2..).unwrap_or_default().to_string();
        fields.insert(name, value);
    }

    ResponseHeaders { fields }
}

/// Next line of the header block: everything before the `\n`, with a
/// preceding `\r` left in place.
fn next_line(residual: &mut Residual) -> Option<String> {
    let raw = residual.take_until(b"\n")?;
    Some(String::from_utf8_lossy(&raw).into_owned())
}
