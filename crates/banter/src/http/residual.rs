/// Bytes already read from the transport but not yet consumed by a parse
/// step.
///
/// The residual is owned by the in-flight decode of one response and shared
/// between the header parser, the chunked decoder and the fixed-length
/// reader: whichever runs next drains this buffer before asking the
/// transport for more bytes.
#[derive(Debug, Default)]
pub struct Residual {
    buf: Vec<u8>,
}

impl Residual {
    pub fn new() -> Self {
        Residual::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Appends freshly read bytes to the end of the buffer.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Removes and returns the first `n` buffered bytes, or fewer when the
    /// buffer holds less than `n`.
    pub fn take(&mut self, n: usize) -> Vec<u8> {
        let n = n.min(self.buf.len());
        self.buf.drain(..n).collect()
    }

    /// Position just past the first occurrence of `delim`, if buffered.
    pub fn peek_until(&self, delim: &[u8]) -> Option<usize> {
        debug_assert!(!delim.is_empty());
        self.buf
            .windows(delim.len())
            .position(|window| window == delim)
            .map(|start| start + delim.len())
    }

    /// Removes everything up to and including the first `delim`, returning
    /// the bytes that preceded it. Returns `None` when the delimiter is not
    /// buffered, leaving the buffer untouched.
    pub fn take_until(&mut self, delim: &[u8]) -> Option<Vec<u8>> {
        let end = self.peek_until(delim)?;
        let mut taken: Vec<u8> = self.buf.drain(..end).collect();
        taken.truncate(end - delim.len());
        Some(taken)
    }
}
