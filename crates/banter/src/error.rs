/// The main error type for the banter [`crate`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The response announced neither chunked transfer-encoding nor a
    /// content length, so the extent of the body cannot be determined.
    #[error("no length or chunking information in response")]
    FramingError,

    /// A response unit failed to parse as the expected JSON payload, or the
    /// chunked framing itself was corrupt.
    #[error("malformed response unit: {0}")]
    DecodeError(String),

    /// Represents read/write failures on the underlying connection.
    #[error("transport error: {0} - the AI server may be unreachable")]
    TransportError(#[from] std::io::Error),

    /// Represents [`crate::chat::ChatRequestBuilder`] errors.
    #[error(transparent)]
    ChatRequestBuilderError(#[from] crate::chat::ChatRequestBuilderError),

    /// Represents [`crate::session::ChatOptionsBuilder`] errors.
    #[error(transparent)]
    ChatOptionsBuilderError(#[from] crate::session::ChatOptionsBuilderError),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::DecodeError(err.to_string())
    }
}

/// A specialized [`Result`] type for this banter [`crate`].
///
/// This type is broadly used across banter [`crate`] for any operation which
/// may produce an error.
///
/// This typedef is generally used to avoid writing out [`Error`] directly and
/// is otherwise a direct mapping to [`Result`].
///
/// # Examples
///
/// A convenience function that bubbles a `banter::Result` to its caller:
///
/// ```
///
/// fn run_chat_turn() -> banter::Result<()> {
///     // run some code that may produce an error from the banter code
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
