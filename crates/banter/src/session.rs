use derive_builder::Builder;

use crate::chat::{ChatMessage, ChatRequestBuilder, fragment_from_unit};
use crate::http::{Framing, Residual, parse_response_headers, read_chunked, read_fixed};
use crate::transport::Transport;
use crate::utils::uri::ensure_leading_slash;
use crate::{Error, Result};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 11434;
pub const DEFAULT_ENDPOINT: &str = "/api/chat";
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Where decoded assistant fragments are rendered as they arrive.
///
/// Any `FnMut(&str)` closure is a sink, so callers can stream straight to a
/// terminal or collect into a buffer in tests.
pub trait FragmentSink {
    fn emit(&mut self, fragment: &str);
}

impl<F: FnMut(&str)> FragmentSink for F {
    fn emit(&mut self, fragment: &str) {
        self(fragment)
    }
}

/// Connection and model settings for a chat session.
#[derive(Debug, Clone, Builder)]
#[builder(pattern = "mutable")]
#[builder(setter(into))]
pub struct ChatOptions {
    /// Host name or address the AI server listens on.
    #[builder(default = "DEFAULT_HOST.to_string()")]
    pub host: String,
    #[builder(default = "DEFAULT_PORT")]
    pub port: u16,
    /// Request path of the chat endpoint.
    #[builder(default = "DEFAULT_ENDPOINT.to_string()")]
    pub endpoint: String,
    /// Model identifier sent with every request.
    #[builder(default = "DEFAULT_MODEL.to_string()")]
    pub model: String,
    /// Ask the server to stream the reply chunk by chunk.
    #[builder(default = "true")]
    pub stream: bool,
}

impl Default for ChatOptions {
    fn default() -> Self {
        ChatOptions {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            stream: true,
        }
    }
}

/// One interactive conversation with an AI server.
///
/// Holds the configuration and the turn history. Each call to [`send`] runs
/// a full request/decode cycle over a caller-supplied transport and, on
/// success, records the exchange so the next turn carries the context.
///
/// [`send`]: ChatSession::send
pub struct ChatSession {
    options: ChatOptions,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(mut options: ChatOptions) -> Self {
        options.endpoint = ensure_leading_slash(options.endpoint);
        ChatSession {
            options,
            history: Vec::new(),
        }
    }

    pub fn options(&self) -> &ChatOptions {
        &self.options
    }

    /// Recorded turns, oldest first, in request schema order.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Clears the conversation context; the next turn starts fresh.
    pub fn reset(&mut self) {
        tracing::debug!("conversation context cleared");
        self.history.clear();
    }

    /// Runs one conversation turn: sends `prompt` together with the
    /// accumulated history and decodes the reply, emitting fragments to
    /// `sink` as they stream in. Returns the assembled answer.
    ///
    /// On any error the turn is abandoned and the history left unmodified;
    /// fragments already emitted to the sink stand as displayed.
    pub fn send<T>(
        &mut self,
        transport: &mut T,
        prompt: &str,
        sink: &mut dyn FragmentSink,
    ) -> Result<String>
    where
        T: Transport + ?Sized,
    {
        let request = ChatRequestBuilder::default()
            .model(self.options.model.clone())
            .stream(self.options.stream)
            .messages(self.messages_with(prompt))
            .build()?;
        let post = request.to_post_request(&self.options.host, &self.options.endpoint)?;
        tracing::debug!("POST request:\n{post}");
        transport.write(post.as_bytes())?;

        let mut residual = Residual::new();
        transport.read_until(b"\r\n\r\n", &mut residual)?;
        let headers = parse_response_headers(&mut residual);
        for (name, value) in headers.iter() {
            tracing::debug!("response header {name}: {}", value.trim_end());
        }

        let mut answer = String::new();
        match Framing::from_headers(&headers)? {
            Framing::Chunked => {
                read_chunked(transport, &mut residual, |payload| {
                    let fragment = fragment_from_unit(payload)?;
                    sink.emit(&fragment);
                    answer.push_str(&fragment);
                    Ok(())
                })?;
            }
            Framing::ContentLength(length) => {
                let body = read_fixed(transport, &mut residual, length)?;
                let text = std::str::from_utf8(&body)
                    .map_err(|err| Error::DecodeError(err.to_string()))?;
                for unit in text.lines().filter(|line| !line.trim().is_empty()) {
                    answer.push_str(&fragment_from_unit(unit.as_bytes())?);
                }
            }
        }

        self.history.push(ChatMessage::user(prompt));
        self.history.push(ChatMessage::assistant(answer.clone()));
        Ok(answer)
    }

    fn messages_with(&self, prompt: &str) -> Vec<ChatMessage> {
        let mut messages = self.history.clone();
        messages.push(ChatMessage::user(prompt));
        messages
    }
}
