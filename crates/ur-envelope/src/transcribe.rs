//! Text transcription seam for UR bodies.

use crate::bytewords::{self, Style};
use crate::error::BytewordsError;

/// Turns bytes into transmissible text and back.
///
/// [`UrEncoder`](crate::UrEncoder) and [`UrDecoder`](crate::UrDecoder) route
/// every UR body through one. UR strings are lowercased before parsing, so
/// `decode` only ever sees lowercase text and `encode` must not rely on case
/// or produce `/`.
pub trait Transcriber {
    /// Render `data` as text.
    fn encode(&self, data: &[u8]) -> String;

    /// Parse text produced by [`Transcriber::encode`].
    ///
    /// # Errors
    ///
    /// Returns `BytewordsError` if the text is not a valid transcription.
    fn decode(&self, text: &str) -> Result<Vec<u8>, BytewordsError>;
}

/// Bytewords transcription in a fixed style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bytewords {
    style: Style,
}

impl Bytewords {
    /// Transcriber for `style`.
    #[must_use]
    pub const fn new(style: Style) -> Self {
        Self { style }
    }

    /// The configured style.
    #[must_use]
    pub const fn style(&self) -> Style {
        self.style
    }
}

impl Transcriber for Bytewords {
    fn encode(&self, data: &[u8]) -> String {
        bytewords::encode(data, self.style)
    }

    fn decode(&self, text: &str) -> Result<Vec<u8>, BytewordsError> {
        bytewords::decode(text, self.style)
    }
}
