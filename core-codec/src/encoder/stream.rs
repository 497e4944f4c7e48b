//! # Stream Encoding
//!
//! Push PCM into an encoder session and write the MP3 output to any
//! [`Write`] sink.

use crate::config::EncoderConfig;
use crate::encoder::lame::LameEncoder;
use crate::encoder::session::EncoderSession;
use crate::error::Result;
use crate::traits::EncodeBackend;
use std::io::Write;
use tracing::debug;

/// Encoder writing its output straight to a sink.
///
/// Call [`finish`](Self::finish) to emit the tail of the stream; dropping the
/// encoder without finishing releases the native state but loses the tail.
pub struct Mp3StreamEncoder<W: Write, B: EncodeBackend = LameEncoder> {
    session: EncoderSession<B>,
    writer: W,
    bytes_written: u64,
}

impl<W: Write> Mp3StreamEncoder<W> {
    pub fn new(config: EncoderConfig, writer: W) -> Result<Self> {
        Ok(Self::from_session(EncoderSession::new(config)?, writer))
    }
}

impl<W: Write, B: EncodeBackend> Mp3StreamEncoder<W, B> {
    pub fn from_session(session: EncoderSession<B>, writer: W) -> Self {
        Self {
            session,
            writer,
            bytes_written: 0,
        }
    }

    /// Encode `pcm` and write whatever MP3 data it produced.
    ///
    /// Returns the number of bytes written to the sink.
    pub fn write(&mut self, pcm: &[i16]) -> Result<usize> {
        let mp3 = self.session.write_samples(pcm)?;
        self.writer.write_all(&mp3)?;
        self.bytes_written += mp3.len() as u64;
        Ok(mp3.len())
    }

    /// Flush the encoder, write the tail, release the native state and
    /// return the sink.
    pub fn finish(mut self) -> Result<W> {
        let tail = self.session.flush()?;
        self.writer.write_all(&tail)?;
        self.writer.flush()?;
        self.bytes_written += tail.len() as u64;
        self.session.destroy();

        debug!(bytes = self.bytes_written, "Stream encoding finished");
        Ok(self.writer)
    }

    /// Total MP3 bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    pub fn session(&self) -> &EncoderSession<B> {
        &self.session
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}
