//! # Stream Decoding
//!
//! Pull decoded frames out of any [`Read`] source.

use crate::audio::DecodedAudio;
use crate::config::StreamDecoderConfig;
use crate::decoder::minimp3::Minimp3Decoder;
use crate::decoder::session::DecoderSession;
use crate::error::Result;
use crate::traits::DecodeBackend;
use crate::types::{DecodeOutcome, MAX_SAMPLES_PER_FRAME};
use std::io::{ErrorKind, Read};
use tracing::{debug, instrument, trace};

/// Frame-by-frame decoder over a byte reader.
///
/// Keeps at least `min_buffered_bytes` of compressed data pending ahead of
/// the decoder until the reader is exhausted, then drains what is left.
pub struct Mp3StreamDecoder<R: Read, B: DecodeBackend = Minimp3Decoder> {
    reader: R,
    session: DecoderSession<B>,
    config: StreamDecoderConfig,
    pending: Vec<u8>,
    pcm: Vec<i16>,
    eof: bool,
}

impl<R: Read> Mp3StreamDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self::build(reader, DecoderSession::new(), StreamDecoderConfig::default())
    }

    pub fn with_config(reader: R, config: StreamDecoderConfig) -> Result<Self> {
        Self::with_session(reader, DecoderSession::new(), config)
    }
}

impl<R: Read, B: DecodeBackend> Mp3StreamDecoder<R, B> {
    pub fn with_session(
        reader: R,
        session: DecoderSession<B>,
        config: StreamDecoderConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(reader, session, config))
    }

    fn build(reader: R, session: DecoderSession<B>, config: StreamDecoderConfig) -> Self {
        Self {
            reader,
            session,
            config,
            pending: Vec::with_capacity(config.min_buffered_bytes + config.read_chunk_bytes),
            pcm: vec![0; MAX_SAMPLES_PER_FRAME],
            eof: false,
        }
    }

    /// Decode the next frame.
    ///
    /// Returns the interleaved samples of that frame, or `None` once the
    /// reader is exhausted. A truncated trailing frame is dropped.
    pub fn next_frame(&mut self) -> Result<Option<&[i16]>> {
        let produced = loop {
            self.fill()?;
            if self.pending.is_empty() {
                break None;
            }

            let progress =
                self.session
                    .decode_next_frame(&self.pending, self.pending.len(), &mut self.pcm)?;
            let consumed = progress.consumed_bytes.min(self.pending.len());
            self.pending.drain(..consumed);

            match progress.outcome() {
                DecodeOutcome::DecodedFrame {
                    produced_samples, ..
                } => break Some(produced_samples),
                DecodeOutcome::SkippedBytes(skipped) => {
                    trace!(skipped, "Skipped non-audio bytes");
                }
                DecodeOutcome::NeedMoreData if self.eof => {
                    debug!(
                        remaining = self.pending.len(),
                        "Dropping incomplete trailing data"
                    );
                    self.pending.clear();
                    break None;
                }
                DecodeOutcome::NeedMoreData => {
                    self.read_chunk()?;
                }
            }
        };

        Ok(produced.map(|n| &self.pcm[..n]))
    }

    /// The underlying session, for stream properties.
    pub fn session(&self) -> &DecoderSession<B> {
        &self.session
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) -> Result<()> {
        while !self.eof && self.pending.len() < self.config.min_buffered_bytes {
            self.read_chunk()?;
        }
        Ok(())
    }

    fn read_chunk(&mut self) -> Result<()> {
        if self.eof {
            return Ok(());
        }

        let start = self.pending.len();
        self.pending.resize(start + self.config.read_chunk_bytes, 0);

        let read = loop {
            match self.reader.read(&mut self.pending[start..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.pending.truncate(start);
                    return Err(e.into());
                }
            }
        };

        self.pending.truncate(start + read);
        if read == 0 {
            trace!("Reader exhausted");
            self.eof = true;
        }
        Ok(())
    }
}

/// Decode an entire MP3 stream into memory.
#[instrument(skip(reader))]
pub fn decode_all<R: Read>(reader: R) -> Result<DecodedAudio> {
    let mut decoder = Mp3StreamDecoder::new(reader);
    let mut samples = Vec::new();
    let mut frames = 0usize;

    while let Some(frame) = decoder.next_frame()? {
        samples.extend_from_slice(frame);
        frames += 1;
    }

    let info = decoder.session().stream_info()?;
    debug!(frames, samples = samples.len(), "Stream decoded");

    Ok(DecodedAudio::new(info, samples))
}
