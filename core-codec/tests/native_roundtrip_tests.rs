//! Round-trip tests against the native codecs
//!
//! Encodes PCM with LAME and decodes the result with minimp3 to verify:
//! - Stream properties reported by the decoder
//! - Consumed byte accounting over a whole stream
//! - Frame-based sample counts and signal preservation
//! - Flush behaviour and stream adapters

use core_codec::{
    decode_all, Audio, CodecError, DecodeOutcome, DecoderSession, EncoderConfig, EncoderSession,
    Mp3StreamEncoder, MAX_SAMPLES_PER_FRAME,
};
use std::f64::consts::PI;
use std::io::Cursor;

const SAMPLES_PER_FRAME: usize = 1152;

/// Window handed to the decoder; minimp3 needs several frames to confirm sync.
const WINDOW_BYTES: usize = 16 * 1024;

// ============================================================================
// Helpers
// ============================================================================

fn encode(config: EncoderConfig, pcm: &[i16], chunk_samples: usize) -> Vec<u8> {
    let mut session = EncoderSession::new(config).unwrap();
    let mut mp3 = Vec::new();

    for chunk in pcm.chunks(chunk_samples) {
        mp3.extend(session.write_samples(chunk).unwrap());
    }
    mp3.extend(session.flush().unwrap());
    session.destroy();

    mp3
}

fn sine(sample_rate: u32, channels: u16, seconds: f64, freq: f64, amplitude: f64) -> Vec<i16> {
    let frames = (f64::from(sample_rate) * seconds) as usize;
    let mut pcm = Vec::with_capacity(frames * usize::from(channels));
    for i in 0..frames {
        let value = (2.0 * PI * freq * i as f64 / f64::from(sample_rate)).sin() * amplitude;
        for _ in 0..channels {
            pcm.push(value as i16);
        }
    }
    pcm
}

fn rms(samples: &[i16]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum / samples.len() as f64).sqrt()
}

struct DecodeSummary {
    consumed: usize,
    frames: usize,
    samples: Vec<i16>,
}

/// Drive a session over `mp3` the way a caller owning the buffer would.
fn decode_with_windows(session: &mut DecoderSession, mp3: &[u8]) -> DecodeSummary {
    let mut pcm = vec![0i16; MAX_SAMPLES_PER_FRAME];
    let mut summary = DecodeSummary {
        consumed: 0,
        frames: 0,
        samples: Vec::new(),
    };
    let mut window = WINDOW_BYTES;

    while summary.consumed < mp3.len() {
        let end = (summary.consumed + window).min(mp3.len());
        let input = &mp3[summary.consumed..end];
        let progress = session.decode_next_frame(input, input.len(), &mut pcm).unwrap();
        summary.consumed += progress.consumed_bytes;

        match progress.outcome() {
            DecodeOutcome::DecodedFrame {
                produced_samples, ..
            } => {
                summary.frames += 1;
                summary.samples.extend_from_slice(&pcm[..produced_samples]);
            }
            DecodeOutcome::SkippedBytes(_) => {}
            DecodeOutcome::NeedMoreData if end == mp3.len() => break,
            DecodeOutcome::NeedMoreData => window += WINDOW_BYTES,
        }
    }

    summary
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_sessions_are_send() {
    fn assert_send<T: Send>() {}
    assert_send::<DecoderSession>();
    assert_send::<EncoderSession>();
}

#[test]
fn test_one_second_of_mono_silence() {
    let config = EncoderConfig::new(1, 44100, 128, 2);
    let mp3 = encode(config, &vec![0i16; 44100], 44100);
    assert!(!mp3.is_empty());

    let mut session = DecoderSession::new();
    let summary = decode_with_windows(&mut session, &mp3);

    assert_eq!(session.channel_count().unwrap(), 1);
    assert_eq!(session.sample_rate().unwrap(), 44100);
    assert_eq!(session.bit_rate().unwrap(), 128);

    assert_eq!(summary.consumed, mp3.len());
    assert_eq!(summary.samples.len(), summary.frames * SAMPLES_PER_FRAME);
    assert!(summary.samples.len() >= 44100);
    assert!(summary.samples.len() <= 44100 + 10 * SAMPLES_PER_FRAME);
    assert!(summary.samples.iter().all(|&s| s.abs() < 16));
}

#[test]
fn test_mono_voice_chunks_at_48k() {
    let config = EncoderConfig::new(1, 48000, 128, 5);
    let pcm = vec![0i16; 10 * 960];
    let mp3 = encode(config, &pcm, 960);

    let audio = decode_all(Cursor::new(mp3)).unwrap();
    assert_eq!(audio.sample_rate(), 48000);
    assert_eq!(audio.bit_rate(), 128);
    assert_eq!(audio.channel_count(), 1);
    assert!(audio.samples().len() >= pcm.len());
}

#[test]
fn test_stereo_sine_survives_roundtrip() {
    let config = EncoderConfig::new(2, 48000, 192, 2);
    let pcm = sine(48000, 2, 0.5, 440.0, 8000.0);
    let mp3 = encode(config, &pcm, 1920);

    let audio = decode_all(Cursor::new(mp3)).unwrap();
    assert_eq!(audio.channel_count(), 2);
    assert_eq!(audio.sample_rate(), 48000);
    assert!(audio.samples().len() >= pcm.len());
    assert_eq!(audio.samples().len() % (2 * SAMPLES_PER_FRAME), 0);

    let input_rms = rms(&pcm);
    let output_rms = rms(audio.samples());
    assert!(
        output_rms > input_rms * 0.5 && output_rms < input_rms * 1.5,
        "input rms {input_rms}, output rms {output_rms}"
    );
}

#[test]
fn test_metadata_unknown_until_first_header() {
    let mp3 = encode(EncoderConfig::default(), &sine(44100, 2, 0.2, 220.0, 4000.0), 4096);
    let mut session = DecoderSession::new();
    let mut pcm = vec![0i16; MAX_SAMPLES_PER_FRAME];

    assert_eq!(session.channel_count().unwrap(), -1);
    assert_eq!(session.sample_rate().unwrap(), -1);
    assert_eq!(session.bit_rate().unwrap(), -1);

    let progress = session.decode_next_frame(&mp3, 0, &mut pcm).unwrap();
    assert_eq!(progress.outcome(), DecodeOutcome::NeedMoreData);
    assert!(!session.header_parsed().unwrap());

    let progress = session.decode_next_frame(&mp3, mp3.len(), &mut pcm).unwrap();
    assert!(progress.consumed_bytes > 0);
    assert_eq!(session.channel_count().unwrap(), 2);
    assert_eq!(session.sample_rate().unwrap(), 44100);
    assert!(session.bit_rate().unwrap() > 0);
}

#[test]
fn test_junk_prefix_is_skipped() {
    let mp3 = encode(EncoderConfig::voice(), &sine(48000, 1, 0.5, 300.0, 6000.0), 960);

    let mut clean = DecoderSession::new();
    let reference = decode_with_windows(&mut clean, &mp3);

    let mut prefixed = vec![0u8; 1000];
    prefixed.extend_from_slice(&mp3);
    let mut session = DecoderSession::new();
    let summary = decode_with_windows(&mut session, &prefixed);

    assert_eq!(summary.consumed, prefixed.len());
    assert_eq!(summary.frames, reference.frames);
    assert_eq!(summary.samples.len(), reference.samples.len());
}

#[test]
fn test_flush_emits_tail_after_silent_write() {
    let mut session = EncoderSession::new(EncoderConfig::new(1, 44100, 128, 5)).unwrap();

    let written = session.write_samples(&[0; SAMPLES_PER_FRAME]).unwrap();
    let tail = session.flush().unwrap();

    assert!(!tail.is_empty());
    assert!(written.len() + tail.len() > 0);
}

#[test]
fn test_stream_encoder_matches_session_output() {
    let config = EncoderConfig::new(2, 44100, 128, 5);
    let pcm = sine(44100, 2, 0.3, 523.25, 5000.0);

    let expected = encode(config, &pcm, 2048);

    let mut encoder = Mp3StreamEncoder::new(config, Vec::new()).unwrap();
    for chunk in pcm.chunks(2048) {
        encoder.write(chunk).unwrap();
    }
    let written = encoder.bytes_written();
    let output = encoder.finish().unwrap();

    assert_eq!(output, expected);
    assert!(written <= output.len() as u64);
}

#[test]
fn test_destroyed_native_sessions_are_closed() {
    let mut decoder = DecoderSession::new();
    decoder.destroy();
    decoder.destroy();
    assert!(decoder.is_closed());
    assert!(decoder.channel_count().is_err());

    let mut encoder = EncoderSession::new(EncoderConfig::default()).unwrap();
    encoder.destroy();
    encoder.destroy();
    assert!(encoder.is_closed());
    assert!(encoder.flush().is_err());
}

#[test]
fn test_invalid_channels_rejected_by_native_constructor() {
    assert!(EncoderSession::create(3, 44100, 128, 5).is_err());
    assert!(EncoderSession::create(0, 44100, 128, 5).is_err());
    assert!(EncoderSession::create(1, 44100, 128, 5).is_ok());
}

#[test]
fn test_out_of_range_quality_is_forwarded_to_lame() {
    for quality in [-1, 10, 300] {
        let mut session = EncoderSession::create(1, 44100, 128, quality).unwrap();
        session.write_samples(&[0; SAMPLES_PER_FRAME]).unwrap();
        session.flush().unwrap();
    }
}

#[test]
fn test_negative_rates_fail_initialization() {
    assert!(matches!(
        EncoderSession::create(1, -44100, 128, 5),
        Err(CodecError::Initialization(_))
    ));
    assert!(matches!(
        EncoderSession::create(1, 44100, -128, 5),
        Err(CodecError::Initialization(_))
    ));
}
