/*!
 * Decoded audio held in memory.
 *
 * An `AudioAsset` is a block of interleaved 16-bit samples plus a logical
 * duration in milliseconds. Slicing, silence and concatenation keep the
 * logical duration exact so that caption offsets computed from it line up
 * with what was requested, whatever the sample rate.
 */

use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use log::{debug, warn};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::errors::ClipError;

/// Extension of every clip this crate writes
pub const CLIP_AUDIO_EXTENSION: &str = "wav";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAsset {
    sample_rate: u32,
    channels: u16,
    samples: Vec<i16>,
    duration_ms: u64,
}

impl AudioAsset {
    /// Wrap interleaved samples. The duration is the whole milliseconds they cover.
    pub fn from_samples(sample_rate: u32, channels: u16, samples: Vec<i16>) -> Self {
        let frames = samples.len() as u64 / u64::from(channels.max(1));
        let duration_ms = frames * 1000 / u64::from(sample_rate.max(1));
        AudioAsset {
            sample_rate,
            channels,
            samples,
            duration_ms,
        }
    }

    /// Silence of exactly `duration_ms` with the given layout
    pub fn silent(duration_ms: u64, sample_rate: u32, channels: u16) -> Self {
        let frames = frames_for_ms(duration_ms, sample_rate);
        AudioAsset {
            sample_rate,
            channels,
            samples: vec![0; frames as usize * usize::from(channels)],
            duration_ms,
        }
    }

    /// Decode any container symphonia can probe, using the extension as a hint
    pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Self, ClipError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| ClipError::Decode(format!("no audio track in {:?}", path)))?;
        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;
        let mut channels = track.codec_params.channels.map(|c| c.count() as u16);

        let mut decoder =
            symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

        let mut samples: Vec<i16> = Vec::new();
        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(e.into()),
            };
            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    sample_rate.get_or_insert(spec.rate);
                    channels.get_or_insert(spec.channels.count() as u16);

                    let mut buf = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
                    buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buf.samples());
                }
                Err(SymphoniaError::DecodeError(msg)) => {
                    warn!("Skipping undecodable packet in {:?}: {}", path, msg);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let sample_rate = sample_rate
            .ok_or_else(|| ClipError::Decode(format!("unknown sample rate in {:?}", path)))?;
        let channels = channels
            .ok_or_else(|| ClipError::Decode(format!("unknown channel layout in {:?}", path)))?;

        let asset = Self::from_samples(sample_rate, channels, samples);
        debug!(
            "Decoded {:?}: {} Hz, {} ch, {} ms",
            path, asset.sample_rate, asset.channels, asset.duration_ms
        );
        Ok(asset)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Sub-range `[start_ms, end_ms)`.
    ///
    /// Fails with `OutOfRange` when the range is empty or ends past the audio.
    pub fn slice(&self, start_ms: u64, end_ms: u64) -> Result<Self, ClipError> {
        if end_ms <= start_ms || end_ms > self.duration_ms {
            return Err(ClipError::OutOfRange {
                start_ms,
                end_ms,
                duration_ms: self.duration_ms,
            });
        }

        let channels = usize::from(self.channels);
        let first = frames_for_ms(start_ms, self.sample_rate) as usize * channels;
        let last = (frames_for_ms(end_ms, self.sample_rate) as usize * channels).min(self.samples.len());

        Ok(AudioAsset {
            sample_rate: self.sample_rate,
            channels: self.channels,
            samples: self.samples[first..last].to_vec(),
            duration_ms: end_ms - start_ms,
        })
    }

    /// Append `other` after `self`; both must share a sample layout
    pub fn concat(mut self, other: &AudioAsset) -> Result<Self, ClipError> {
        if self.sample_rate != other.sample_rate || self.channels != other.channels {
            return Err(ClipError::Layout(format!(
                "{} Hz/{} ch vs {} Hz/{} ch",
                self.sample_rate, self.channels, other.sample_rate, other.channels
            )));
        }
        self.samples.extend_from_slice(&other.samples);
        self.duration_ms += other.duration_ms;
        Ok(self)
    }

    /// Encode as a 16-bit PCM WAV file in memory
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, ClipError> {
        let spec = WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec)?;
            for &sample in &self.samples {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
        }
        Ok(cursor.into_inner())
    }
}

/// Whole frames covering `ms` at `sample_rate`
pub fn frames_for_ms(ms: u64, sample_rate: u32) -> u64 {
    ms * u64::from(sample_rate) / 1000
}
