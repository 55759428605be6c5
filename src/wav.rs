//! In-memory RIFF/WAVE writer.
//!
//! Output is always the canonical 44 byte layout: `RIFF` header, a 16 byte
//! `fmt ` chunk and a single `data` chunk, mono, every field little-endian.
//! Nothing here touches the filesystem.

use std::io::{self, Cursor, Write};

use crate::error::{Result, SynthError};
use crate::signal::Signal;

pub const HEADER_LEN: usize = 44;
pub const FMT_CHUNK_LEN: u32 = 16;

const FORMAT_PCM: u16 = 1;
const FORMAT_IEEE_FLOAT: u16 = 3;
const PCM16_SCALE: f32 = 32767.0; // Both directions, so full scale survives a round trip

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    /// Signed 16-bit integers, samples clipped to [-1, 1] and scaled by 32767.
    Pcm16,
    /// 32-bit IEEE float, samples written as-is.
    #[default]
    Float32,
}

impl BitDepth {
    pub fn format_code(&self) -> u16 {
        match self {
            BitDepth::Pcm16 => FORMAT_PCM,
            BitDepth::Float32 => FORMAT_IEEE_FLOAT,
        }
    }

    pub fn bits_per_sample(&self) -> u16 {
        match self {
            BitDepth::Pcm16 => 16,
            BitDepth::Float32 => 32,
        }
    }

    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample() / 8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bit_depth: BitDepth,
}

impl WavFormat {
    pub fn mono(sample_rate: u32, bit_depth: BitDepth) -> Self {
        WavFormat { channels: 1, sample_rate, bit_depth }
    }

    /// Bytes per sample frame.
    pub fn block_align(&self) -> u16 {
        self.channels * self.bit_depth.bytes_per_sample()
    }

    /// None when the rate does not fit the 32-bit header field.
    pub fn byte_rate(&self) -> Option<u32> {
        self.sample_rate.checked_mul(self.block_align() as u32)
    }
}

/// A finished WAV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavBytes(Vec<u8>);

impl WavBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn header(&self) -> Result<WavHeader> {
        WavHeader::parse(&self.0)
    }

    /// Reads the file back through hound, the way a playback backend would.
    pub fn decode(&self) -> Result<DecodedWav> {
        let mut reader = hound::WavReader::new(Cursor::new(self.0.as_slice()))?;
        let spec = reader.spec();

        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => reader
                .samples::<i16>()
                .map(|r| r.map(|s| (s as f32 / PCM16_SCALE).max(-1.0)))
                .collect::<std::result::Result<Vec<_>, _>>()?,
        };

        Ok(DecodedWav {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }
}

impl AsRef<[u8]> for WavBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedWav {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

/// Fields of the canonical 44 byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_size: u32,
    pub fmt_chunk_size: u32,
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(SynthError::EncodingError(format!(
                "WAV needs at least {} bytes, got {}",
                HEADER_LEN,
                bytes.len()
            )));
        }
        for (offset, tag) in [(0, b"RIFF"), (8, b"WAVE"), (12, b"fmt "), (36, b"data")] {
            if &bytes[offset..offset + 4] != tag {
                return Err(SynthError::EncodingError(format!(
                    "expected '{}' at offset {}",
                    String::from_utf8_lossy(tag),
                    offset
                )));
            }
        }

        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        let u32_at = |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);

        Ok(WavHeader {
            chunk_size: u32_at(4),
            fmt_chunk_size: u32_at(16),
            audio_format: u16_at(20),
            channels: u16_at(22),
            sample_rate: u32_at(24),
            byte_rate: u32_at(28),
            block_align: u16_at(32),
            bits_per_sample: u16_at(34),
            data_size: u32_at(40),
        })
    }

    /// Whether the declared sizes agree with a file of `total_len` bytes.
    pub fn matches_len(&self, total_len: usize) -> bool {
        self.chunk_size as usize + 8 == total_len && self.data_size as usize + HEADER_LEN == total_len
    }
}

/// Wraps `signal` in a mono WAV container.
pub fn encode(signal: &Signal, sample_rate: u32, bit_depth: BitDepth) -> Result<WavBytes> {
    if sample_rate == 0 {
        return Err(SynthError::InvalidConfig("sample rate must be positive".to_string()));
    }
    let format = WavFormat::mono(sample_rate, bit_depth);
    let pcm = match bit_depth {
        BitDepth::Pcm16 => samples_to_pcm16(signal.samples()),
        BitDepth::Float32 => samples_to_f32le(signal.samples()),
    };

    let expected = signal.len() * bit_depth.bytes_per_sample() as usize;
    if pcm.len() != expected {
        return Err(SynthError::EncodingError(format!(
            "sample data is {} bytes, expected {}",
            pcm.len(),
            expected
        )));
    }

    let mut buffer = Vec::with_capacity(HEADER_LEN + pcm.len());
    write_wav(&mut buffer, &format, &pcm)?;

    if buffer.len() != HEADER_LEN + pcm.len() {
        return Err(SynthError::EncodingError(format!(
            "wrote {} bytes, header declares {}",
            buffer.len(),
            HEADER_LEN + pcm.len()
        )));
    }
    Ok(WavBytes(buffer))
}

fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> Result<()> {
    let data_size = u32::try_from(pcm_data.len())
        .map_err(|_| SynthError::EncodingError(format!("{} bytes of audio exceed the WAV size limit", pcm_data.len())))?;
    let file_size = data_size
        .checked_add(HEADER_LEN as u32 - 8) // Total file size minus the RIFF id and size fields
        .ok_or_else(|| SynthError::EncodingError("RIFF chunk size overflows u32".to_string()))?;
    let byte_rate = format
        .byte_rate()
        .ok_or_else(|| SynthError::EncodingError(format!("byte rate overflows at {} Hz", format.sample_rate)))?;

    let write = |writer: &mut W| -> io::Result<()> {
        writer.write_all(b"RIFF")?;
        writer.write_all(&file_size.to_le_bytes())?;
        writer.write_all(b"WAVE")?;

        writer.write_all(b"fmt ")?;
        writer.write_all(&FMT_CHUNK_LEN.to_le_bytes())?;
        writer.write_all(&format.bit_depth.format_code().to_le_bytes())?;
        writer.write_all(&format.channels.to_le_bytes())?;
        writer.write_all(&format.sample_rate.to_le_bytes())?;
        writer.write_all(&byte_rate.to_le_bytes())?;
        writer.write_all(&format.block_align().to_le_bytes())?;
        writer.write_all(&format.bit_depth.bits_per_sample().to_le_bytes())?;

        writer.write_all(b"data")?;
        writer.write_all(&data_size.to_le_bytes())?;
        writer.write_all(pcm_data)
    };
    write(writer).map_err(|e| SynthError::EncodingError(e.to_string()))
}

fn samples_to_f32le(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

fn samples_to_pcm16(samples: &[f32]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&s| ((s.clamp(-1.0, 1.0) * PCM16_SCALE).round() as i16).to_le_bytes())
        .collect()
}
