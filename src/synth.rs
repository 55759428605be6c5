//! Single-oscillator tone rendering.
//!
//! Every note becomes a flat, unshaped wave of fixed length. There is no
//! attack or release, so consecutive notes click at their boundaries.

use crate::error::{Result, SynthError};
use crate::waveform::WaveformType;

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_NOTE_DURATION: f64 = 0.5;

/// Most samples one note may hold: 32-bit samples must fit a u32 `data` chunk.
pub const MAX_SAMPLES_PER_NOTE: u64 = u32::MAX as u64 / 4;

#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub duration_seconds: f64, // Per note
    pub sample_rate: u32,
    pub amplitude: f32, // 0.0 ..= 1.0
    pub waveform: WaveformType,
    pub noise_seed: u64, // Only read by WaveformType::Noise
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            duration_seconds: DEFAULT_NOTE_DURATION,
            sample_rate: DEFAULT_SAMPLE_RATE,
            amplitude: 1.0,
            waveform: WaveformType::Sine,
            noise_seed: 0,
        }
    }
}

impl SynthConfig {
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = seconds;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_waveform(mut self, waveform: WaveformType) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.duration_seconds.is_finite() || self.duration_seconds <= 0.0 {
            return Err(SynthError::InvalidConfig(format!(
                "note duration must be positive, got {}",
                self.duration_seconds
            )));
        }
        if self.sample_rate == 0 {
            return Err(SynthError::InvalidConfig("sample rate must be positive".to_string()));
        }
        let samples = (self.duration_seconds * self.sample_rate as f64).round();
        if samples > MAX_SAMPLES_PER_NOTE as f64 {
            return Err(SynthError::InvalidConfig(format!(
                "{}s at {} Hz is {} samples per note, the limit is {}",
                self.duration_seconds, self.sample_rate, samples, MAX_SAMPLES_PER_NOTE
            )));
        }
        if !(0.0..=1.0).contains(&self.amplitude) {
            return Err(SynthError::InvalidConfig(format!(
                "amplitude must lie in [0, 1], got {}",
                self.amplitude
            )));
        }
        Ok(())
    }

    /// round(duration * sample_rate)
    pub fn samples_per_note(&self) -> usize {
        (self.duration_seconds * self.sample_rate as f64).round() as usize
    }
}

/// Samples of one rendered note.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToneBuffer {
    samples: Vec<f32>,
}

impl ToneBuffer {
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub(crate) fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

#[derive(Debug, Clone)]
pub struct ToneSynthesizer {
    config: SynthConfig,
}

impl ToneSynthesizer {
    pub fn new(config: SynthConfig) -> Result<Self> {
        config.validate()?;
        Ok(ToneSynthesizer { config })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn render(&self, freq: f64) -> Result<ToneBuffer> {
        check_frequency(freq)?;
        let config = &self.config;
        // Whole periods per sample drop out, so huge frequencies never overflow
        let step = (freq / config.sample_rate as f64).fract();
        let mut rng = fastrand::Rng::with_seed(config.noise_seed);

        let samples = (0..config.samples_per_note())
            .map(|i| {
                let cycles = (step * i as f64).fract();
                config.amplitude * config.waveform.generate_sample(cycles, &mut rng) as f32
            })
            .collect();

        Ok(ToneBuffer { samples })
    }
}

impl Default for ToneSynthesizer {
    fn default() -> Self {
        ToneSynthesizer { config: SynthConfig::default() }
    }
}

/// One sine tone with explicit parameters.
pub fn render(freq: f64, duration_seconds: f64, sample_rate: u32, amplitude: f32) -> Result<ToneBuffer> {
    let config = SynthConfig::default()
        .with_duration(duration_seconds)
        .with_sample_rate(sample_rate)
        .with_amplitude(amplitude);
    ToneSynthesizer::new(config)?.render(freq)
}

fn check_frequency(freq: f64) -> Result<()> {
    if !freq.is_finite() || freq <= 0.0 {
        return Err(SynthError::InvalidConfig(format!("frequency must be positive, got {}", freq)));
    }
    Ok(())
}
