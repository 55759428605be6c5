use log::debug;

use crate::error::Result;
use crate::note::{self, ParsePolicy};
use crate::signal::{self, Signal};
use crate::synth::{SynthConfig, ToneSynthesizer};
use crate::wav::{self, BitDepth, WavBytes};

/// Melody text in, WAV bytes out.
///
/// Tokens are resolved to frequencies, each note is rendered for the configured
/// duration, the notes are joined in order and the result is encoded as mono WAV.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    synth: ToneSynthesizer,
    policy: ParsePolicy,
    bit_depth: BitDepth,
}

impl Renderer {
    pub fn new(config: SynthConfig) -> Result<Self> {
        Ok(Renderer {
            synth: ToneSynthesizer::new(config)?,
            policy: ParsePolicy::default(),
            bit_depth: BitDepth::default(),
        })
    }

    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = bit_depth;
        self
    }

    pub fn config(&self) -> &SynthConfig {
        self.synth.config()
    }

    pub fn policy(&self) -> ParsePolicy {
        self.policy
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub fn render_signal<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Signal> {
        let freqs = note::resolve_with_policy(tokens, self.policy)?;
        debug!("{} of {} tokens are notes", freqs.len(), tokens.len());

        let buffers = freqs
            .iter()
            .map(|&freq| self.synth.render(freq))
            .collect::<Result<Vec<_>>>()?;
        Ok(signal::assemble(buffers))
    }

    pub fn render_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Result<WavBytes> {
        let signal = self.render_signal(tokens)?;
        let sample_rate = self.config().sample_rate;
        let wav = wav::encode(&signal, sample_rate, self.bit_depth)?;
        debug!(
            "encoded {} samples ({:.2}s) into {} bytes",
            signal.len(),
            signal.duration_seconds(sample_rate),
            wav.len()
        );
        Ok(wav)
    }

    pub fn render_melody(&self, melody: &str) -> Result<WavBytes> {
        self.render_tokens(&note::split_melody(melody))
    }
}

/// Renders a melody line with the stock settings: 0.5s sine notes, 44.1kHz, float WAV.
pub fn render_melody(melody: &str) -> Result<WavBytes> {
    Renderer::default().render_melody(melody)
}
