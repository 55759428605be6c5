use crate::synth::ToneBuffer;

/// The whole melody as one mono sample stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signal {
    samples: Vec<f32>,
}

impl Signal {
    pub fn from_samples(samples: Vec<f32>) -> Self {
        Signal { samples }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self, sample_rate: u32) -> f64 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / sample_rate as f64
    }

    /// Largest absolute sample, 0.0 for an empty signal.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |max, s| max.max(s.abs()))
    }
}

/// Joins note buffers end to end. No mixing, fading or resampling happens here;
/// every buffer is expected to share one sample rate.
pub fn assemble(buffers: Vec<ToneBuffer>) -> Signal {
    let total = buffers.iter().map(ToneBuffer::len).sum();
    let mut samples = Vec::with_capacity(total);
    for buffer in buffers {
        samples.extend(buffer.into_samples());
    }
    Signal { samples }
}
