use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveformType {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
    Noise,
}

impl WaveformType {
    /// `cycles` is the number of periods elapsed since the start of the note (freq * t).
    pub fn generate_sample(&self, cycles: f64, rng: &mut fastrand::Rng) -> f64 {
        match self {
            WaveformType::Sine => (TAU * cycles).sin(),
            WaveformType::Square => if cycles.fract() < 0.5 { 1.0 } else { -1.0 },
            WaveformType::Sawtooth => cycles.fract() * 2.0 - 1.0,
            WaveformType::Noise => rng.f64() * 2.0 - 1.0,
            WaveformType::Triangle => {
                let p = cycles.fract();
                if p < 0.5 { p * 4.0 - 1.0 } else { 3.0 - p * 4.0 }
            }
        }
    }
}
