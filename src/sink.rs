//! Where finished WAV files go.

use crate::error::Result;
use crate::wav::WavBytes;

/// The playback or storage collaborator at the end of the pipeline.
/// Takes ownership of the file; the renderer keeps nothing.
pub trait AudioSink {
    fn consume(&mut self, wav: WavBytes) -> Result<()>;
}

/// Keeps every rendered file in memory, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub clips: Vec<WavBytes>,
}

impl AudioSink for MemorySink {
    fn consume(&mut self, wav: WavBytes) -> Result<()> {
        self.clips.push(wav);
        Ok(())
    }
}

#[cfg(feature = "playback")]
pub use speaker::SpeakerSink;

#[cfg(feature = "playback")]
mod speaker {
    use std::time::Duration;

    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{Device, StreamConfig};
    use log::{debug, error};

    use super::AudioSink;
    use crate::error::{Result, SynthError};
    use crate::wav::WavBytes;

    /// Plays clips on the default output device, blocking until each one has finished.
    ///
    /// The stream is always built with `f32` samples. Devices that only take
    /// `i16`/`u16` output fail in `consume` with `SynthError::AudioError`.
    pub struct SpeakerSink {
        device: Device,
        stream_config: StreamConfig,
    }

    impl SpeakerSink {
        pub fn new() -> Result<Self> {
            let host = cpal::default_host();
            let device = host.default_output_device()
                .ok_or_else(|| SynthError::AudioError("No output device found".to_string()))?;
            let config = device.default_output_config()
                .map_err(|e| SynthError::AudioError(e.to_string()))?;

            Ok(SpeakerSink {
                device,
                stream_config: config.config(),
            })
        }
    }

    impl AudioSink for SpeakerSink {
        fn consume(&mut self, wav: WavBytes) -> Result<()> {
            let decoded = wav.decode()?;
            if decoded.samples.is_empty() {
                return Ok(());
            }

            let out_rate = self.stream_config.sample_rate.0;
            let channels = self.stream_config.channels as usize;
            let step = decoded.sample_rate as f64 / out_rate as f64; // Nearest-sample rate conversion
            let seconds = decoded.samples.len() as f64 / decoded.sample_rate as f64;
            debug!("playing {:.2}s clip at {} Hz on a {} Hz device", seconds, decoded.sample_rate, out_rate);

            let samples = decoded.samples;
            let mut frame_idx = 0usize;
            let stream = self.device.build_output_stream(
                &self.stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let src = (frame_idx as f64 * step) as usize;
                        let value = samples.get(src).copied().unwrap_or(0.0);
                        for sample in frame.iter_mut() {
                            *sample = value;
                        }
                        frame_idx += 1;
                    }
                },
                |err| error!("Stream error: {}", err),
                None
            ).map_err(|e| SynthError::AudioError(e.to_string()))?;

            stream.play().map_err(|e| SynthError::AudioError(e.to_string()))?;
            // Let the device drain its last buffer before the stream is dropped
            std::thread::sleep(Duration::from_secs_f64(seconds) + Duration::from_millis(100));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_melody;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_sink_keeps_order() {
        let mut sink = MemorySink::default();
        let first = render_melody("C4").unwrap();
        let second = render_melody("").unwrap();
        sink.consume(first.clone()).unwrap();
        sink.consume(second.clone()).unwrap();
        assert_eq!(sink.clips, vec![first, second]);
    }
}
