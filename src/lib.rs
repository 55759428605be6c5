//  _
// | |__  _   _ _ __ ___
// | '_ \| | | | '_ ` _ \
// | | | | |_| | | | | | |
// |_| |_|\__,_|_| |_| |_|

pub mod error;
pub mod note;
pub mod waveform;
pub mod synth;
pub mod signal;
pub mod wav;
pub mod render;
pub mod sink;

pub use error::{Result, SynthError};
pub use note::{NoteToken, NoteName, Accidental, ParsePolicy, Resolution, resolve, resolve_report, resolve_with_policy, split_melody};
pub use waveform::WaveformType;
pub use synth::{SynthConfig, ToneSynthesizer, ToneBuffer};
pub use signal::{Signal, assemble};
pub use wav::{BitDepth, WavBytes, WavFormat, WavHeader, DecodedWav, encode};
pub use render::{Renderer, render_melody};
pub use sink::{AudioSink, MemorySink};
#[cfg(feature = "playback")]
pub use sink::SpeakerSink;
