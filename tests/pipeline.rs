//! End-to-end rendering: tokens through to WAV bytes.

use hum::{
    assemble, encode, resolve, BitDepth, ParsePolicy, Renderer, Signal, SynthConfig, SynthError, ToneSynthesizer,
    WavHeader,
};
use pretty_assertions::assert_eq;

#[test]
fn test_mixed_tokens_scenario() {
    let tokens = ["C4", "X9", "E4", ""];

    let freqs = resolve(&tokens);
    assert_eq!(freqs.len(), 2);
    assert!((freqs[0] - 261.63).abs() < 0.01);
    assert!((freqs[1] - 329.63).abs() < 0.01);

    let synth = ToneSynthesizer::new(SynthConfig::default()).unwrap();
    let buffers: Vec<_> = freqs.iter().map(|&f| synth.render(f).unwrap()).collect();
    assert!(buffers.iter().all(|b| b.len() == 22050));

    let signal = assemble(buffers);
    assert_eq!(signal.len(), 44100);

    let wav = encode(&signal, 44100, BitDepth::Float32).unwrap();
    assert_eq!(wav.len(), 176_444);
    let header = wav.header().unwrap();
    assert_eq!(header.data_size, 176_400);
    assert_eq!(header.chunk_size, 176_436);

    // Same result through the facade
    assert_eq!(Renderer::default().render_tokens(&tokens).unwrap(), wav);
}

#[test]
fn test_empty_input_scenario() {
    let tokens: [&str; 0] = [];
    let wav = Renderer::default().render_tokens(&tokens).unwrap();
    assert_eq!(wav.len(), 44);

    let header = wav.header().unwrap();
    assert_eq!(header.data_size, 0);
    assert!(header.matches_len(wav.len()));
    assert!(wav.decode().unwrap().samples.is_empty());
}

#[test]
fn test_header_round_trip() {
    let signal = Signal::from_samples(vec![0.1; 1234]);
    let wav = encode(&signal, 44100, BitDepth::Float32).unwrap();
    let header = WavHeader::parse(wav.as_bytes()).unwrap();

    assert_eq!(header.chunk_size as usize, wav.len() - 8);
    assert_eq!(header.data_size as usize, signal.len() * 4);
    assert_eq!(header.fmt_chunk_size, 16);
    assert_eq!(header.audio_format, 3);
    assert_eq!(header.channels, 1);
    assert_eq!(header.sample_rate, 44100);
    assert_eq!(header.byte_rate, 176_400);
    assert_eq!(header.block_align, 4);
    assert_eq!(header.bits_per_sample, 32);
}

#[test]
fn test_malformed_neighbours_do_not_shift_frequencies() {
    let clean = resolve(&["A4", "C5", "G3"]);
    let noisy = resolve(&["H4", "A4", "C", "C5", "4C", "G3", ""]);
    assert_eq!(noisy.len(), 7 - 4);
    assert_eq!(noisy, clean);
}

#[test]
fn test_decoded_audio_matches_signal() {
    let renderer = Renderer::default();
    let signal = renderer.render_signal(&["A4", "A5"]).unwrap();
    let decoded = renderer.render_tokens(&["A4", "A5"]).unwrap().decode().unwrap();

    assert_eq!(decoded.sample_rate, 44100);
    assert_eq!(decoded.channels, 1);
    assert_eq!(decoded.samples, signal.samples().to_vec());
}

#[test]
fn test_melody_string_input() {
    let wav = hum::render_melody("C4 D4 E4 F4\nG4").unwrap();
    assert_eq!(wav.header().unwrap().data_size, 5 * 22050 * 4);
}

#[test]
fn test_strict_mode_reports_drop() {
    let renderer = Renderer::default().with_policy(ParsePolicy::Strict);
    match renderer.render_melody("C4 E4 H2") {
        Err(SynthError::ParseError(msg)) => assert!(msg.contains("H2")),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_renders_in_parallel() {
    let melodies = ["C4 E4 G4", "A3 C4 E4", "D4 F#4 A4", "Bb3 D4 F4"];
    let handles: Vec<_> = melodies
        .iter()
        .map(|m| {
            let m = m.to_string();
            std::thread::spawn(move || hum::render_melody(&m).unwrap())
        })
        .collect();

    for (handle, melody) in handles.into_iter().zip(melodies) {
        assert_eq!(handle.join().unwrap(), hum::render_melody(melody).unwrap());
    }
}
