//! Render every voice of a bank file to WAV.
//!
//! Usage: `cargo run --example render_bank -- <bank.syx> [note]`
//!
//! The file may be a 32 voice bulk dump or raw bank data. One file per voice
//! is written to `out/bank/`.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use simple_logger::SimpleLogger;

use dxfm::bank::{VoiceBank, VoiceBanks, VOICES_PER_BANK};
use dxfm::config::EngineConfig;
use dxfm::engine::FmEngine;

const SAMPLE_RATE: u32 = 48000;
const BLOCK_SIZE: usize = 32;

const NOTE_ON_SECONDS: f32 = 1.0;
const RELEASE_SECONDS: f32 = 0.5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("missing bank file")?;
    let note = match args.next() {
        Some(note) => note.parse::<u8>()?,
        None => 60,
    };

    let bank = VoiceBank::from_bytes(&std::fs::read(&path)?)?;
    let store = VoiceBanks::new(vec![bank.clone()]);
    let mut engine: FmEngine = FmEngine::new(EngineConfig::new(SAMPLE_RATE as f32), store);

    let out_dir = Path::new("out/bank");
    std::fs::create_dir_all(out_dir)?;

    for voice in 0..VOICES_PER_BANK {
        engine.select_voice(0, voice)?;

        let name = bank.voice_name(voice)?.to_string();
        let file_name = format!("{:02}_{}.wav", voice + 1, name.replace(['/', ' '], "_"));

        log::info!("Rendering voice {}: '{}'", voice + 1, name);

        let samples = render(&mut engine, note);
        write(&out_dir.join(file_name), &samples)?;
    }

    Ok(())
}

fn render(engine: &mut FmEngine, note: u8) -> Vec<f32> {
    let mut out = [0.0; BLOCK_SIZE];
    let mut samples = Vec::new();

    let on_blocks = (NOTE_ON_SECONDS * SAMPLE_RATE as f32) as usize / BLOCK_SIZE;
    let release_blocks = (RELEASE_SECONDS * SAMPLE_RATE as f32) as usize / BLOCK_SIZE;

    engine.note_on();

    for block in 0..on_blocks + release_blocks {
        if block == on_blocks {
            engine.note_off();
        }

        engine.render(note, 0.0, &mut out);
        samples.extend_from_slice(&out);
    }

    samples
}

fn write(path: &Path, samples: &[f32]) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;

    for sample in samples {
        writer.write_sample(*sample)?;
    }

    writer.finalize()
}
