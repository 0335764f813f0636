use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use keytone_core::{
    driver, keymap, list_output_devices, probe_sine, sine, AppConfig, AudioConfig, InputPoller,
    PollConfig, SharedFrequency, ToneEngine, ToneError,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command.unwrap_or(Commands::Play(PlayArgs::default())) {
        Commands::Play(args) => run_play(args.into_config()),
        Commands::Keys => run_keys(),
        Commands::Devices => run_devices(),
        Commands::Probe {
            key_index,
            seconds,
            audio,
        } => run_probe(key_index, seconds, audio.into_config()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("keytone: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_play(config: AppConfig) -> keytone_core::Result<()> {
    config.validate()?;
    tracing::info!(?config, "starting tone generator");

    let mut engine = ToneEngine::open(&config.audio)?;
    let input = InputPoller::initialize()?;

    let frequency = SharedFrequency::new(0.0);
    engine.set_waveform(sine(frequency.clone()));
    engine.play()?;

    tracing::info!("hold Z S X C F V G B N J M K , L . / to play, Escape to quit");
    driver::run_until_exit(&input, &frequency, config.poll.interval());
    finish_session(engine.pause())
}

/// Outcome of the pause issued after the exit key. The session has already
/// ended normally, so a backend refusal is only logged.
fn finish_session(paused: keytone_core::Result<()>) -> keytone_core::Result<()> {
    if let Err(err) = paused {
        tracing::warn!(%err, "failed to pause audio on exit");
    }
    Ok(())
}

fn run_keys() -> keytone_core::Result<()> {
    let table = serde_json::to_string_pretty(&keymap::bindings())?;
    println!("{table}");
    Ok(())
}

fn run_devices() -> keytone_core::Result<()> {
    for name in list_output_devices()? {
        println!("{name}");
    }
    Ok(())
}

fn run_probe(key_index: usize, seconds: f64, audio: AudioConfig) -> keytone_core::Result<()> {
    let binding = keymap::bindings()
        .into_iter()
        .nth(key_index)
        .ok_or_else(|| {
            ToneError::invalid_config(format!(
                "key index {key_index} is outside 0..{}",
                keymap::NOTE_KEYS.len()
            ))
        })?;

    tracing::info!(key = ?binding.key, expected_hz = binding.frequency_hz, "probing note");
    let report = probe_sine(&audio, binding.frequency_hz, seconds)?;
    println!("{:?} (semitone {}): {report}", binding.key, binding.semitone);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Play sine tones from the computer keyboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the output device and play while note keys are held (default).
    Play(PlayArgs),
    /// Print the note key table as JSON.
    Keys,
    /// List available output devices.
    Devices,
    /// Render a note offline and report the detected pitch.
    Probe {
        /// Position in the note table, 0 through 15.
        #[arg(short, long, default_value_t = 0)]
        key_index: usize,
        /// Length of the rendered block in seconds.
        #[arg(short, long, default_value_t = 1.0)]
        seconds: f64,
        #[command(flatten)]
        audio: AudioArgs,
    },
}

#[derive(Args, Debug, Default)]
struct PlayArgs {
    #[command(flatten)]
    audio: AudioArgs,
    /// Microseconds to sleep between key scans; 0 polls continuously.
    #[arg(long, default_value_t = 0)]
    poll_interval_us: u64,
}

impl PlayArgs {
    fn into_config(self) -> AppConfig {
        AppConfig {
            audio: self.audio.into_config(),
            poll: PollConfig {
                interval_micros: self.poll_interval_us,
            },
        }
    }
}

#[derive(Args, Debug, Default)]
struct AudioArgs {
    /// Output sample rate in Hz.
    #[arg(long)]
    sample_rate: Option<u32>,
    /// Peak sample value for a full-scale waveform.
    #[arg(long)]
    amplitude: Option<u16>,
}

impl AudioArgs {
    fn into_config(self) -> AudioConfig {
        let defaults = AudioConfig::default();
        AudioConfig {
            sample_rate: self.sample_rate.unwrap_or(defaults.sample_rate),
            amplitude: self.amplitude.unwrap_or(defaults.amplitude),
            buffer_frames: defaults.buffer_frames,
        }
    }
}
