//! interrupter - play a Tesla coil interrupter from the terminal
//!
//! The audio device stands in for the coil: every pulse becomes a short click,
//! so the pulse train is audible at the pitch the coil would sing at.
//!
//! Run with: cargo run --bin interrupter -- --mode midi-usb --midi-port keystation

mod app;
mod midi_input;
mod ui;

use std::{fs::File, path::Path, path::PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use coil_interrupter::{config::InterrupterConfig, engine::mode::SystemMode};

use app::CoilApp;

#[derive(Parser)]
#[command(name = "interrupter")]
#[command(about = "Musical Tesla coil interrupter, desktop host", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start in this mode (overrides the config file)
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Pulse on-time in microseconds
    #[arg(long)]
    width: Option<u32>,

    /// Free-running period in microseconds
    #[arg(long)]
    period: Option<u32>,

    /// Enable bend jitter in the fixed-frequency mode
    #[arg(long)]
    bend: bool,

    /// Connect to the first MIDI input whose name contains this text
    #[arg(long)]
    midi_port: Option<String>,

    /// Where to write the log
    #[arg(long, default_value = "interrupter.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    MidiUsb,
    MidiJack,
    Fixed,
    Pink,
}

impl From<ModeArg> for SystemMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::MidiUsb => SystemMode::MidiUsb,
            ModeArg::MidiJack => SystemMode::MidiJack,
            ModeArg::Fixed => SystemMode::FreqFixed,
            ModeArg::Pink => SystemMode::FreqPink,
        }
    }
}

fn init_logging(path: &Path, verbose: bool) -> EyreResult<()> {
    use simplelog::*;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let file = File::create(path)
        .wrap_err_with(|| format!("cannot create log file {}", path.display()))?;
    WriteLogger::init(level, Config::default(), file).wrap_err("failed to initialize logger")?;

    log::info!("interrupter starting (log level: {level:?})");
    Ok(())
}

fn load_config(cli: &Cli) -> EyreResult<InterrupterConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&text).wrap_err_with(|| format!("failed to parse {}", path.display()))?
        }
        None => InterrupterConfig::default(),
    };

    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }
    if let Some(width) = cli.width {
        config.pulse_width_us = width;
    }
    if let Some(period) = cli.period {
        config.pulse_period_us = period;
    }
    if cli.bend {
        config.bend.enabled = true;
    }

    config.validate().wrap_err("invalid configuration")?;
    log::debug!("configuration: {config:?}");
    Ok(config)
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.log_file, cli.verbose)?;
    let config = load_config(&cli)?;

    CoilApp::new(config)
        .midi_port(cli.midi_port)
        .run()
}
