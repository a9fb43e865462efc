//! Replay recorded screening traces through the detection engine.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use fast_screening::{
    baseline::PriorBaseline,
    config::{Config, EXAMPLE_CONFIG},
    features::{facial::FaceObservation, facial::FacialAsymmetryExtractor, speech::SpeechSegment},
    replay::{read_trace, replay, TraceRecord},
    session::DetectionSession,
    speech_monitor::SpeechRateMonitor,
    wire::SessionId,
};
use log::{info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Modality {
    /// Face landmark trace, scored by the asymmetry index
    Facial,
    /// Transcribed speech trace; the first record is the calibration sample
    Speech,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-lines trace to replay
    #[arg(short, long, required_unless_present = "write_config")]
    trace: Option<PathBuf>,

    /// Modality of the trace
    #[arg(short, long, value_enum, default_value = "facial")]
    modality: Modality,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Prior facial baseline (JSON) to skip calibration
    #[arg(long)]
    prior: Option<PathBuf>,

    /// Write the facial baseline at the end of the trace to this file (JSON)
    #[arg(long)]
    save_baseline: Option<PathBuf>,

    /// Print every scored tick as a JSON line
    #[arg(short, long)]
    print_results: bool,

    /// Write an example configuration file and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if let Some(path) = &args.write_config {
        std::fs::write(path, EXAMPLE_CONFIG).with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote example configuration to {}", path.display());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            match Config::from_file(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("Failed to load config file: {}. Using defaults.", e);
                    Config::default()
                }
            }
        }
        None => Config::default(),
    };
    config.validate()?;

    let Some(trace) = &args.trace else {
        bail!("no trace given");
    };

    match args.modality {
        Modality::Facial => run_facial(&args, config, trace),
        Modality::Speech => run_speech(&args, config, trace),
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn run_facial(args: &Args, config: Config, trace: &Path) -> Result<()> {
    let mut session_config = config.facial;
    if let Some(path) = &args.prior {
        session_config.prior_baseline = Some(PriorBaseline::from_file(path)?);
    }

    let records: Vec<TraceRecord<FaceObservation>> = read_trace(open(trace)?)?;
    let mut session = DetectionSession::new(session_config, FacialAsymmetryExtractor::default())?;

    let summary = replay(&mut session, &records, |result| {
        if args.print_results {
            if let Ok(line) = serde_json::to_string(result) {
                println!("{line}");
            }
        }
    });

    info!(
        "{} ticks ({} scored, {} without a face), final state {}",
        summary.ticks, summary.scored, summary.skipped, summary.final_state
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(path) = &args.save_baseline {
        match &summary.baseline {
            Some(baseline) => {
                baseline.to_file(path)?;
                info!("Saved baseline to {}", path.display());
            }
            None => warn!("Trace ended before calibration completed; no baseline saved"),
        }
    }
    Ok(())
}

fn run_speech(args: &Args, config: Config, trace: &Path) -> Result<()> {
    let records: Vec<TraceRecord<SpeechSegment>> = read_trace(open(trace)?)?;
    let Some((calibration, segments)) = records.split_first() else {
        bail!("speech trace is empty");
    };

    let mut monitor = SpeechRateMonitor::new(SessionId::new("replay"), config.speech)?;
    let calibrated = monitor.calibrate(&calibration.observation)?;
    info!(
        "Baseline {:.2} chars/s from {:.1}s sample",
        calibrated.baseline, calibrated.duration
    );

    for record in segments {
        let response = monitor.submit_segment(&record.observation);
        if args.print_results {
            println!("{}", serde_json::to_string(&response)?);
        }
    }

    println!("{}", serde_json::to_string_pretty(&monitor.status())?);
    Ok(())
}
