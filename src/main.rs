mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chantcount::config::{self, CounterConfig};
use chantcount::{decode_file, LogObserver, RepetitionCounter};
use cli::Cli;

#[derive(Debug, Serialize)]
struct FileReport {
    file: PathBuf,
    sample_rate: u32,
    duration_secs: f32,
    repetitions: usize,
    onset_times: Vec<f32>,
    grouped_onsets: Vec<f32>,
    spaced_onsets: Vec<f32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let mut config = match resolve_config_path(cli.config.clone()) {
        Some(path) => {
            let cfg = config::load_config(&path)?;
            log::info!("Loaded config from {}", path.display());
            cfg
        }
        None => CounterConfig::default(),
    };
    apply_overrides(&mut config, &cli);

    let counter = RepetitionCounter::new(config).context("Invalid pipeline configuration")?;

    if let Some(dir) = &cli.trace_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create trace directory: {}", dir.display()))?;
    }

    let pb = if cli.inputs.len() > 1 {
        let pb = ProgressBar::new(cli.inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({eta} remaining)")?
                .progress_chars("=>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    // Each file gets its own buffers and observer; the counter is shared read-only
    let results: Vec<(PathBuf, Result<FileReport>)> = cli
        .inputs
        .par_iter()
        .map(|path| {
            let result = analyze_file(path, &counter, cli.trace_dir.as_deref());
            pb.inc(1);
            (path.clone(), result)
        })
        .collect();
    pb.finish_and_clear();

    let mut reports = Vec::with_capacity(results.len());
    let mut failures = 0;
    for (path, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                failures += 1;
                log::error!("{}: {:#}", path.display(), e);
            }
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!(
                "{}: {} repetitions ({:.1}s @ {}Hz)",
                report.file.display(),
                report.repetitions,
                report.duration_secs,
                report.sample_rate
            );
            if !report.onset_times.is_empty() {
                println!("  onsets:  {}", format_times(&report.onset_times));
                println!("  grouped: {}", format_times(&report.grouped_onsets));
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files failed", failures, cli.inputs.len());
    }
    Ok(())
}

/// Explicit --config path, else ./chantcount.toml, else the user config dir.
fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let local = PathBuf::from("chantcount.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("chantcount").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    })
}

fn apply_overrides(config: &mut CounterConfig, cli: &Cli) {
    if let Some(rate) = cli.sample_rate {
        config.audio.sample_rate = rate;
    }
    if let Some(window) = cli.window {
        config.onset.window_length = window;
    }
    if let Some(hop) = cli.hop {
        config.onset.hop_length = hop;
    }
    if let Some(sigma) = cli.sigma {
        config.onset.sigma = sigma;
    }
    if let Some(delta) = cli.delta {
        config.peaks.delta_factor = delta;
    }
    if let Some(wait) = cli.wait {
        config.peaks.wait = wait;
    }
    if let Some(factor) = cli.rms_factor {
        config.clean.rms_factor = factor;
    }
    if cli.detrend {
        config.onset.detrend = true;
    }
}

fn analyze_file(path: &Path, counter: &RepetitionCounter, trace_dir: Option<&Path>) -> Result<FileReport> {
    let waveform = decode_file(path)?;

    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let observer = LogObserver::new(label);

    let trace = counter
        .trace(waveform.samples(), waveform.sample_rate(), &observer)
        .context("Onset analysis failed")?;

    if let Some(dir) = trace_dir {
        let stem = path.file_stem().map_or_else(|| "input".into(), |s| s.to_string_lossy());
        let trace_path = dir.join(format!("{}.trace.json", stem));
        let file = File::create(&trace_path)
            .with_context(|| format!("Failed to create trace file: {}", trace_path.display()))?;
        serde_json::to_writer(BufWriter::new(file), &trace)
            .with_context(|| format!("Failed to write trace file: {}", trace_path.display()))?;
        log::info!("Wrote trace to {}", trace_path.display());
    }

    Ok(FileReport {
        file: path.to_path_buf(),
        sample_rate: waveform.sample_rate(),
        duration_secs: waveform.duration_secs(),
        repetitions: trace.count(),
        grouped_onsets: counter.grouped_onsets(&trace),
        spaced_onsets: counter.spaced_onsets(&trace),
        onset_times: trace.peak_times,
    })
}

fn format_times(times: &[f32]) -> String {
    times
        .iter()
        .map(|t| format!("{:.2}s", t))
        .collect::<Vec<_>>()
        .join(" ")
}
