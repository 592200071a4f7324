use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chantcount", about = "Count repeated phrases in audio recordings")]
pub struct Cli {
    /// Input audio files (WAV, MP3, FLAC, OGG, AAC)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Config file (TOML). Defaults to ./chantcount.toml or the user config dir
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print results as a JSON array
    #[arg(long)]
    pub json: bool,

    /// Write <stem>.trace.json with every intermediate buffer into this directory
    #[arg(long)]
    pub trace_dir: Option<PathBuf>,

    /// Rate to resample every input to before analysis, in Hz
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Analysis window length in samples
    #[arg(long)]
    pub window: Option<usize>,

    /// Hop length in samples
    #[arg(long)]
    pub hop: Option<usize>,

    /// Gaussian smoothing sigma in frames
    #[arg(long)]
    pub sigma: Option<f32>,

    /// Peak threshold as a fraction of the strongest rising edge
    #[arg(long)]
    pub delta: Option<f32>,

    /// Minimum frames between two counted repetitions
    #[arg(long)]
    pub wait: Option<usize>,

    /// Noise gate threshold as a multiple of the RMS
    #[arg(long)]
    pub rms_factor: Option<f32>,

    /// Subtract the mean from the onset envelope
    #[arg(long)]
    pub detrend: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::try_parse_from([
            "chantcount", "a.wav", "b.mp3", "--wait", "20", "--delta", "0.3", "--json",
        ])
        .unwrap();
        assert_eq!(cli.inputs.len(), 2);
        assert_eq!(cli.wait, Some(20));
        assert_eq!(cli.delta, Some(0.3));
        assert!(cli.json);
        assert!(cli.hop.is_none());
        assert!(cli.sample_rate.is_none());
    }

    #[test]
    fn test_parse_sample_rate() {
        let cli = Cli::try_parse_from(["chantcount", "a.wav", "--sample-rate", "44100"]).unwrap();
        assert_eq!(cli.sample_rate, Some(44100));
    }

    #[test]
    fn test_requires_input() {
        assert!(Cli::try_parse_from(["chantcount"]).is_err());
    }
}
