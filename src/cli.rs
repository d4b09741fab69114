//! Command-line argument parser.
//!
//! Flags override the values read from the environment.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::AppConfig;
use crate::pipeline::RunOptions;
use crate::tempo::RefreshPolicy;

/// Which cached tempo records to look up again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RefreshArg {
    /// Trust every cached record
    #[default]
    Never,
    /// Retry tracks previously recorded as not found
    Missing,
    /// Look up every track again
    All,
}

impl From<RefreshArg> for RefreshPolicy {
    fn from(arg: RefreshArg) -> Self {
        match arg {
            RefreshArg::Never => RefreshPolicy::Never,
            RefreshArg::Missing => RefreshPolicy::Missing,
            RefreshArg::All => RefreshPolicy::All,
        }
    }
}

/// bpm-playlist: build a playlist of liked songs within a tempo range
#[derive(Parser, Debug)]
#[command(name = "bpm-playlist")]
#[command(about = "Build a Spotify playlist of liked songs within a BPM range")]
#[command(version)]
pub struct Cli {
    /// Lower tempo bound, inclusive (default 175)
    #[arg(long)]
    pub min_bpm: Option<f64>,

    /// Upper tempo bound, inclusive (default 185)
    #[arg(long)]
    pub max_bpm: Option<f64>,

    /// Name of the playlist to create
    #[arg(short = 'n', long)]
    pub playlist_name: Option<String>,

    /// Directory for the library, tempo and token caches
    #[arg(short, long)]
    pub cache_dir: Option<PathBuf>,

    /// Ignore the library snapshot and fetch liked songs again
    #[arg(long)]
    pub refresh_library: bool,

    /// Which cached tempo records to look up again
    #[arg(long, value_enum, default_value_t = RefreshArg::Never)]
    pub refresh_tempo: RefreshArg,

    /// Create the playlist as public
    #[arg(long)]
    pub public: bool,

    /// Resolve and filter, but do not create a playlist
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Overrides configuration values with the flags that were given.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(min) = self.min_bpm {
            config.min_bpm = min;
        }
        if let Some(max) = self.max_bpm {
            config.max_bpm = max;
        }
        if let Some(ref name) = self.playlist_name {
            config.playlist_name = name.clone();
        }
        if let Some(ref dir) = self.cache_dir {
            config.cache_path = Some(dir.clone());
        }
        if self.public {
            config.public = true;
        }
    }

    /// Returns the per-run options.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            refresh_library: self.refresh_library,
            refresh_tempo: self.refresh_tempo.into(),
            dry_run: self.dry_run,
        }
    }

    /// Returns the default log filter directive.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_config_untouched() {
        let cli = Cli::try_parse_from(["bpm-playlist"]).unwrap();
        let mut config = AppConfig::new();
        cli.apply_to(&mut config);

        assert_eq!(config.min_bpm, 175.0);
        assert_eq!(config.max_bpm, 185.0);
        assert_eq!(config.playlist_name, "180 BPM Running Hits");
        assert!(config.cache_path.is_none());
        assert!(!config.public);

        let options = cli.run_options();
        assert!(!options.refresh_library);
        assert!(!options.dry_run);
        assert_eq!(options.refresh_tempo, RefreshPolicy::Never);
        assert_eq!(cli.log_level(), "info");
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "bpm-playlist",
            "--min-bpm",
            "160",
            "--max-bpm",
            "170",
            "--playlist-name",
            "Tempo Run",
            "--cache-dir",
            "/tmp/bpm-cache",
            "--public",
        ])
        .unwrap();
        let mut config = AppConfig::new();
        config.playlist_name = "From Env".to_string();
        cli.apply_to(&mut config);

        assert_eq!(config.min_bpm, 160.0);
        assert_eq!(config.max_bpm, 170.0);
        assert_eq!(config.playlist_name, "Tempo Run");
        assert_eq!(config.cache_path, Some(PathBuf::from("/tmp/bpm-cache")));
        assert!(config.public);
    }

    #[test]
    fn run_option_flags() {
        let cli = Cli::try_parse_from([
            "bpm-playlist",
            "--refresh-library",
            "--refresh-tempo",
            "missing",
            "--dry-run",
            "-v",
        ])
        .unwrap();
        let options = cli.run_options();
        assert!(options.refresh_library);
        assert!(options.dry_run);
        assert_eq!(options.refresh_tempo, RefreshPolicy::Missing);
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn rejects_unknown_refresh_policy() {
        assert!(Cli::try_parse_from(["bpm-playlist", "--refresh-tempo", "sometimes"]).is_err());
    }

    #[test]
    fn refresh_arg_conversion() {
        assert_eq!(RefreshPolicy::from(RefreshArg::All), RefreshPolicy::All);
        assert_eq!(RefreshPolicy::from(RefreshArg::Never), RefreshPolicy::Never);
    }
}
