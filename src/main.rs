//! bpm-playlist: builds a Spotify playlist of liked songs within a BPM range.
//!
//! Reads credentials from the environment, authorizes against Spotify
//! (reusing the cached token when possible), then runs the pipeline once.

use std::io::{self, BufRead, Write};

use tracing::info;

use bpm_playlist::cli::Cli;
use bpm_playlist::config::AppConfig;
use bpm_playlist::error::{AppError, Result};
use bpm_playlist::pipeline::{Pipeline, RunOutcome};
use bpm_playlist::spotify::{SpotifyAuth, SpotifyClient};
use bpm_playlist::tempo::GetSongBpmClient;

fn main() {
    let cli = Cli::parse_args();

    // keep reqwest and hyper quiet unless asked for through RUST_LOG
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "{},reqwest=warn,hyper=warn,hyper_util=warn",
            cli.log_level()
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = AppConfig::from_env();
    cli.apply_to(&mut config);

    if let Some(reason) = config.validate() {
        return Err(AppError::invalid_config(reason));
    }

    // fail on missing credentials before any network call
    let credentials = config.spotify_credentials()?;
    let pipeline = Pipeline::from_config(&config)?;

    let cache_dir = config.effective_cache_path();
    info!("Cache directory: {}", cache_dir.display());

    let auth = SpotifyAuth::new(credentials, &cache_dir, config.api_timeout)?;
    let access_token = auth.access_token(prompt_for_redirect)?;

    let spotify = SpotifyClient::new(access_token, config.api_timeout)?;
    let user = spotify.current_user()?;
    info!("Logged in as {}", user.label());

    let getsongbpm =
        GetSongBpmClient::new(config.getsongbpm_api_key.clone(), config.lookup_timeout)?;

    let outcome = pipeline.run(&spotify, getsongbpm, &spotify, &user.id, &cli.run_options())?;
    print_outcome(&outcome, &config.playlist_name);
    Ok(())
}

/// Shows the authorization URL and reads the pasted redirect URL from stdin.
fn prompt_for_redirect(url: &str) -> io::Result<String> {
    eprintln!("Open this URL in your browser and approve access:");
    eprintln!();
    eprintln!("  {}", url);
    eprintln!();
    eprint!("Paste the URL you were redirected to: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    if line.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no redirect URL entered",
        ));
    }
    Ok(line)
}

fn print_outcome(outcome: &RunOutcome, playlist_name: &str) {
    match outcome {
        RunOutcome::NoLikedTracks => println!("No liked tracks found."),
        RunOutcome::NoneInRange => println!("No songs found within the specified BPM range."),
        RunOutcome::DryRun {
            matched,
            partial_library,
        } => {
            println!("{} tracks match (dry run, no playlist created):", matched.len());
            for id in matched {
                println!("  {}", id);
            }
            print_partial_notice(*partial_library);
        }
        RunOutcome::Published {
            playlist,
            partial_library,
        } => {
            println!(
                "Created playlist '{}' ({}) with {} tracks.",
                playlist_name, playlist.playlist_id, playlist.track_count
            );
            print_partial_notice(*partial_library);
        }
    }
}

fn print_partial_notice(partial_library: bool) {
    if partial_library {
        println!(
            "Note: only part of the library could be fetched; \
             run with --refresh-library to retry."
        );
    }
}
