use clap::{Parser, Subcommand, ValueEnum};
use soundkit_cli::{read_tracks, App, CliConfig, SettingKey};
use soundkit_core::{PlaylistId, Track, TrackId};
use soundkit_playback::{format_time, RepeatMode};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "soundkit")]
#[command(about = "SoundKit playback engine from the command line", long_about = None)]
struct Cli {
    /// Config file (defaults to ./soundkit.toml when present)
    #[arg(short, long, env = "SOUNDKIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a queue of tracks and report the resolved source
    Play {
        /// JSON file with one track or an array of tracks
        tracks: PathBuf,

        /// Queue index to start at
        #[arg(short, long, default_value_t = 0)]
        index: usize,

        #[arg(long, value_enum, default_value_t = RepeatArg::None)]
        repeat: RepeatArg,

        #[arg(long)]
        shuffle: bool,
    },

    /// Download tracks for offline playback
    Download {
        /// JSON file with one track or an array of tracks
        tracks: PathBuf,
    },

    /// List downloaded tracks
    Downloads,

    /// Delete a downloaded track and its file
    RemoveDownload { id: String },

    /// Delete every download
    ClearDownloads,

    /// Show playback history
    History {
        /// Forget the history instead
        #[arg(long)]
        clear: bool,
    },

    /// Show recently played tracks
    Recent,

    /// Show favorite tracks
    Favorites,

    /// Flip the favorite flag of tracks
    ToggleFavorite {
        /// JSON file with one track or an array of tracks
        tracks: PathBuf,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Manage playlists
    Playlists {
        #[command(subcommand)]
        action: Option<PlaylistAction>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings as JSON
    Show,

    /// Change a single setting
    Set {
        #[arg(value_enum)]
        key: SettingKey,
        value: String,
    },
}

#[derive(Subcommand)]
enum PlaylistAction {
    List,
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    Add {
        playlist: String,
        /// JSON file with one track or an array of tracks
        tracks: PathBuf,
    },
    Remove {
        playlist: String,
        track: String,
    },
    Delete {
        playlist: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RepeatArg {
    None,
    One,
    All,
}

impl From<RepeatArg> for RepeatMode {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::None => RepeatMode::Off,
            RepeatArg::One => RepeatMode::One,
            RepeatArg::All => RepeatMode::All,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundkit=info,soundkit_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    let app = App::open(&config).await?;

    match cli.command {
        Commands::Play {
            tracks,
            index,
            repeat,
            shuffle,
        } => {
            let tracks = read_tracks(&tracks).await?;
            let outcome = app.play(tracks, index, repeat.into(), shuffle).await?;
            let snapshot = &outcome.snapshot;

            if let Some(track) = &snapshot.current_track {
                println!(
                    "{} [{}/{}] {}",
                    describe(track),
                    snapshot.current_index + 1,
                    snapshot.queue.len(),
                    format_time(track.duration_ms)
                );
            }
            if let Some(source) = outcome.source {
                println!("source: {source}");
            }
            println!(
                "rate {:.2}x, volume {:.0}%",
                snapshot.playback_rate,
                snapshot.volume * 100.0
            );
        }

        Commands::Download { tracks } => {
            for track in read_tracks(&tracks).await? {
                let label = describe(&track);
                let progress_label = label.clone();
                let record = app
                    .download(
                        &track,
                        Some(Box::new(move |fraction: f32| {
                            eprint!("\r{progress_label}: {:>3.0}%", fraction * 100.0);
                        })),
                    )
                    .await?;
                eprintln!();
                println!("{label} -> {}", record.local_uri);
            }
        }

        Commands::Downloads => {
            let records = app.downloads().await?;
            if records.is_empty() {
                println!("No downloads");
            }
            for record in records {
                println!(
                    "{}  {}  {}  {}",
                    record.id(),
                    describe(&record.track),
                    record.downloaded_at.format("%Y-%m-%d %H:%M"),
                    record.local_uri
                );
            }
        }

        Commands::RemoveDownload { id } => {
            if app.remove_download(&TrackId::new(id.as_str())).await? {
                println!("Removed {id}");
            } else {
                println!("{id} is not downloaded");
            }
        }

        Commands::ClearDownloads => {
            let removed = app.clear_downloads().await?;
            println!("Removed {removed} download(s)");
        }

        Commands::History { clear } => {
            if clear {
                app.clear_history().await?;
                println!("History cleared");
            } else {
                print_tracks(&app.history().await?);
            }
        }

        Commands::Recent => print_tracks(&app.recently_played().await?),

        Commands::Favorites => print_tracks(&app.favorites().await?),

        Commands::ToggleFavorite { tracks } => {
            for track in read_tracks(&tracks).await? {
                let favorite = app.toggle_favorite(&track).await?;
                println!(
                    "{} {}",
                    describe(&track),
                    if favorite { "added to favorites" } else { "removed from favorites" }
                );
            }
        }

        Commands::Settings { action } => match action.unwrap_or(SettingsAction::Show) {
            SettingsAction::Show => {
                println!("{}", serde_json::to_string_pretty(&app.settings().await?)?);
            }
            SettingsAction::Set { key, value } => {
                let settings = app.update_setting(key, &value).await?;
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
        },

        Commands::Playlists { action } => match action.unwrap_or(PlaylistAction::List) {
            PlaylistAction::List => {
                let playlists = app.playlists().await?;
                if playlists.is_empty() {
                    println!("No playlists");
                }
                for playlist in playlists {
                    println!(
                        "{}  {} ({} tracks)",
                        playlist.id,
                        playlist.name,
                        playlist.tracks.len()
                    );
                }
            }
            PlaylistAction::Create { name, description } => {
                let playlist = app.create_playlist(&name, &description).await?;
                println!("Created {} ({})", playlist.name, playlist.id);
            }
            PlaylistAction::Add { playlist, tracks } => {
                let tracks = read_tracks(&tracks).await?;
                let added = app
                    .add_to_playlist(&PlaylistId::new(playlist.as_str()), &tracks)
                    .await?;
                println!("Added {added} of {} track(s)", tracks.len());
            }
            PlaylistAction::Remove { playlist, track } => {
                app.remove_from_playlist(
                    &PlaylistId::new(playlist.as_str()),
                    &TrackId::new(track.as_str()),
                )
                .await?;
                println!("Removed {track}");
            }
            PlaylistAction::Delete { playlist } => {
                app.delete_playlist(&PlaylistId::new(playlist.as_str()))
                    .await?;
                println!("Deleted {playlist}");
            }
        },
    }

    Ok(())
}

fn describe(track: &Track) -> String {
    match track.artists.first() {
        Some(artist) => format!("{artist} - {}", track.name),
        None => track.name.clone(),
    }
}

fn print_tracks(tracks: &[Track]) {
    if tracks.is_empty() {
        println!("Nothing here yet");
    }
    for (i, track) in tracks.iter().enumerate() {
        println!(
            "{:>3}. {}  {}",
            i + 1,
            describe(track),
            format_time(track.duration_ms)
        );
    }
}
