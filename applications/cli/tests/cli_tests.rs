use soundkit_cli::{App, CliConfig, CliError, SettingKey};
use soundkit_core::{PlaylistId, QualityTier, Track, TrackId};
use soundkit_playback::{RepeatMode, SessionState};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn env(vars: &[(&str, &str)]) -> config::Environment {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    config::Environment::with_prefix("SOUNDKIT")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .source(Some(vars))
}

fn test_config(dir: &TempDir) -> CliConfig {
    let mut config = CliConfig {
        database_url: format!("sqlite://{}", dir.path().join("db").join("soundkit.db").display()),
        ..CliConfig::default()
    };
    config.engine.download_dir = dir.path().join("downloads");
    config
}

fn track(id: &str, base: &str) -> Track {
    Track::new(id, format!("Song {id}"))
        .with_artist("Artist")
        .with_duration_ms(180_000)
        .with_url("96kbps", format!("{base}/{id}/96"))
        .with_url("160kbps", format!("{base}/{id}/160"))
        .with_url("320kbps", format!("{base}/{id}/320"))
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = CliConfig::load_with_env(None, env(&[])).unwrap();

    assert_eq!(config.database_url, "sqlite://./data/soundkit.db");
    assert_eq!(config.engine.volume, 1.0);
    assert_eq!(config.engine.repeat, RepeatMode::Off);
    assert_eq!(config.transfer.timeout_secs, 300);
}

#[test]
fn test_config_file_and_env_override() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("soundkit.toml");
    std::fs::write(
        &file,
        r#"
database_url = "sqlite://from-file.db"

[engine]
download_dir = "/music/offline"
volume = 0.8
repeat = "all"

[transfer]
connect_timeout_secs = 3
"#,
    )
    .unwrap();

    let config = CliConfig::load_with_env(
        Some(&file),
        env(&[
            ("SOUNDKIT_DATABASE_URL", "sqlite://from-env.db"),
            ("SOUNDKIT_ENGINE__SHUFFLE", "true"),
        ]),
    )
    .unwrap();

    assert_eq!(config.database_url, "sqlite://from-env.db");
    assert_eq!(config.engine.download_dir, Path::new("/music/offline"));
    assert_eq!(config.engine.volume, 0.8);
    assert_eq!(config.engine.repeat, RepeatMode::All);
    assert!(config.engine.shuffle);
    assert_eq!(config.transfer.connect_timeout_secs, 3);
    assert_eq!(config.transfer.timeout_secs, 300);
}

#[test]
fn test_missing_config_file() {
    let result = CliConfig::load_with_env(Some(Path::new("/nonexistent/soundkit.toml")), env(&[]));
    assert!(matches!(result, Err(CliError::Config(_))));
}

#[test]
fn test_config_rejects_invalid_volume() {
    let result = CliConfig::load_with_env(None, env(&[("SOUNDKIT_ENGINE__VOLUME", "3.0")]));
    assert!(matches!(result, Err(CliError::Config(_))));
}

// =============================================================================
// Playback
// =============================================================================

#[tokio::test]
async fn test_play_resolves_source_and_records_history() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::open(&test_config(&dir)).await.unwrap();
    let base = "https://cdn.test";

    let outcome = app
        .play(vec![track("a", base), track("b", base)], 1, RepeatMode::All, false)
        .await
        .unwrap();

    assert_eq!(outcome.source.as_deref(), Some("https://cdn.test/b/160"));
    assert_eq!(outcome.snapshot.session, SessionState::Ready);
    assert_eq!(outcome.snapshot.current_index, 1);
    assert_eq!(outcome.snapshot.repeat_mode, RepeatMode::All);
    assert!(outcome.snapshot.is_playing);

    let history = app.history().await.unwrap();
    assert_eq!(history[0].id.as_str(), "b");
    assert_eq!(app.recently_played().await.unwrap()[0].id.as_str(), "b");
}

#[tokio::test]
async fn test_play_follows_audio_quality_setting() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::open(&test_config(&dir)).await.unwrap();
    app.update_setting(SettingKey::AudioQuality, "high")
        .await
        .unwrap();

    let outcome = app
        .play(vec![track("a", "https://cdn.test")], 0, RepeatMode::Off, false)
        .await
        .unwrap();

    assert_eq!(outcome.source.as_deref(), Some("https://cdn.test/a/320"));
}

#[tokio::test]
async fn test_play_out_of_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::open(&test_config(&dir)).await.unwrap();

    let result = app
        .play(vec![track("a", "https://cdn.test")], 3, RepeatMode::Off, false)
        .await;

    assert!(matches!(result, Err(CliError::Playback(_))));
}

// =============================================================================
// Downloads
// =============================================================================

#[tokio::test]
async fn test_download_then_play_offline() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/96"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 4096]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = App::open(&test_config(&dir)).await.unwrap();
    app.update_setting(SettingKey::DownloadQuality, "low")
        .await
        .unwrap();

    let a = track("a", &mock_server.uri());
    let progress = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&progress);

    let record = app
        .download(
            &a,
            Some(Box::new(move |fraction: f32| sink.lock().unwrap().push(fraction))),
        )
        .await
        .unwrap();

    assert_eq!(
        Path::new(&record.local_uri),
        dir.path().join("downloads").join("a.mp3")
    );
    assert_eq!(std::fs::read(&record.local_uri).unwrap().len(), 4096);
    assert_eq!(progress.lock().unwrap().last().copied(), Some(1.0));
    assert_eq!(app.downloads().await.unwrap().len(), 1);

    let outcome = app.play(vec![a], 0, RepeatMode::Off, false).await.unwrap();
    assert_eq!(outcome.source.as_deref(), Some(record.local_uri.as_str()));
}

#[tokio::test]
async fn test_failed_download_leaves_no_record() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = App::open(&test_config(&dir)).await.unwrap();

    let result = app.download(&track("a", &mock_server.uri()), None).await;

    assert!(matches!(result, Err(CliError::Playback(_))));
    assert!(app.downloads().await.unwrap().is_empty());
    assert!(!dir.path().join("downloads").join("a.mp3").exists());
}

#[tokio::test]
async fn test_remove_and_clear_downloads() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("audio"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = App::open(&test_config(&dir)).await.unwrap();
    for id in ["a", "b", "c"] {
        app.download(&track(id, &mock_server.uri()), None)
            .await
            .unwrap();
    }

    assert!(app.remove_download(&TrackId::new("a")).await.unwrap());
    assert!(!app.remove_download(&TrackId::new("a")).await.unwrap());
    assert!(!dir.path().join("downloads").join("a.mp3").exists());

    assert_eq!(app.clear_downloads().await.unwrap(), 2);
    assert!(app.downloads().await.unwrap().is_empty());
}

// =============================================================================
// Settings, favorites and playlists
// =============================================================================

#[tokio::test]
async fn test_settings_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    {
        let app = App::open(&config).await.unwrap();
        app.update_setting(SettingKey::DownloadQuality, "high")
            .await
            .unwrap();
        app.update_setting(SettingKey::Rewind, "20").await.unwrap();
        app.store().pool().close().await;
    }

    let app = App::open(&config).await.unwrap();
    let settings = app.settings().await.unwrap();
    assert_eq!(settings.download_quality, QualityTier::High);
    assert_eq!(settings.rewind_seconds, 20);
}

#[tokio::test]
async fn test_invalid_setting_is_not_saved() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::open(&test_config(&dir)).await.unwrap();

    let result = app.update_setting(SettingKey::Speed, "fast").await;

    assert!(matches!(result, Err(CliError::InvalidInput(_))));
    assert_eq!(app.settings().await.unwrap().default_playback_rate, 1.0);
}

#[tokio::test]
async fn test_toggle_favorite() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::open(&test_config(&dir)).await.unwrap();
    let a = track("a", "https://cdn.test");

    assert!(app.toggle_favorite(&a).await.unwrap());
    assert_eq!(app.favorites().await.unwrap().len(), 1);
    assert!(!app.toggle_favorite(&a).await.unwrap());
    assert!(app.favorites().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_playlist_commands() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::open(&test_config(&dir)).await.unwrap();
    let base = "https://cdn.test";

    let playlist = app.create_playlist("Focus", "").await.unwrap();
    let added = app
        .add_to_playlist(&playlist.id, &[track("a", base), track("b", base), track("a", base)])
        .await
        .unwrap();
    assert_eq!(added, 2);

    app.remove_from_playlist(&playlist.id, &TrackId::new("a"))
        .await
        .unwrap();
    let stored = app.playlists().await.unwrap();
    assert_eq!(stored[0].tracks.len(), 1);
    assert_eq!(stored[0].tracks[0].id.as_str(), "b");

    app.delete_playlist(&playlist.id).await.unwrap();
    assert!(app.playlists().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_playlist_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::open(&test_config(&dir)).await.unwrap();
    let missing = PlaylistId::new("missing");

    assert!(matches!(
        app.add_to_playlist(&missing, &[track("a", "https://cdn.test")]).await,
        Err(CliError::PlaylistNotFound(_))
    ));
    assert!(matches!(
        app.delete_playlist(&missing).await,
        Err(CliError::PlaylistNotFound(_))
    ));
    assert!(matches!(
        app.create_playlist(" ", "").await,
        Err(CliError::InvalidInput(_))
    ));
}
