//! End-to-end runs of the simulated player

use encore_cli::{read_playlist, report, CliError, Simulation, SimulationSettings};
use encore_core::{CatalogError, PlaylistFile, TrackDescriptor, TrackId, TrackList, TrackSource};
use encore_playback::{Notice, PlayerConfig, PlayerState, SourceStatus};
use std::io::Write;
use std::time::Duration;

fn url(id: &str) -> String {
    format!("https://cdn.example.com/{}.mp3", id)
}

fn tracks(ids: &[&str]) -> TrackList {
    TrackList::new(
        ids.iter()
            .map(|id| {
                TrackDescriptor::new(*id, format!("Song {}", id), "Nova").with_primary_audio_url(url(id))
            })
            .collect(),
    )
    .unwrap()
}

fn settings(track_seconds: f64) -> SimulationSettings {
    SimulationSettings {
        track_seconds,
        tick_ms: 1000,
        max_events: 10_000,
        autoplay: true,
    }
}

fn now_playing_titles(notices: &[(Duration, Notice)]) -> Vec<String> {
    notices
        .iter()
        .filter_map(|(_, notice)| match notice {
            Notice::NowPlaying { title, .. } => Some(title.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn healthy_playlist_plays_through_and_wraps() {
    let mut sim = Simulation::new(settings(3.0), PlayerConfig::default(), Vec::new());
    sim.load(Ok(tracks(&["a", "b", "c"])));

    // Three full tracks, then into the first again
    while sim.now() < Duration::from_secs(10) {
        assert!(sim.step());
    }

    let controller = sim.controller();
    assert_eq!(controller.current_track().unwrap().id.as_str(), "a");
    assert_eq!(controller.state(), PlayerState::Playing);
    assert!(controller.is_playing());
    assert!(!controller.playback_error());
}

#[test]
fn single_track_loops_from_the_start() {
    let mut sim = Simulation::new(settings(3.0), PlayerConfig::default(), Vec::new());
    sim.load(Ok(tracks(&["a"])));

    while sim.now() < Duration::from_secs(10) {
        assert!(sim.step());
    }

    let report = sim.run(0);
    let replays: Vec<Duration> = report
        .notices
        .iter()
        .filter(|(_, n)| matches!(n, Notice::NowPlaying { .. }))
        .map(|(at, _)| *at)
        .collect();
    assert_eq!(
        replays,
        vec![Duration::from_secs(3), Duration::from_secs(6), Duration::from_secs(9)]
    );
    assert_eq!(report.snapshot.state, PlayerState::Playing);
    assert_eq!(report.snapshot.progress_seconds, 1.0);
}

#[test]
fn failing_playlist_stops_after_three_errors() {
    let failing = vec![url("a"), url("b"), url("c"), url("d")];
    let mut sim = Simulation::new(settings(30.0), PlayerConfig::default(), failing);
    sim.load(Ok(tracks(&["a", "b", "c", "d"])));

    let report = sim.run(1_000);

    assert!(report.settled);
    assert_eq!(report.snapshot.state, PlayerState::ErrorTerminal);
    assert!(report.snapshot.playback_error);
    assert_eq!(report.snapshot.status, SourceStatus::PlaybackError);
    assert_eq!(report.snapshot.current_track.unwrap().id.as_str(), "c");
    assert_eq!(now_playing_titles(&report.notices), vec!["Song b", "Song c"]);
    assert_eq!(report.notices.last().map(|(_, n)| n), Some(&Notice::RetriesExhausted));

    // Advances happen two seconds after each failure
    let retries: Vec<Duration> = report
        .notices
        .iter()
        .filter(|(_, n)| matches!(n, Notice::WillRetry { .. }))
        .map(|(at, _)| *at)
        .collect();
    let advances: Vec<Duration> = report
        .notices
        .iter()
        .filter(|(_, n)| matches!(n, Notice::NowPlaying { .. }))
        .map(|(at, _)| *at)
        .collect();
    assert_eq!(retries.len(), 2);
    for (failed, advanced) in retries.iter().zip(&advances) {
        assert_eq!(*advanced - *failed, Duration::from_secs(2));
    }
}

#[test]
fn one_bad_track_is_skipped() {
    let mut sim = Simulation::new(settings(5.0), PlayerConfig::default(), vec![url("b")]);
    sim.load(Ok(tracks(&["a", "b", "c"])));

    while sim.now() < Duration::from_secs(9) {
        assert!(sim.step());
    }

    let controller = sim.controller();
    assert_eq!(controller.current_track().unwrap().id.as_str(), "c");
    assert!(controller.is_playing());
    assert!(!controller.playback_error());
    assert_eq!(controller.consecutive_error_count(), 0);
}

#[test]
fn failed_fetch_leaves_player_empty() {
    let mut sim = Simulation::new(settings(5.0), PlayerConfig::default(), Vec::new());
    sim.load(Err(CatalogError::network("503 Service Unavailable")));

    let report = sim.run(100);

    assert!(report.settled);
    assert_eq!(report.events, 0);
    assert_eq!(report.snapshot.state, PlayerState::Idle);
    assert!(report.snapshot.current_track.is_none());
}

#[test]
fn shutdown_releases_output() {
    let mut sim = Simulation::new(settings(5.0), PlayerConfig::default(), Vec::new());
    sim.load(Ok(tracks(&["a"])));
    sim.run(3);

    assert!(sim.shutdown());
    assert!(sim.controller().is_disposed());
}

#[test]
fn transcript_ends_with_summary() {
    let mut sim = Simulation::new(settings(30.0), PlayerConfig::default(), vec![url("a")]);
    sim.load(Ok(tracks(&["a", "b"])));

    let report = sim.run(5);
    let lines = report::transcript_lines(&report);

    assert!(lines[0].starts_with("[0:00] Playback Error: There was an error playing this track."));
    assert!(lines.last().unwrap().starts_with("after 5 events"));
}

#[tokio::test]
async fn simulates_playlist_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{ "id": "one", "title": "One", "artistName": "Nova", "primaryAudioUrl": "{}" }},
            {{ "id": "two", "title": "Two", "artistName": "Nova" }}
        ]"#,
        url("one")
    )
    .unwrap();

    let result = PlaylistFile::new(file.path()).fetch_tracks().await;
    let mut sim = Simulation::new(settings(2.0), PlayerConfig::default(), Vec::new());
    sim.load(result);

    let report = sim.run(10_000);

    // "two" has no audio, so playback stops there
    assert!(report.settled);
    assert_eq!(report.snapshot.state, PlayerState::ErrorTerminal);
    assert!(report
        .notices
        .iter()
        .any(|(_, n)| matches!(n, Notice::NoPlayableSource { title } if title == "Two")));
}

#[test]
fn starts_from_selected_track() {
    let mut sim = Simulation::new(settings(5.0), PlayerConfig::default(), Vec::new());
    sim.load(Ok(tracks(&["a", "b", "c"])));

    sim.select(&TrackId::from("c")).unwrap();
    let report = sim.run(3);

    assert_eq!(report.snapshot.current_track.unwrap().id.as_str(), "c");
    assert_eq!(now_playing_titles(&report.notices), vec!["Song c"]);
}

#[test]
fn unknown_start_track_is_a_playback_error() {
    let mut sim = Simulation::new(settings(5.0), PlayerConfig::default(), Vec::new());
    sim.load(Ok(tracks(&["a"])));

    let result = sim.select(&TrackId::from("zzz"));

    assert!(matches!(result, Err(CliError::Playback(_))));
    assert_eq!(sim.controller().current_track().unwrap().id.as_str(), "a");
}

#[tokio::test]
async fn missing_playlist_is_a_catalog_error() {
    let dir = tempfile::tempdir().unwrap();

    let result = read_playlist(&dir.path().join("nope.json")).await;

    assert!(matches!(result, Err(CliError::Catalog(_))));
}
