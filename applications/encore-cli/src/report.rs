//! Plain-text rendering for the CLI commands

use crate::sim::SimulationReport;
use encore_core::TrackList;
use encore_playback::format_time;

/// One line per track: position, id, title, artist, the URL that would play
/// and any external platforms
pub fn track_lines(tracks: &TrackList) -> Vec<String> {
    tracks
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let audio = track.playable_url().unwrap_or("no audio");
            let mut line = format!(
                "{:>3}  {:<16} {} - {}  [{}]",
                index + 1,
                track.id.as_str(),
                track.title,
                track.artist_name,
                audio
            );
            if !track.external_links.is_empty() {
                let platforms: Vec<&str> =
                    track.external_links.iter().map(|l| l.platform.as_str()).collect();
                line.push_str(&format!("  also on {}", platforms.join(", ")));
            }
            line
        })
        .collect()
}

/// Notices stamped with virtual time, followed by the final player state
pub fn transcript_lines(report: &SimulationReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .notices
        .iter()
        .map(|(at, notice)| format!("[{}] {}", format_time(at.as_secs_f64()), notice))
        .collect();

    let snapshot = &report.snapshot;
    let track = snapshot
        .current_track
        .as_ref()
        .map_or_else(|| "-".to_string(), |t| format!("{} ({})", t.title, t.id));

    lines.push(format!(
        "after {} events / {}: {:?}, track {}, {} / {}, {}",
        report.events,
        format_time(report.elapsed.as_secs_f64()),
        snapshot.state,
        track,
        format_time(snapshot.progress_seconds),
        format_time(snapshot.duration_seconds),
        snapshot.status.label()
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_core::TrackDescriptor;

    #[test]
    fn track_lines_show_missing_audio() {
        let tracks = TrackList::new(vec![
            TrackDescriptor::new("a", "Opening", "Nova").with_primary_audio_url("https://cdn/a.mp3"),
            TrackDescriptor::new("b", "Interlude", "Nova").with_primary_audio_url("   "),
        ])
        .unwrap();

        let lines = track_lines(&tracks);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Opening - Nova"));
        assert!(lines[0].ends_with("[https://cdn/a.mp3]"));
        assert!(lines[1].ends_with("[no audio]"));
    }

    #[test]
    fn track_lines_list_platforms() {
        let tracks = TrackList::new(vec![TrackDescriptor::new("a", "Opening", "Nova")
            .with_primary_audio_url("https://cdn/a.mp3")
            .with_external_link("spotify", "https://open.spotify.com/track/a")
            .with_external_link("bandcamp", "https://nova.bandcamp.com/track/a")])
        .unwrap();

        let lines = track_lines(&tracks);

        assert!(lines[0].ends_with("[https://cdn/a.mp3]  also on spotify, bandcamp"));
    }
}
