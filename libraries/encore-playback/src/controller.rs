//! Playback controller - core orchestration
//!
//! Coordinates the audio engine with the active track list: selection,
//! source swaps, play/pause, circular next/previous, and the error policy
//! (delayed auto-advance with a cap on consecutive failures).
//!
//! Everything runs on one thread. Hosts feed the controller three kinds of
//! input: UI calls (`select_track`, `toggle_playback`, `next`, `previous`),
//! hardware signals (`handle_signal`) and timer firings (`handle_timer`).

use crate::{
    engine::{AudioEngine, AudioOutput, EngineEvent, OutputSignal},
    error::{EngineError, PlaybackError, Result},
    notice::{Notice, Notifier, RetryCause},
    progress::map_click_to_seek_time,
    scheduler::{Scheduler, TimerId},
    types::{PlayTicket, PlaybackSnapshot, PlayerConfig, PlayerState, SourceStatus},
};
use encore_core::{TrackDescriptor, TrackId, TrackList};
use tracing::{debug, info, trace, warn};

/// Playback controller
///
/// Owns the only `AudioEngine` (and therefore the only output handle) of a
/// player instance, plus the single authoritative playback state.
pub struct PlaybackController<O: AudioOutput, S: Scheduler, N: Notifier> {
    engine: AudioEngine<O>,
    scheduler: S,
    notifier: N,
    config: PlayerConfig,

    tracks: TrackList,
    current_index: Option<usize>,
    current_track: Option<TrackDescriptor>,

    state: PlayerState,
    is_playing: bool,
    progress_seconds: f64,
    duration_seconds: f64,
    playback_error: bool,
    consecutive_errors: u8,
    last_error: Option<PlaybackError>,

    /// Play request whose resolution is still awaited
    pending_play: Option<PlayTicket>,

    /// Delayed auto-advance; at most one is live
    pending_advance: Option<TimerId>,

    disposed: bool,
}

impl<O: AudioOutput, S: Scheduler, N: Notifier> PlaybackController<O, S, N> {
    /// Create a controller with no track loaded
    pub fn new(output: O, scheduler: S, notifier: N, config: PlayerConfig) -> Self {
        Self {
            engine: AudioEngine::new(output),
            scheduler,
            notifier,
            config,
            tracks: TrackList::empty(),
            current_index: None,
            current_track: None,
            state: PlayerState::Idle,
            is_playing: false,
            progress_seconds: 0.0,
            duration_seconds: 0.0,
            playback_error: false,
            consecutive_errors: 0,
            last_error: None,
            pending_play: None,
            pending_advance: None,
            disposed: false,
        }
    }

    // ===== Track list =====

    /// Replace the active track list
    ///
    /// If the current track survives the reload only its index is refreshed.
    /// Otherwise the first track is loaded without autoplay. An empty list
    /// leaves the loaded track alone but disables next/previous.
    pub fn set_tracks(&mut self, tracks: TrackList) {
        if self.disposed {
            return;
        }
        debug!(tracks = tracks.len(), "Track list updated");
        self.tracks = tracks;

        if let Some(current) = &self.current_track {
            if let Some(index) = self.tracks.position(&current.id) {
                self.current_index = Some(index);
                return;
            }
        }

        self.current_index = None;
        match self.tracks.first().cloned() {
            Some(first) => self.select_track(first, false),
            None => info!("Track list is empty, next/previous disabled"),
        }
    }

    /// Apply the outcome of `TrackSource::fetch_tracks`
    ///
    /// A failed fetch counts as an empty list.
    pub fn apply_fetch_result(&mut self, result: encore_core::Result<TrackList>) {
        match result {
            Ok(tracks) => self.set_tracks(tracks),
            Err(e) => {
                warn!(error = %e, "Failed to load tracks");
                self.set_tracks(TrackList::empty());
            }
        }
    }

    // ===== Playback Control =====

    /// Make `track` the current track
    ///
    /// Valid from any state. Tracks without a playable URL go straight to
    /// the terminal error state without touching the output source.
    pub fn select_track(&mut self, track: TrackDescriptor, autoplay: bool) {
        if self.disposed {
            return;
        }
        self.cancel_pending_advance();

        let intent = autoplay || self.is_playing;
        let same_track = self
            .current_track
            .as_ref()
            .is_some_and(|current| current.id == track.id);
        let url = track.playable_url().map(str::to_owned);

        info!(
            track_id = %track.id,
            title = %track.title,
            autoplay,
            playable = url.is_some(),
            "Selecting track"
        );

        self.current_index = self.tracks.position(&track.id);
        self.playback_error = false;
        self.pending_play = None;

        let Some(url) = url else {
            self.engine.clear_source();
            self.is_playing = false;
            self.playback_error = true;
            self.progress_seconds = 0.0;
            self.duration_seconds = 0.0;
            self.state = PlayerState::ErrorTerminal;
            self.last_error = Some(PlaybackError::NoPlayableSource(track.id.clone()));
            self.notifier.notify(Notice::NoPlayableSource {
                title: track.title.clone(),
            });
            self.current_track = Some(track);
            return;
        };

        let (title, artist) = (track.title.clone(), track.artist_name.clone());
        self.current_track = Some(track);

        self.engine.pause();
        if self.engine.set_source(&url) {
            self.progress_seconds = 0.0;
            self.duration_seconds = 0.0;
        } else if same_track {
            self.progress_seconds = self.engine.position();
            self.duration_seconds = self.engine.duration().unwrap_or(0.0);
        } else {
            self.progress_seconds = self.engine.seek(0.0);
            self.duration_seconds = self.engine.duration().unwrap_or(0.0);
        }

        self.is_playing = intent;
        self.state = if self.engine.duration().is_some() {
            PlayerState::Paused
        } else {
            PlayerState::Loading
        };

        if intent {
            self.notifier.notify(Notice::NowPlaying { title, artist });
            self.request_play();
        }
    }

    /// Select a track of the active list by id
    pub fn select_by_id(&mut self, id: &TrackId, autoplay: bool) -> Result<()> {
        let track = self
            .tracks
            .find(id)
            .cloned()
            .ok_or_else(|| PlaybackError::TrackNotInList(id.clone()))?;
        self.select_track(track, autoplay);
        Ok(())
    }

    /// Play/pause button
    ///
    /// No-op when the current track has no playable URL. After an error the
    /// source is re-assigned first, so the toggle doubles as a retry.
    pub fn toggle_playback(&mut self) {
        if self.disposed {
            return;
        }
        let Some(url) = self
            .current_track
            .as_ref()
            .and_then(|track| track.playable_url())
            .map(str::to_owned)
        else {
            debug!("No audio URL available for this track");
            return;
        };

        self.cancel_pending_advance();

        if self.playback_error {
            debug!(url = %url, "Recovering from playback error");
            self.playback_error = false;
            self.pending_play = None;
            self.engine.reload_source(&url);
            self.progress_seconds = 0.0;
            self.duration_seconds = 0.0;
            self.state = PlayerState::Loading;
        }

        if self.is_playing {
            self.is_playing = false;
            self.pending_play = None;
            self.engine.pause();
            self.state = PlayerState::Paused;
            debug!("Playback paused");
        } else {
            self.is_playing = true;
            self.request_play();
        }
    }

    /// Skip forward, wrapping to the first track
    pub fn next(&mut self) {
        if self.disposed {
            return;
        }
        match self.tracks.next_index(self.current_index) {
            Some(index) => self.select_index(index),
            None => debug!("No tracks to advance to"),
        }
    }

    /// Skip back, wrapping to the last track
    pub fn previous(&mut self) {
        if self.disposed {
            return;
        }
        match self.tracks.previous_index(self.current_index) {
            Some(index) => self.select_index(index),
            None => debug!("No tracks to go back to"),
        }
    }

    /// Progress bar click at `fraction` of its width
    ///
    /// Returns the applied position, or `None` when seeking is not possible
    /// (duration unknown or error active).
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Option<f64> {
        if self.disposed {
            return None;
        }
        let target = map_click_to_seek_time(fraction, self.duration_seconds, self.playback_error)?;
        let applied = self.engine.seek(target);
        self.progress_seconds = applied;
        Some(applied)
    }

    // ===== Host input =====

    /// Feed a hardware signal from the output
    pub fn handle_signal(&mut self, signal: OutputSignal) {
        if self.disposed {
            return;
        }
        let Some(event) = self.engine.handle_signal(signal) else {
            return;
        };

        match event {
            EngineEvent::Progress(seconds) => {
                self.progress_seconds = seconds;
            }
            EngineEvent::LoadedMetadata(duration) => {
                trace!(duration, "Metadata loaded");
                self.duration_seconds = duration;
                self.playback_error = false;
                self.consecutive_errors = 0;
                if self.state == PlayerState::Loading && !self.is_playing {
                    self.state = PlayerState::Paused;
                }
            }
            EngineEvent::Ended => {
                let was_playing = self.is_playing;
                self.is_playing = false;
                self.pending_play = None;
                self.state = PlayerState::Paused;
                if was_playing {
                    debug!("Track finished, advancing");
                    let current = self.current_index;
                    if current.is_some() && self.tracks.next_index(current) == current {
                        // Single-track list keeps the same source; start it over
                        self.progress_seconds = self.engine.seek(0.0);
                    }
                    self.next();
                }
            }
            EngineEvent::Error(error) => self.handle_failure(error),
            EngineEvent::PlayResolved { ticket, result } => {
                if self.pending_play != Some(ticket) {
                    trace!(ticket = ticket.0, "Ignoring stale play result");
                    return;
                }
                self.pending_play = None;
                match result {
                    Ok(()) if self.is_playing => self.state = PlayerState::Playing,
                    Ok(()) => {}
                    Err(error) => self.handle_failure(error),
                }
            }
        }
    }

    /// Feed a timer firing from the scheduler
    pub fn handle_timer(&mut self, id: TimerId) {
        if self.disposed {
            return;
        }
        if self.pending_advance != Some(id) {
            trace!(timer = id.0, "Ignoring stale timer");
            return;
        }
        self.pending_advance = None;
        info!("Auto-advancing after playback error");
        self.next();
    }

    /// Tear down: cancel the pending advance and release the output
    ///
    /// Safe to call more than once; every other call is a no-op afterwards.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_pending_advance();
        self.engine.dispose();
        self.disposed = true;
        debug!("Playback controller disposed");
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Playback intent, not hardware confirmation
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn progress_seconds(&self) -> f64 {
        self.progress_seconds
    }

    /// 0 until the output reports a duration
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn playback_error(&self) -> bool {
        self.playback_error
    }

    pub fn current_track(&self) -> Option<&TrackDescriptor> {
        self.current_track.as_ref()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn tracks(&self) -> &TrackList {
        &self.tracks
    }

    pub fn consecutive_error_count(&self) -> u8 {
        self.consecutive_errors
    }

    pub fn pending_advance(&self) -> Option<TimerId> {
        self.pending_advance
    }

    /// Most recent failure, kept for diagnostics
    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn engine(&self) -> &AudioEngine<O> {
        &self.engine
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Status line under the controls
    pub fn source_status(&self) -> SourceStatus {
        if self.playback_error {
            SourceStatus::PlaybackError
        } else if self.current_track.as_ref().is_some_and(TrackDescriptor::is_playable) {
            SourceStatus::Available
        } else {
            SourceStatus::Unavailable
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_track: self.current_track.clone(),
            is_playing: self.is_playing,
            progress_seconds: self.progress_seconds,
            duration_seconds: self.duration_seconds,
            playback_error: self.playback_error,
            state: self.state,
            status: self.source_status(),
        }
    }

    // ===== Internal =====

    fn select_index(&mut self, index: usize) {
        if let Some(track) = self.tracks.get(index).cloned() {
            self.select_track(track, true);
        }
    }

    fn request_play(&mut self) {
        match self.engine.play() {
            Ok(ticket) => {
                self.pending_play = Some(ticket);
                if !self.state.is_error() {
                    self.state = PlayerState::Loading;
                }
            }
            Err(error) => self.handle_failure(error),
        }
    }

    fn handle_failure(&mut self, error: EngineError) {
        warn!(
            error = %error,
            track_id = ?self.current_track.as_ref().map(|t| t.id.as_str()),
            "Playback failed"
        );

        self.playback_error = true;
        self.is_playing = false;
        self.pending_play = None;
        self.engine.pause();
        self.cancel_pending_advance();

        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        let limit = self.config.max_consecutive_errors.max(1);

        if self.consecutive_errors < limit {
            let delay = self.config.retry_delay();
            let cause = RetryCause::from(&error);
            self.last_error = Some(PlaybackError::LoadOrPlaybackFailure(error));
            self.notifier.notify(Notice::WillRetry { cause, delay });
            let timer = self.scheduler.schedule(delay);
            self.pending_advance = Some(timer);
            self.state = PlayerState::ErrorRetryPending { timer };
        } else {
            warn!(attempts = self.consecutive_errors, "Too many playback errors, stopping");
            self.last_error = Some(PlaybackError::ExhaustedRetries {
                attempts: self.consecutive_errors,
            });
            self.notifier.notify(Notice::RetriesExhausted);
            self.consecutive_errors = 0;
            self.state = PlayerState::ErrorTerminal;
        }
    }

    fn cancel_pending_advance(&mut self) {
        if let Some(timer) = self.pending_advance.take() {
            trace!(timer = timer.0, "Cancelling pending advance");
            self.scheduler.cancel(timer);
        }
    }
}

impl<O: AudioOutput, S: Scheduler, N: Notifier> Drop for PlaybackController<O, S, N> {
    fn drop(&mut self) {
        self.dispose();
    }
}
