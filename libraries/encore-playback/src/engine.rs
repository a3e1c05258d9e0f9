//! Audio engine
//!
//! Thin wrapper around exactly one native audio output handle. The engine
//! tracks which source is current, drops hardware signals that belong to an
//! older source, and never retries on its own: failures are reported upward
//! and the controller decides what happens next.

use crate::error::EngineError;
use crate::types::{PlayTicket, SourceGeneration};
use tracing::{debug, trace};

/// Native audio output handle
///
/// Implemented by the browser `<audio>` element binding, the CLI simulator,
/// and test doubles. Outcomes are not returned from these calls; they come
/// back later as `OutputSignal`s tagged with the generation passed to `load`.
#[cfg_attr(test, mockall::automock)]
pub trait AudioOutput {
    /// Assign a new source. Position restarts at 0.
    fn load(&mut self, url: &str, generation: SourceGeneration);

    /// Begin playback; answer with `SignalKind::PlayResolved { ticket, .. }`
    fn start(&mut self, generation: SourceGeneration, ticket: PlayTicket);

    /// Stop producing sound, keep the source
    fn halt(&mut self);

    /// Move the playhead
    fn set_position(&mut self, seconds: f64);

    /// Release the handle; nothing is called after this
    fn release(&mut self);
}

impl<O: AudioOutput + ?Sized> AudioOutput for Box<O> {
    fn load(&mut self, url: &str, generation: SourceGeneration) {
        (**self).load(url, generation);
    }

    fn start(&mut self, generation: SourceGeneration, ticket: PlayTicket) {
        (**self).start(generation, ticket);
    }

    fn halt(&mut self) {
        (**self).halt();
    }

    fn set_position(&mut self, seconds: f64) {
        (**self).set_position(seconds);
    }

    fn release(&mut self) {
        (**self).release();
    }
}

/// Raw hardware callback
#[derive(Debug, Clone, PartialEq)]
pub enum SignalKind {
    /// Periodic playhead update
    TimeUpdate(f64),

    /// Duration became known
    LoadedMetadata(f64),

    /// Reached the end of the source
    Ended,

    /// Source failed to load or decode
    Failed(String),

    /// Outcome of a `start` request
    PlayResolved {
        ticket: PlayTicket,
        result: Result<(), String>,
    },
}

/// Hardware callback tagged with the source it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSignal {
    pub generation: SourceGeneration,
    pub kind: SignalKind,
}

impl OutputSignal {
    pub fn new(generation: SourceGeneration, kind: SignalKind) -> Self {
        Self { generation, kind }
    }
}

/// Event delivered to the controller for the current source
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress(f64),
    /// Duration in seconds, 0 when the output cannot tell (live streams)
    LoadedMetadata(f64),
    Ended,
    Error(EngineError),
    PlayResolved {
        ticket: PlayTicket,
        result: Result<(), EngineError>,
    },
}

/// Owner of the single audio output handle
pub struct AudioEngine<O: AudioOutput> {
    output: O,
    url: Option<String>,
    generation: SourceGeneration,
    last_ticket: PlayTicket,
    position: f64,
    duration: Option<f64>,
    playing: bool,
    faulted: bool,
    disposed: bool,
}

impl<O: AudioOutput> AudioEngine<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            url: None,
            generation: SourceGeneration::default(),
            last_ticket: PlayTicket::default(),
            position: 0.0,
            duration: None,
            playing: false,
            faulted: false,
            disposed: false,
        }
    }

    /// Assign a source
    ///
    /// Re-assigning the current URL is a no-op (position kept) unless the
    /// source has failed since it was loaded. Returns whether the output
    /// was reloaded.
    pub fn set_source(&mut self, url: &str) -> bool {
        self.assign(url, false)
    }

    /// Assign a source, reloading even when the URL is unchanged
    ///
    /// Used to recover after an error on the current track.
    pub fn reload_source(&mut self, url: &str) -> bool {
        self.assign(url, true)
    }

    fn assign(&mut self, url: &str, force: bool) -> bool {
        if self.disposed {
            return false;
        }
        if !force && self.url.as_deref() == Some(url) && !self.faulted {
            trace!(url, "Source unchanged");
            return false;
        }

        self.stop_output();
        self.generation = self.generation.next();
        self.url = Some(url.to_string());
        self.position = 0.0;
        self.duration = None;
        self.faulted = false;

        debug!(url, generation = self.generation.0, "Loading source");
        self.output.load(url, self.generation);
        true
    }

    /// Drop the current source without loading another
    ///
    /// Signals still in flight for the old source are ignored afterwards.
    pub fn clear_source(&mut self) {
        if self.disposed {
            return;
        }
        self.stop_output();
        self.generation = self.generation.next();
        self.url = None;
        self.position = 0.0;
        self.duration = None;
        self.faulted = false;
    }

    /// Ask the output to play
    ///
    /// Fails immediately only when nothing can be played; hardware rejection
    /// arrives later as `EngineEvent::PlayResolved` with the returned ticket.
    pub fn play(&mut self) -> Result<PlayTicket, EngineError> {
        if self.disposed {
            return Err(EngineError::Disposed);
        }
        if self.url.is_none() {
            return Err(EngineError::NoSource);
        }

        self.last_ticket = PlayTicket(self.last_ticket.0 + 1);
        self.playing = true;
        self.output.start(self.generation, self.last_ticket);
        Ok(self.last_ticket)
    }

    /// Pause; no-op when not playing
    pub fn pause(&mut self) {
        if self.disposed || !self.playing {
            return;
        }
        self.playing = false;
        self.output.halt();
    }

    /// Move the playhead, clamped to `[0, duration]` when the duration is known
    ///
    /// Returns the position actually applied.
    pub fn seek(&mut self, seconds: f64) -> f64 {
        if self.disposed || seconds.is_nan() {
            return self.position;
        }
        let target = match self.duration {
            Some(duration) => seconds.clamp(0.0, duration),
            None => seconds.max(0.0),
        };
        self.position = target;
        self.output.set_position(target);
        target
    }

    /// Release the output handle; safe to call more than once
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        debug!(generation = self.generation.0, "Disposing audio engine");
        self.disposed = true;
        self.playing = false;
        self.url = None;
        self.output.release();
    }

    /// Translate a hardware signal into an event for the controller
    ///
    /// Returns `None` for signals from a replaced source, signals after the
    /// current source has failed, and anything after disposal.
    pub fn handle_signal(&mut self, signal: OutputSignal) -> Option<EngineEvent> {
        if self.disposed {
            return None;
        }
        if signal.generation != self.generation {
            trace!(
                signal_generation = signal.generation.0,
                current_generation = self.generation.0,
                "Dropping signal from replaced source"
            );
            return None;
        }
        if self.faulted {
            trace!(generation = self.generation.0, "Dropping signal from failed source");
            return None;
        }

        match signal.kind {
            SignalKind::TimeUpdate(seconds) => {
                if !seconds.is_finite() {
                    return None;
                }
                self.position = seconds.max(0.0);
                Some(EngineEvent::Progress(self.position))
            }
            SignalKind::LoadedMetadata(duration) => {
                self.duration = (duration.is_finite() && duration > 0.0).then_some(duration);
                Some(EngineEvent::LoadedMetadata(self.duration.unwrap_or(0.0)))
            }
            SignalKind::Ended => {
                self.playing = false;
                Some(EngineEvent::Ended)
            }
            SignalKind::Failed(reason) => {
                self.faulted = true;
                self.playing = false;
                Some(EngineEvent::Error(EngineError::Load(reason)))
            }
            SignalKind::PlayResolved { ticket, result } => {
                let result = match result {
                    Ok(()) => Ok(()),
                    Err(reason) => {
                        if ticket == self.last_ticket && self.playing {
                            self.faulted = true;
                            self.playing = false;
                        }
                        Err(EngineError::Playback(reason))
                    }
                };
                Some(EngineEvent::PlayResolved { ticket, result })
            }
        }
    }

    pub fn current_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn generation(&self) -> SourceGeneration {
        self.generation
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Duration in seconds once the output has reported it
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    fn stop_output(&mut self) {
        if self.playing {
            self.playing = false;
            self.output.halt();
        }
    }
}
