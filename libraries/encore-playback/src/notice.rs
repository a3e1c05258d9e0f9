//! User-facing notices
//!
//! Fire-and-forget status messages (toasts in the browser, log lines in the
//! CLI). Pushing a notice never changes controller state.

use crate::error::EngineError;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Status message for the notification channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Notice {
    /// A track was selected to play
    NowPlaying { title: String, artist: String },

    /// A failure will be followed by an automatic skip
    WillRetry {
        cause: RetryCause,
        #[serde(rename = "delayMs", serialize_with = "as_millis")]
        delay: Duration,
    },

    /// Too many failures in a row, automatic skipping stopped
    RetriesExhausted,

    /// Selected track has nothing to play
    NoPlayableSource { title: String },
}

/// What went wrong before an automatic skip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RetryCause {
    /// The source failed to load or decode
    Load,

    /// The output refused to start
    PlayRejected,
}

impl From<&EngineError> for RetryCause {
    fn from(error: &EngineError) -> Self {
        match error {
            EngineError::Load(_) => Self::Load,
            EngineError::Playback(_) | EngineError::NoSource | EngineError::Disposed => {
                Self::PlayRejected
            }
        }
    }
}

fn as_millis<S: serde::Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(delay.as_millis() as u64)
}

impl Notice {
    /// Toast heading
    pub fn title(&self) -> &'static str {
        match self {
            Self::NowPlaying { .. } => "Now Playing",
            Self::WillRetry { .. } | Self::RetriesExhausted => "Playback Error",
            Self::NoPlayableSource { .. } => "Audio Unavailable",
        }
    }

    /// Toast body
    pub fn description(&self) -> String {
        match self {
            Self::NowPlaying { title, artist } => format!("{} by {}", title, artist),
            Self::WillRetry { cause, delay } => {
                let lead = match cause {
                    RetryCause::Load => "There was an error playing this track.",
                    RetryCause::PlayRejected => "Unable to play this track.",
                };
                format!("{} Trying next song in {} seconds...", lead, delay.as_secs())
            }
            Self::RetriesExhausted => {
                "Multiple playback errors occurred. Please try again later.".to_string()
            }
            Self::NoPlayableSource { title } => format!("No audio available for {}", title),
        }
    }

    /// Whether the toast should use the destructive style
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::NowPlaying { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.description())
    }
}

/// Sink for notices
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&mut self, notice: Notice) {
        (**self).notify(notice);
    }
}

/// Writes notices to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notice: Notice) {
        if notice.is_error() {
            tracing::warn!(title = notice.title(), "{}", notice.description());
        } else {
            tracing::info!(title = notice.title(), "{}", notice.description());
        }
    }
}

/// Holds notices until the host drains them
///
/// For hosts whose notice handlers may call back into the player, which must
/// not happen while the controller is mid-call. Clones share one queue.
#[derive(Debug, Default, Clone)]
pub struct QueuedNotifier {
    queue: Rc<RefCell<Vec<Notice>>>,
}

impl QueuedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued notice, oldest first
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl Notifier for QueuedNotifier {
    fn notify(&mut self, notice: Notice) {
        tracing::debug!(%notice, "Queueing notice");
        self.queue.borrow_mut().push(notice);
    }
}
