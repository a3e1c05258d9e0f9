//! Shared test doubles for controller tests
//!
//! Each double records into state shared through `Rc<RefCell<..>>`, so a
//! test keeps a handle after moving the double into the controller.

#![allow(dead_code)]

use encore_core::{TrackDescriptor, TrackList};
use encore_playback::{
    AudioOutput, Notice, Notifier, OutputSignal, PlayTicket, PlaybackController, PlayerConfig,
    Scheduler, SignalKind, SourceGeneration, TimerId,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

// ===== Output =====

#[derive(Debug, Clone, PartialEq)]
pub enum OutputCall {
    Load(String, SourceGeneration),
    Start(SourceGeneration, PlayTicket),
    Halt,
    SetPosition(f64),
    Release,
}

#[derive(Debug, Default)]
pub struct OutputLog {
    pub calls: Vec<OutputCall>,
    pub generation: SourceGeneration,
    pub last_ticket: Option<PlayTicket>,
}

impl OutputLog {
    pub fn loads(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                OutputCall::Load(url, _) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn release_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == OutputCall::Release).count()
    }
}

#[derive(Clone, Default)]
pub struct RecordingOutput(pub Rc<RefCell<OutputLog>>);

impl AudioOutput for RecordingOutput {
    fn load(&mut self, url: &str, generation: SourceGeneration) {
        let mut log = self.0.borrow_mut();
        log.generation = generation;
        log.calls.push(OutputCall::Load(url.to_string(), generation));
    }

    fn start(&mut self, generation: SourceGeneration, ticket: PlayTicket) {
        let mut log = self.0.borrow_mut();
        log.last_ticket = Some(ticket);
        log.calls.push(OutputCall::Start(generation, ticket));
    }

    fn halt(&mut self) {
        self.0.borrow_mut().calls.push(OutputCall::Halt);
    }

    fn set_position(&mut self, seconds: f64) {
        self.0.borrow_mut().calls.push(OutputCall::SetPosition(seconds));
    }

    fn release(&mut self) {
        self.0.borrow_mut().calls.push(OutputCall::Release);
    }
}

// ===== Scheduler =====

#[derive(Debug, Default)]
pub struct TimerLog {
    next_id: u64,
    pub scheduled: Vec<(TimerId, Duration)>,
    pub cancelled: Vec<TimerId>,
}

impl TimerLog {
    /// Timers scheduled and neither cancelled nor taken yet
    pub fn live(&self) -> Vec<TimerId> {
        self.scheduled
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| !self.cancelled.contains(id))
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct ManualScheduler(pub Rc<RefCell<TimerLog>>);

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let mut log = self.0.borrow_mut();
        log.next_id += 1;
        let id = TimerId(log.next_id);
        log.scheduled.push((id, delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.0.borrow_mut().cancelled.push(id);
    }
}

// ===== Notifier =====

#[derive(Clone, Default)]
pub struct RecordingNotifier(pub Rc<RefCell<Vec<Notice>>>);

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: Notice) {
        self.0.borrow_mut().push(notice);
    }
}

// ===== Harness =====

pub type TestController = PlaybackController<RecordingOutput, ManualScheduler, RecordingNotifier>;

pub struct Harness {
    pub controller: TestController,
    pub output: Rc<RefCell<OutputLog>>,
    pub timers: Rc<RefCell<TimerLog>>,
    pub notices: Rc<RefCell<Vec<Notice>>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(PlayerConfig::default())
    }

    pub fn with_config(config: PlayerConfig) -> Self {
        let output = RecordingOutput::default();
        let scheduler = ManualScheduler::default();
        let notifier = RecordingNotifier::default();
        let handles = (
            Rc::clone(&output.0),
            Rc::clone(&scheduler.0),
            Rc::clone(&notifier.0),
        );

        Self {
            controller: PlaybackController::new(output, scheduler, notifier, config),
            output: handles.0,
            timers: handles.1,
            notices: handles.2,
        }
    }

    /// Harness with `tracks` loaded (first track selected, not playing)
    pub fn with_tracks(tracks: Vec<TrackDescriptor>) -> Self {
        let mut harness = Self::new();
        harness.controller.set_tracks(TrackList::new(tracks).unwrap());
        harness
    }

    pub fn generation(&self) -> SourceGeneration {
        self.output.borrow().generation
    }

    /// Deliver a signal for the currently loaded source
    pub fn signal(&mut self, kind: SignalKind) {
        let generation = self.generation();
        self.controller.handle_signal(OutputSignal::new(generation, kind));
    }

    pub fn metadata(&mut self, duration: f64) {
        self.signal(SignalKind::LoadedMetadata(duration));
    }

    /// Resolve the most recent play request
    pub fn resolve_play(&mut self, result: Result<(), &str>) {
        let ticket = self.output.borrow().last_ticket.expect("no play requested");
        self.signal(SignalKind::PlayResolved {
            ticket,
            result: result.map_err(str::to_string),
        });
    }

    pub fn fail(&mut self, reason: &str) {
        self.signal(SignalKind::Failed(reason.to_string()));
    }

    /// Fire the latest scheduled timer
    pub fn fire_last_timer(&mut self) {
        let id = self.timers.borrow().scheduled.last().expect("no timer").0;
        self.controller.handle_timer(id);
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn current_id(&self) -> Option<String> {
        self.controller.current_track().map(|t| t.id.to_string())
    }

    pub fn clear_logs(&self) {
        self.output.borrow_mut().calls.clear();
        self.notices.borrow_mut().clear();
    }
}

// ===== Fixtures =====

pub fn url(id: &str) -> String {
    format!("https://cdn.example.com/{}.mp3", id)
}

pub fn playable(id: &str) -> TrackDescriptor {
    TrackDescriptor::new(id, format!("Track {}", id), "Test Artist").with_primary_audio_url(url(id))
}

pub fn silent(id: &str) -> TrackDescriptor {
    TrackDescriptor::new(id, format!("Track {}", id), "Test Artist")
}

pub fn abc() -> Vec<TrackDescriptor> {
    vec![playable("a"), playable("b"), playable("c")]
}
