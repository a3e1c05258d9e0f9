//! Headless playback simulation
//!
//! Replaces the browser with a discrete-event world: a virtual clock, an
//! event queue ordered by due time, a simulated `<audio>` element and a
//! virtual timer facility. Runs are deterministic for a given playlist,
//! failure set and configuration.

use crate::config::SimulationSettings;
use encore_core::{TrackId, TrackList};
use encore_playback::{
    AudioOutput, LogNotifier, Notice, Notifier, OutputSignal, PlayTicket, PlaybackController,
    PlaybackSnapshot, PlayerConfig, Scheduler, SignalKind, SourceGeneration, TimerId,
};
use std::cell::RefCell;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, trace};

/// Delay between `load` and the first source signal
const LOAD_LATENCY: Duration = Duration::from_millis(40);

/// Delay between `start` and its resolution
const PLAY_LATENCY: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
enum Pending {
    Signal(OutputSignal),
    Timer(TimerId),
    Tick { epoch: u64 },
}

#[derive(Debug)]
struct Scheduled {
    at: Duration,
    seq: u64,
    event: Pending,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        (self.at, self.seq) == (other.at, other.seq)
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.at, self.seq).cmp(&(other.at, other.seq))
    }
}

#[derive(Debug, Default)]
struct World {
    now: Duration,
    seq: u64,
    queue: BinaryHeap<Reverse<Scheduled>>,

    next_timer: u64,
    cancelled: HashSet<TimerId>,

    // Simulated element
    source: Option<(String, SourceGeneration)>,
    position: f64,
    playing: bool,
    epoch: u64,
    released: bool,

    notices: Vec<(Duration, Notice)>,
}

impl World {
    fn push(&mut self, delay: Duration, event: Pending) {
        self.seq += 1;
        self.queue.push(Reverse(Scheduled {
            at: self.now + delay,
            seq: self.seq,
            event,
        }));
    }

    fn emit(&mut self, delay: Duration, generation: SourceGeneration, kind: SignalKind) {
        self.push(delay, Pending::Signal(OutputSignal::new(generation, kind)));
    }

    /// Move the playhead one tick; `None` for ticks of a stopped run
    fn advance(&mut self, epoch: u64, config: &SimulationSettings) -> Option<OutputSignal> {
        if epoch != self.epoch || !self.playing {
            return None;
        }
        let generation = self.source.as_ref()?.1;
        let tick = Duration::from_millis(config.tick_ms);

        self.position += tick.as_secs_f64();
        if self.position >= config.track_seconds {
            self.position = config.track_seconds;
            self.playing = false;
            return Some(OutputSignal::new(generation, SignalKind::Ended));
        }

        self.push(tick, Pending::Tick { epoch });
        Some(OutputSignal::new(generation, SignalKind::TimeUpdate(self.position)))
    }
}

type Shared = Rc<RefCell<World>>;

/// Simulated `<audio>` element
///
/// URLs in the failure set fail to load and reject `play()`; everything else
/// reports `track_seconds` of audio and plays to the end.
pub struct SimulatedOutput {
    world: Shared,
    settings: Rc<SimulationSettings>,
    failing: Rc<HashSet<String>>,
}

impl SimulatedOutput {
    fn is_failing(&self, url: &str) -> bool {
        self.failing.contains(url)
    }
}

impl AudioOutput for SimulatedOutput {
    fn load(&mut self, url: &str, generation: SourceGeneration) {
        let failing = self.is_failing(url);
        let mut world = self.world.borrow_mut();
        world.source = Some((url.to_string(), generation));
        world.position = 0.0;
        world.playing = false;
        world.epoch += 1;

        if failing {
            world.emit(LOAD_LATENCY, generation, SignalKind::Failed("network error".to_string()));
        } else {
            world.emit(
                LOAD_LATENCY,
                generation,
                SignalKind::LoadedMetadata(self.settings.track_seconds),
            );
        }
    }

    fn start(&mut self, generation: SourceGeneration, ticket: PlayTicket) {
        let failing = {
            let world = self.world.borrow();
            world
                .source
                .as_ref()
                .is_some_and(|(url, _)| self.is_failing(url))
        };
        let mut world = self.world.borrow_mut();

        if failing {
            world.emit(
                PLAY_LATENCY,
                generation,
                SignalKind::PlayResolved {
                    ticket,
                    result: Err("NotSupportedError: no supported source".to_string()),
                },
            );
            return;
        }

        // Like a media element, play() after the end starts over
        if world.position >= self.settings.track_seconds {
            world.position = 0.0;
        }
        world.emit(PLAY_LATENCY, generation, SignalKind::PlayResolved { ticket, result: Ok(()) });
        world.playing = true;
        world.epoch += 1;
        let epoch = world.epoch;
        world.push(Duration::from_millis(self.settings.tick_ms), Pending::Tick { epoch });
    }

    fn halt(&mut self) {
        let mut world = self.world.borrow_mut();
        world.playing = false;
        world.epoch += 1;
    }

    fn set_position(&mut self, seconds: f64) {
        self.world.borrow_mut().position = seconds;
    }

    fn release(&mut self) {
        let mut world = self.world.borrow_mut();
        world.released = true;
        world.playing = false;
        world.source = None;
        world.epoch += 1;
    }
}

/// Timers on the virtual clock
pub struct VirtualScheduler {
    world: Shared,
}

impl Scheduler for VirtualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let mut world = self.world.borrow_mut();
        world.next_timer += 1;
        let id = TimerId(world.next_timer);
        world.push(delay, Pending::Timer(id));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.world.borrow_mut().cancelled.insert(id);
    }
}

/// Logs notices and keeps them, stamped with virtual time, for the report
pub struct TranscriptNotifier {
    world: Shared,
    log: LogNotifier,
}

impl Notifier for TranscriptNotifier {
    fn notify(&mut self, notice: Notice) {
        self.log.notify(notice.clone());
        let mut world = self.world.borrow_mut();
        let now = world.now;
        world.notices.push((now, notice));
    }
}

pub type SimController = PlaybackController<SimulatedOutput, VirtualScheduler, TranscriptNotifier>;

/// Outcome of a simulation run
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Virtual time at the last processed event
    pub elapsed: Duration,

    /// Events delivered to the controller
    pub events: usize,

    /// Notices in emission order
    pub notices: Vec<(Duration, Notice)>,

    /// Whether the run stopped because nothing was left to happen
    pub settled: bool,

    pub snapshot: PlaybackSnapshot,
}

/// Controller wired to the simulated world
pub struct Simulation {
    controller: SimController,
    world: Shared,
    settings: Rc<SimulationSettings>,
}

impl Simulation {
    pub fn new(
        settings: SimulationSettings,
        player: PlayerConfig,
        failing: impl IntoIterator<Item = String>,
    ) -> Self {
        let world: Shared = Rc::default();
        let settings = Rc::new(settings);

        let output = SimulatedOutput {
            world: Rc::clone(&world),
            settings: Rc::clone(&settings),
            failing: Rc::new(failing.into_iter().collect()),
        };
        let scheduler = VirtualScheduler {
            world: Rc::clone(&world),
        };
        let notifier = TranscriptNotifier {
            world: Rc::clone(&world),
            log: LogNotifier,
        };

        Self {
            controller: PlaybackController::new(output, scheduler, notifier, player),
            world,
            settings,
        }
    }

    /// Load the fetched playlist and press play if configured to
    ///
    /// A failed fetch leaves the player empty.
    pub fn load(&mut self, tracks: encore_core::Result<TrackList>) {
        self.controller.apply_fetch_result(tracks);
        if self.settings.autoplay && self.controller.current_track().is_some() {
            self.controller.toggle_playback();
        }
    }

    pub fn controller(&self) -> &SimController {
        &self.controller
    }

    /// Jump to a track of the loaded playlist
    pub fn select(&mut self, id: &TrackId) -> crate::Result<()> {
        self.controller.select_by_id(id, self.settings.autoplay)?;
        Ok(())
    }

    pub fn now(&self) -> Duration {
        self.world.borrow().now
    }

    /// Process the next due event
    ///
    /// Returns `false` once the queue is empty. Cancelled timers and ticks of
    /// a stopped playhead are consumed silently.
    pub fn step(&mut self) -> bool {
        let event = {
            let mut world = self.world.borrow_mut();
            let Some(Reverse(next)) = world.queue.pop() else {
                return false;
            };
            world.now = next.at;
            next.event
        };

        match event {
            Pending::Signal(signal) => {
                trace!(?signal, "Delivering signal");
                self.controller.handle_signal(signal);
            }
            Pending::Timer(id) => {
                let cancelled = self.world.borrow_mut().cancelled.remove(&id);
                if !cancelled {
                    self.controller.handle_timer(id);
                }
            }
            Pending::Tick { epoch } => {
                let signal = self.world.borrow_mut().advance(epoch, &self.settings);
                if let Some(signal) = signal {
                    self.controller.handle_signal(signal);
                }
            }
        }
        true
    }

    /// Run until `max_events` events were processed or nothing is left
    pub fn run(&mut self, max_events: usize) -> SimulationReport {
        let mut events = 0;
        let mut settled = false;

        while events < max_events {
            if !self.step() {
                settled = true;
                break;
            }
            events += 1;
        }

        debug!(events, settled, elapsed_ms = self.now().as_millis() as u64, "Simulation finished");
        self.report(events, settled)
    }

    /// Dispose the controller and report whether the element was released
    pub fn shutdown(&mut self) -> bool {
        self.controller.dispose();
        self.world.borrow().released
    }

    fn report(&self, events: usize, settled: bool) -> SimulationReport {
        let world = self.world.borrow();
        SimulationReport {
            elapsed: world.now,
            events,
            notices: world.notices.clone(),
            settled,
            snapshot: self.controller.snapshot(),
        }
    }
}
