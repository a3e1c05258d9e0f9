//! WASM-compatible player wrapper

use super::dispatch::{Deferred, Dispatcher, Input, Sink};
use super::output::{BrowserScheduler, HtmlAudioOutput};
use crate::notice::{Notice, QueuedNotifier};
use crate::progress;
use crate::{PlaybackController, PlayerConfig};
use encore_core::{TrackDescriptor, TrackId, TrackList};
use js_sys::Function;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

type Callback = Rc<RefCell<Option<Function>>>;

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ToastPayload<'a> {
    title: &'static str,
    description: String,
    destructive: bool,
    notice: &'a Notice,
}

impl<'a> From<&'a Notice> for ToastPayload<'a> {
    fn from(notice: &'a Notice) -> Self {
        Self {
            title: notice.title(),
            description: notice.description(),
            destructive: notice.is_error(),
            notice,
        }
    }
}

type Controller = PlaybackController<HtmlAudioOutput, BrowserScheduler, QueuedNotifier>;

struct Inner {
    controller: Controller,
    notices: QueuedNotifier,
    on_notice: Callback,
    on_change: Callback,
}

impl Inner {
    /// Toasts for queued notices, then the change callback with the current
    /// snapshot
    ///
    /// Invoked only after the borrow on `Inner` is released, so the callbacks
    /// may call back into the player.
    fn flush_hook(&self) -> Option<Deferred> {
        let notices = self.notices.drain();
        let toast = self.on_notice.borrow().clone();
        let toasts: Vec<JsValue> = match toast {
            Some(_) => notices
                .iter()
                .filter_map(|n| serde_wasm_bindgen::to_value(&ToastPayload::from(n)).ok())
                .collect(),
            None => Vec::new(),
        };
        let change = self.on_change.borrow().clone().and_then(|cb| {
            let value = serde_wasm_bindgen::to_value(&self.controller.snapshot()).ok()?;
            Some((cb, value))
        });

        if toasts.is_empty() && change.is_none() {
            return None;
        }
        Some(Box::new(move || {
            if let Some(cb) = toast {
                for value in &toasts {
                    cb.call1(&JsValue::NULL, value).ok();
                }
            }
            if let Some((cb, value)) = change {
                cb.call1(&JsValue::NULL, &value).ok();
            }
        }))
    }
}

impl Sink for Inner {
    fn apply(&mut self, input: Input) {
        match input {
            Input::Signal(signal) => self.controller.handle_signal(signal),
            Input::Timer(id) => self.controller.handle_timer(id),
        }
    }

    fn settled(&mut self) -> Option<Deferred> {
        self.flush_hook()
    }
}

/// Browser player
///
/// Owns one `<audio>` element for its whole lifetime. Call `dispose()` when
/// the page section unmounts.
#[wasm_bindgen]
pub struct WasmPlayer {
    inner: Rc<RefCell<Inner>>,
    dispatcher: Rc<Dispatcher>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player; `config` may be `undefined` for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let config: PlayerConfig = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid player config: {}", e)))?
        };

        let dispatcher = Dispatcher::new();
        let output = HtmlAudioOutput::new(Rc::clone(&dispatcher))?;
        let scheduler = BrowserScheduler::new(Rc::clone(&dispatcher));
        let notices = QueuedNotifier::new();

        let inner = Rc::new(RefCell::new(Inner {
            controller: PlaybackController::new(output, scheduler, notices.clone(), config),
            notices,
            on_notice: Rc::default(),
            on_change: Rc::default(),
        }));
        let sink: Rc<RefCell<dyn Sink>> = inner.clone();
        dispatcher.attach(Rc::downgrade(&sink));

        Ok(Self { inner, dispatcher })
    }

    // ===== Track list =====

    /// Replace the track list with an array of track descriptors
    #[wasm_bindgen(js_name = setTracks)]
    pub fn set_tracks(&mut self, tracks: JsValue) -> Result<(), JsValue> {
        let tracks: Vec<TrackDescriptor> = serde_wasm_bindgen::from_value(tracks)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse tracks: {}", e)))?;
        let list = TrackList::new(tracks).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.with(|c| c.set_tracks(list));
        Ok(())
    }

    // ===== Playback Control =====

    /// Select a track of the current list by id
    #[wasm_bindgen(js_name = selectTrack)]
    pub fn select_track(&mut self, id: &str, autoplay: bool) -> Result<(), JsValue> {
        let id = TrackId::from(id);
        self.with(|c| c.select_by_id(&id, autoplay))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = togglePlayback)]
    pub fn toggle_playback(&mut self) {
        self.with(Controller::toggle_playback);
    }

    pub fn next(&mut self) {
        self.with(Controller::next);
    }

    pub fn previous(&mut self) {
        self.with(Controller::previous);
    }

    /// Seek from a click on the progress bar
    ///
    /// Returns the new position, or `undefined` when the click was ignored.
    #[wasm_bindgen(js_name = seekFromClick)]
    pub fn seek_from_click(&mut self, offset_x: f64, width: f64) -> Option<f64> {
        let fraction = progress::click_fraction(offset_x, width);
        self.with(|c| c.seek_to_fraction(fraction))
    }

    // ===== State Queries =====

    /// Current playback state as a plain object
    pub fn snapshot(&self) -> JsValue {
        let inner = self.inner.borrow();
        serde_wasm_bindgen::to_value(&inner.controller.snapshot()).unwrap_or(JsValue::NULL)
    }

    /// Elapsed time formatted for display
    #[wasm_bindgen(js_name = elapsedLabel)]
    pub fn elapsed_label(&self) -> String {
        progress::format_time(self.inner.borrow().controller.progress_seconds())
    }

    /// Duration formatted for display
    #[wasm_bindgen(js_name = durationLabel)]
    pub fn duration_label(&self) -> String {
        progress::format_time(self.inner.borrow().controller.duration_seconds())
    }

    /// Fill ratio of the progress bar
    #[wasm_bindgen(js_name = progressRatio)]
    pub fn progress_ratio(&self) -> f64 {
        let inner = self.inner.borrow();
        progress::progress_ratio(
            inner.controller.progress_seconds(),
            inner.controller.duration_seconds(),
        )
    }

    #[wasm_bindgen(js_name = statusLabel)]
    pub fn status_label(&self) -> String {
        self.inner.borrow().controller.source_status().label().to_string()
    }

    // ===== Event Listeners =====

    /// Register a callback receiving the snapshot after every change
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: Function) {
        *self.inner.borrow().on_change.borrow_mut() = Some(callback);
    }

    /// Register a callback receiving toast payloads
    #[wasm_bindgen(js_name = onNotice)]
    pub fn on_notice(&mut self, callback: Function) {
        *self.inner.borrow().on_notice.borrow_mut() = Some(callback);
    }

    /// Release the audio element and cancel pending timers
    pub fn dispose(&mut self) {
        self.with(Controller::dispose);
    }

    fn with<R>(&self, f: impl FnOnce(&mut Controller) -> R) -> R {
        let (result, hook) = {
            let mut inner = self.inner.borrow_mut();
            let result = f(&mut inner.controller);
            (result, inner.flush_hook())
        };
        if let Some(run) = hook {
            run();
        }
        self.dispatcher.pump();
        result
    }
}

/// Format seconds as `M:SS`
#[wasm_bindgen(js_name = formatTime)]
pub fn format_time(seconds: f64) -> String {
    progress::format_time(seconds)
}

/// Map a click fraction to a seek target; `undefined` when seeking is not possible
#[wasm_bindgen(js_name = mapClickToSeekTime)]
pub fn map_click_to_seek_time(fraction: f64, duration_seconds: f64, playback_error: bool) -> Option<f64> {
    progress::map_click_to_seek_time(fraction, duration_seconds, playback_error)
}
