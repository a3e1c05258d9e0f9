//! Browser implementations of the output and scheduler seams

use super::dispatch::{Dispatcher, Input};
use crate::engine::{AudioOutput, OutputSignal, SignalKind};
use crate::scheduler::{Scheduler, TimerId};
use crate::types::{PlayTicket, SourceGeneration};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, HtmlAudioElement};

type Listener = Closure<dyn FnMut(Event)>;

/// `AudioOutput` backed by a detached `<audio>` element
pub struct HtmlAudioOutput {
    audio: HtmlAudioElement,
    generation: Rc<Cell<SourceGeneration>>,
    dispatcher: Rc<Dispatcher>,
    listeners: Vec<(&'static str, Listener)>,
}

impl HtmlAudioOutput {
    pub(crate) fn new(dispatcher: Rc<Dispatcher>) -> Result<Self, JsValue> {
        let audio = HtmlAudioElement::new()?;
        audio.set_preload("metadata");

        let mut output = Self {
            audio,
            generation: Rc::new(Cell::new(SourceGeneration::default())),
            dispatcher,
            listeners: Vec::new(),
        };

        output.listen("timeupdate", |audio| SignalKind::TimeUpdate(audio.current_time()))?;
        output.listen("loadedmetadata", |audio| SignalKind::LoadedMetadata(audio.duration()))?;
        output.listen("ended", |_| SignalKind::Ended)?;
        output.listen("error", |audio| {
            let reason = audio
                .error()
                .map(|e| format!("media error {}", e.code()))
                .unwrap_or_else(|| "unknown media error".to_string());
            SignalKind::Failed(reason)
        })?;

        Ok(output)
    }

    fn listen(
        &mut self,
        name: &'static str,
        read: impl Fn(&HtmlAudioElement) -> SignalKind + 'static,
    ) -> Result<(), JsValue> {
        let audio = self.audio.clone();
        let generation = Rc::clone(&self.generation);
        let dispatcher = Rc::clone(&self.dispatcher);

        let listener = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let signal = OutputSignal::new(generation.get(), read(&audio));
            dispatcher.push(Input::Signal(signal));
        });
        self.audio
            .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
        self.listeners.push((name, listener));
        Ok(())
    }
}

fn describe(error: &JsValue) -> String {
    error
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| error.as_string())
        .unwrap_or_else(|| "play() rejected".to_string())
}

impl AudioOutput for HtmlAudioOutput {
    fn load(&mut self, url: &str, generation: SourceGeneration) {
        self.generation.set(generation);
        self.audio.set_src(url);
        self.audio.load();
    }

    fn start(&mut self, generation: SourceGeneration, ticket: PlayTicket) {
        let dispatcher = Rc::clone(&self.dispatcher);
        let resolve = move |result: Result<(), String>| {
            let signal = OutputSignal::new(generation, SignalKind::PlayResolved { ticket, result });
            dispatcher.push(Input::Signal(signal));
        };

        match self.audio.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                let result = JsFuture::from(promise).await.map(|_| ()).map_err(|e| describe(&e));
                resolve(result);
            }),
            Err(e) => {
                let reason = describe(&e);
                wasm_bindgen_futures::spawn_local(async move { resolve(Err(reason)) });
            }
        }
    }

    fn halt(&mut self) {
        if let Err(e) = self.audio.pause() {
            tracing::warn!(error = %describe(&e), "Failed to pause audio element");
        }
    }

    fn set_position(&mut self, seconds: f64) {
        self.audio.set_current_time(seconds);
    }

    fn release(&mut self) {
        for (name, listener) in self.listeners.drain(..) {
            self.audio
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
                .ok();
        }
        self.audio.pause().ok();
        self.audio.remove_attribute("src").ok();
        self.audio.load();
    }
}

/// `Scheduler` backed by `window.setTimeout`
pub struct BrowserScheduler {
    dispatcher: Rc<Dispatcher>,
    next_id: u64,
    handles: HashMap<TimerId, i32>,
}

impl BrowserScheduler {
    pub(crate) fn new(dispatcher: Rc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            next_id: 0,
            handles: HashMap::new(),
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);

        let Some(window) = web_sys::window() else {
            tracing::warn!("No window available, timer will never fire");
            return id;
        };

        let dispatcher = Rc::clone(&self.dispatcher);
        let callback = Closure::once_into_js(move || dispatcher.push(Input::Timer(id)));
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        match window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis) {
            Ok(handle) => {
                self.handles.insert(id, handle);
            }
            Err(e) => tracing::warn!(error = %describe(&e), "setTimeout failed"),
        }
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let (Some(handle), Some(window)) = (self.handles.remove(&id), web_sys::window()) {
            window.clear_timeout_with_handle(handle);
        }
    }
}
