#![allow(dead_code)]
//! Shared test doubles: scripted inference engine and recording renderer.

use echo_core::{
    CancelHandle, ChatMessage, EngineError, EntryId, FragmentStream, InferenceEngine, JournalEntry,
    LoadProgress, Severity, StreamDelta, ViewRenderer,
};

/// Scripted engine: configurable hardware gate, load outcome, progress
/// script and fragment sequence. Captures every chat request it receives.
pub struct ScriptedEngine {
    pub accelerated: bool,
    pub load_error: Option<String>,
    pub progress_script: Vec<LoadProgress>,
    pub fragments: Vec<StreamDelta>,
    pub captured_requests: Vec<Vec<ChatMessage>>,
    pub load_calls: usize,
    /// When set, the stream cancels this handle on its first pull, modeling
    /// a cancel request racing the first fragment.
    pub cancel_on_first_pull: Option<CancelHandle>,
    /// When set, the stream fails with this message after the scripted
    /// fragments are exhausted.
    pub stream_error: Option<String>,
}

impl ScriptedEngine {
    pub fn ready_with_fragments(fragments: &[&str]) -> Self {
        Self {
            accelerated: true,
            load_error: None,
            progress_script: vec![LoadProgress::Fraction(0.5), LoadProgress::Fraction(1.0)],
            fragments: fragments
                .iter()
                .map(|fragment| StreamDelta::text(*fragment))
                .collect(),
            captured_requests: Vec::new(),
            load_calls: 0,
            cancel_on_first_pull: None,
            stream_error: None,
        }
    }
}

struct ScriptedStream {
    fragments: std::vec::IntoIter<StreamDelta>,
    cancel_on_first_pull: Option<CancelHandle>,
    trailing_error: Option<String>,
}

impl Iterator for ScriptedStream {
    type Item = Result<StreamDelta, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(handle) = self.cancel_on_first_pull.take() {
            handle.cancel();
        }
        if let Some(delta) = self.fragments.next() {
            return Some(Ok(delta));
        }
        self.trailing_error
            .take()
            .map(|message| Err(EngineError::Stream(message)))
    }
}

impl InferenceEngine for ScriptedEngine {
    fn accelerator_available(&self) -> bool {
        self.accelerated
    }

    fn load(
        &mut self,
        _model_id: &str,
        on_progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<(), EngineError> {
        self.load_calls += 1;
        for progress in &self.progress_script {
            on_progress(*progress);
        }
        match &self.load_error {
            Some(message) => Err(EngineError::Load(message.clone())),
            None => Ok(()),
        }
    }

    fn chat_stream(&mut self, messages: &[ChatMessage]) -> Result<FragmentStream<'_>, EngineError> {
        self.captured_requests.push(messages.to_vec());
        Ok(Box::new(ScriptedStream {
            fragments: self.fragments.clone().into_iter(),
            cancel_on_first_pull: self.cancel_on_first_pull.take(),
            trailing_error: self.stream_error.clone(),
        }))
    }
}

/// Everything a renderer can be asked to do, recorded in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    List {
        titles: Vec<String>,
        active_id: Option<EntryId>,
    },
    Editor(Option<EntryId>),
    Toast(String, Severity),
    Loading(bool, Option<u8>),
    ClearReflection,
    Append(String),
    ReflectionEnabled(bool),
}

/// Renderer double that records the full event sequence.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn appended_text(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Append(fragment) => Some(fragment.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn toasts(&self) -> Vec<&ViewEvent> {
        self.events
            .iter()
            .filter(|event| matches!(event, ViewEvent::Toast(_, _)))
            .collect()
    }

    pub fn last_list(&self) -> Option<&ViewEvent> {
        self.events
            .iter()
            .rev()
            .find(|event| matches!(event, ViewEvent::List { .. }))
    }
}

impl ViewRenderer for RecordingView {
    fn render_list(&mut self, entries: &[&JournalEntry], active_id: Option<EntryId>) {
        self.events.push(ViewEvent::List {
            titles: entries.iter().map(|entry| entry.title.clone()).collect(),
            active_id,
        });
    }

    fn load_editor(&mut self, entry: Option<&JournalEntry>) {
        self.events
            .push(ViewEvent::Editor(entry.map(|entry| entry.id)));
    }

    fn show_toast(&mut self, message: &str, severity: Severity) {
        self.events
            .push(ViewEvent::Toast(message.to_string(), severity));
    }

    fn set_reflection_loading(&mut self, loading: bool, percent: Option<u8>) {
        self.events.push(ViewEvent::Loading(loading, percent));
    }

    fn clear_reflection(&mut self) {
        self.events.push(ViewEvent::ClearReflection);
    }

    fn append_reflection(&mut self, fragment: &str) {
        self.events.push(ViewEvent::Append(fragment.to_string()));
    }

    fn set_reflection_enabled(&mut self, enabled: bool) {
        self.events.push(ViewEvent::ReflectionEnabled(enabled));
    }
}
