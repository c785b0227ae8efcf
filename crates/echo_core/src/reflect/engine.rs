//! Inference engine collaborator boundary.
//!
//! # Responsibility
//! - Define the wire-level types exchanged with an external chat engine.
//! - Keep engine-specific progress payload shapes out of the rest of core.
//!
//! # Invariants
//! - Fragment granularity is unspecified; callers must not assume fragments
//!   align to words or sentences.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Message author role for chat-style completion calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

/// One message in an ordered chat completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Incremental delta fragment from a streaming completion.
///
/// `content` may be absent; such fragments carry no text increment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamDelta {
    pub content: Option<String>,
}

impl StreamDelta {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }
}

/// Native load-progress signal from the engine.
///
/// Engines report progress either as a bare fraction or as a structured
/// report carrying a fractional field. Both forms are normalized to an
/// integer percent at the session boundary before reaching any other
/// component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadProgress {
    /// Bare fraction in `0.0..=1.0`.
    Fraction(f64),
    /// Structured report; only the fractional `progress` field is read.
    Report { progress: f64 },
}

/// External engine failure during load or streaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Model load failed (download, compile, or initialization).
    Load(String),
    /// The fragment stream failed mid-generation.
    Stream(String),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(message) => write!(f, "model load failed: {message}"),
            Self::Stream(message) => write!(f, "generation stream failed: {message}"),
        }
    }
}

impl Error for EngineError {}

/// Lazy fragment sequence returned by a streaming completion call.
pub type FragmentStream<'a> = Box<dyn Iterator<Item = Result<StreamDelta, EngineError>> + 'a>;

/// External on-device inference engine.
///
/// The engine owns its own weight cache and load lifecycle; core only sees
/// the three operations below.
pub trait InferenceEngine {
    /// Whether the acceleration API the engine requires is available.
    ///
    /// Checked before any load attempt.
    fn accelerator_available(&self) -> bool;

    /// Loads the model identified by `model_id`, reporting native progress
    /// through `on_progress`.
    fn load(
        &mut self,
        model_id: &str,
        on_progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<(), EngineError>;

    /// Issues a streaming chat completion and returns the lazy fragment
    /// sequence. Fragments are delivered in arrival order.
    fn chat_stream(&mut self, messages: &[ChatMessage]) -> Result<FragmentStream<'_>, EngineError>;
}
