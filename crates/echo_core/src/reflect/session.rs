//! Reflection session state machine.
//!
//! # Responsibility
//! - Drive lazy one-time model load with normalized progress reporting.
//! - Run a single cancellable streaming generation at a time.
//!
//! # Invariants
//! - State cycles `Unloaded -> Loading -> Ready -> Generating -> Ready`.
//! - A failed load returns the session to `Unloaded`.
//! - Cancellation is cooperative, checked at fragment boundaries only; once
//!   observed, remaining fragments are discarded and `generate` returns `Ok`.

use crate::reflect::engine::{ChatMessage, EngineError, InferenceEngine, LoadProgress};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default model identifier, kept from the original deployment.
pub const DEFAULT_MODEL_ID: &str = "Qwen2.5-1.5B-Instruct-q4f16_1-MLC";

/// Reflection session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unloaded,
    Loading,
    Ready,
    Generating,
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Reflection session failure modes.
#[derive(Debug)]
pub enum SessionError {
    /// Required acceleration API is unavailable; checked before any load.
    UnsupportedHardware,
    /// `generate` was called before a successful load.
    NotLoaded,
    /// Reflection was requested on blank content; the engine is not invoked.
    EmptyInput,
    /// A generation is already in flight; the call is rejected.
    GenerationInFlight,
    /// The engine failed to load the model; state reverts to `Unloaded`.
    ModelLoadFailed(EngineError),
    /// The fragment stream failed mid-generation.
    Engine(EngineError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedHardware => {
                write!(f, "required acceleration API is not available on this device")
            }
            Self::NotLoaded => write!(f, "model is not loaded yet"),
            Self::EmptyInput => write!(f, "cannot reflect on empty content"),
            Self::GenerationInFlight => write!(f, "a generation is already in flight"),
            Self::ModelLoadFailed(err) => write!(f, "{err}"),
            Self::Engine(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ModelLoadFailed(err) | Self::Engine(err) => Some(err),
            _ => None,
        }
    }
}

/// Cloneable handle observed cooperatively by the in-progress generation.
///
/// Cancelling only stops fragment delivery; it does not guarantee the
/// underlying engine call halts. Cancelling while idle has no effect.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Requests cancellation of the in-flight generation, if any.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested since the last `generate`.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Wraps an [`InferenceEngine`] behind the load/generate/cancel contract.
pub struct ReflectionSession<E: InferenceEngine> {
    engine: E,
    state: SessionState,
    model_id: String,
    cancelled: Arc<AtomicBool>,
}

impl<E: InferenceEngine> ReflectionSession<E> {
    /// Creates a session around `engine` with the default model id.
    pub fn new(engine: E) -> Self {
        Self::with_model_id(engine, DEFAULT_MODEL_ID)
    }

    /// Creates a session that will load `model_id` instead of the default.
    pub fn with_model_id(engine: E, model_id: impl Into<String>) -> Self {
        Self {
            engine,
            state: SessionState::Unloaded,
            model_id: model_id.into(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Model id this session loads.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Whether the engine's required acceleration API is available.
    pub fn hardware_supported(&self) -> bool {
        self.engine.accelerator_available()
    }

    /// Borrows the wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutably borrows the wrapped engine.
    ///
    /// Intended for engine-side configuration between calls; the session
    /// state machine stays authoritative for load/generate transitions.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Handle for cooperative cancellation of the in-flight generation.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancelled),
        }
    }

    /// Loads the model if not already loaded.
    ///
    /// # Contract
    /// - No-op when the session is `Ready` or `Generating`.
    /// - `UnsupportedHardware` before any load attempt when acceleration is
    ///   unavailable.
    /// - `on_progress` receives integer percentages (0–100) normalized from
    ///   the engine's native signal.
    /// - On failure the session stays `Unloaded` and the error is surfaced.
    pub fn ensure_loaded(&mut self, mut on_progress: impl FnMut(u8)) -> SessionResult<()> {
        if matches!(self.state, SessionState::Ready | SessionState::Generating) {
            return Ok(());
        }

        if !self.engine.accelerator_available() {
            return Err(SessionError::UnsupportedHardware);
        }

        info!(
            "event=model_load module=reflect status=start model={}",
            self.model_id
        );
        self.state = SessionState::Loading;

        let result = self.engine.load(&self.model_id, &mut |progress| {
            on_progress(normalize_progress(progress))
        });

        match result {
            Ok(()) => {
                self.state = SessionState::Ready;
                info!(
                    "event=model_load module=reflect status=ok model={}",
                    self.model_id
                );
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Unloaded;
                error!(
                    "event=model_load module=reflect status=error model={} error={err}",
                    self.model_id
                );
                Err(SessionError::ModelLoadFailed(err))
            }
        }
    }

    /// Streams a reflection on `content`, invoking `on_token` once per
    /// non-empty text fragment in arrival order.
    ///
    /// # Contract
    /// - Requires `Ready`; fails `NotLoaded` otherwise.
    /// - Rejects blank content with `EmptyInput` before touching the engine.
    /// - The request carries exactly one user message built from the fixed
    ///   reflection prompt template.
    /// - Cancellation observed at a fragment boundary discards the remaining
    ///   fragments and returns `Ok`, not an error.
    /// - The session is `Ready` again when this returns, success or failure.
    pub fn generate(
        &mut self,
        content: &str,
        mut on_token: impl FnMut(&str),
    ) -> SessionResult<()> {
        match self.state {
            SessionState::Ready => {}
            SessionState::Generating => return Err(SessionError::GenerationInFlight),
            SessionState::Unloaded | SessionState::Loading => {
                return Err(SessionError::NotLoaded)
            }
        }

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        self.cancelled.store(false, Ordering::SeqCst);
        self.state = SessionState::Generating;

        let messages = [ChatMessage::user(reflection_prompt(trimmed))];
        let result = consume_stream(&mut self.engine, &messages, &self.cancelled, &mut on_token);

        self.state = SessionState::Ready;
        if let Err(err) = &result {
            error!("event=reflect_generate module=reflect status=error error={err}");
        }
        result
    }
}

fn consume_stream<E: InferenceEngine>(
    engine: &mut E,
    messages: &[ChatMessage],
    cancelled: &AtomicBool,
    on_token: &mut dyn FnMut(&str),
) -> SessionResult<()> {
    let mut stream = engine.chat_stream(messages).map_err(SessionError::Engine)?;

    while let Some(delta) = stream.next() {
        // Cancellation wins over the fragment just pulled: it is discarded,
        // not delivered.
        if cancelled.load(Ordering::SeqCst) {
            info!("event=reflect_generate module=reflect status=cancelled");
            return Ok(());
        }

        let delta = delta.map_err(SessionError::Engine)?;
        if let Some(text) = delta.content {
            if !text.is_empty() {
                on_token(&text);
            }
        }
    }

    Ok(())
}

/// Builds the fixed reflection prompt around the user's entry content.
pub fn reflection_prompt(content: &str) -> String {
    format!(
        "You are a thoughtful, empathetic journaling companion.\n\
         Read the user's journal entry below and offer a short, 1-2 sentence \
         gentle reflection or a question to help them dig deeper.\n\
         Do not be judgmental. Be brief.\n\
         \n\
         User Entry: \"{content}\""
    )
}

/// Normalizes a native engine progress signal to an integer percent.
///
/// The fractional value is multiplied by 100 and floored; both payload
/// shapes are read identically. Out-of-range values clamp to `0..=100`.
pub fn normalize_progress(progress: LoadProgress) -> u8 {
    let fraction = match progress {
        LoadProgress::Fraction(fraction) => fraction,
        LoadProgress::Report { progress } => progress,
    };
    let percent = (fraction * 100.0).floor().clamp(0.0, 100.0);
    if percent.is_nan() {
        0
    } else {
        percent as u8
    }
}
