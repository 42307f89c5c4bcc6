//! The seam to the external text-generation capability.

use crate::core::error::{GenerationError, GenerationResult};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Produces raw text for a pair of instructions and a request.
///
/// The capability is opaque: it may return anything, including prose,
/// fenced JSON or nothing useful. An `Err` means the call itself failed.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, system_instructions: &str, user_request: &str) -> GenerationResult<String>;
}

impl<F> TextGenerator for F
where
    F: Fn(&str, &str) -> GenerationResult<String> + Send + Sync,
{
    fn generate(&self, system_instructions: &str, user_request: &str) -> GenerationResult<String> {
        self(system_instructions, user_request)
    }
}

/// One request seen by a [`ScriptedGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_instructions: String,
    pub user_request: String,
}

/// Replays a fixed sequence of responses and records every request.
///
/// Used to replay captured generator output offline and in tests.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<GenerationResult<String>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = GenerationResult<String>>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script that answers successfully with each text in turn.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(|t| Ok(t.into())))
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    /// Responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, system_instructions: &str, user_request: &str) -> GenerationResult<String> {
        self.requests.lock().push(GenerationRequest {
            system_instructions: system_instructions.to_string(),
            user_request: user_request.to_string(),
        });
        self.responses
            .lock()
            .pop_front()
            .unwrap_or(Err(GenerationError::Exhausted))
    }
}
