//! Mock backends for testing without a PDF library or model weights.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{BackendError, PdfBackend, Summarizer, SummarizerError};

/// What a [`MockSummarizer`] returns from `generate`.
#[derive(Clone, Debug)]
pub enum MockOutput {
    /// Return the same text for every call.
    Fixed(String),
    /// Return the input unchanged.
    Echo,
    /// Fail with [`SummarizerError::Generation`].
    Fail(String),
    /// Panic when the input equals the trigger, echo otherwise.
    PanicOn(String),
}

/// A hand-rolled mock implementing [`Summarizer`] for tests.
///
/// Records the most recent input and counts calls.
pub struct MockSummarizer {
    output: MockOutput,
    last_input: Mutex<Option<String>>,
    call_count: AtomicUsize,
}

impl MockSummarizer {
    pub fn new(output: MockOutput) -> Self {
        Self {
            output,
            last_input: Mutex::new(None),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Always answer with `summary`.
    pub fn fixed(summary: impl Into<String>) -> Self {
        Self::new(MockOutput::Fixed(summary.into()))
    }

    /// Answer with the input text.
    pub fn echo() -> Self {
        Self::new(MockOutput::Echo)
    }

    /// Fail every call with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockOutput::Fail(message.into()))
    }

    /// Panic on input equal to `trigger`, echo everything else.
    pub fn panicking_on(trigger: impl Into<String>) -> Self {
        Self::new(MockOutput::PanicOn(trigger.into()))
    }

    /// How many times `generate` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// The text passed to the most recent `generate` call.
    pub fn last_input(&self) -> Option<String> {
        self.last_input
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Summarizer for MockSummarizer {
    fn model_name(&self) -> &str {
        "mock"
    }

    fn generate(&self, text: &str) -> Result<String, SummarizerError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self
            .last_input
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(text.to_string());

        match &self.output {
            MockOutput::Fixed(summary) => Ok(summary.clone()),
            MockOutput::Echo => Ok(text.to_string()),
            MockOutput::Fail(message) => Err(SummarizerError::Generation(message.clone())),
            MockOutput::PanicOn(trigger) if trigger == text => {
                panic!("mock summarizer panicked on {trigger:?}")
            }
            MockOutput::PanicOn(_) => Ok(text.to_string()),
        }
    }
}

/// A mock [`PdfBackend`] that ignores the bytes it is given.
pub struct MockPdf {
    text: Result<String, String>,
    call_count: AtomicUsize,
}

impl MockPdf {
    /// Extract `text` from any document.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Ok(text.into()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Fail every document with [`BackendError::Open`].
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            text: Err(message.into()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl PdfBackend for MockPdf {
    fn extract_text(&self, _bytes: &[u8]) -> Result<String, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.text.clone().map_err(BackendError::Open)
    }
}
