//! BART summarization backend.
//!
//! The model is loaded once on a dedicated worker thread which owns it for
//! the lifetime of the [`BartSummarizer`]. Requests are queued over a
//! channel and answered one at a time, so concurrent callers never run two
//! generations at once.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use rust_bert::pipelines::common::ModelResource;
use rust_bert::pipelines::summarization::{SummarizationConfig, SummarizationModel};
use rust_bert::resources::{LocalResource, ResourceProvider};
use tch::Device;

use pdfsum_core::{DeviceChoice, GenerationParams, Settings, Summarizer, SummarizerError};

/// Hugging Face identifier of the pretrained weights used by default.
pub const MODEL_NAME: &str = "facebook/bart-large-cnn";

/// Upper bound on characters handed to the tokenizer. BART truncates its
/// input at 1024 tokens and no BPE token is longer than 64 characters, so
/// anything past this point is always discarded.
pub const INPUT_CHAR_BUDGET: usize = 64 * 1024;

/// Where to load the model from and how to run it.
#[derive(Debug, Clone, Default)]
pub struct BartOptions {
    /// Local directory with `rust_model.ot`, `config.json`, `vocab.json`
    /// and `merges.txt`. `None` downloads [`MODEL_NAME`] into the rust-bert cache.
    pub model_dir: Option<PathBuf>,
    pub device: DeviceChoice,
    pub params: GenerationParams,
}

impl BartOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            model_dir: settings.model_dir.clone(),
            device: settings.device,
            params: settings.generation.clone(),
        }
    }

    fn torch_device(&self) -> Device {
        match self.device {
            DeviceChoice::Auto => Device::cuda_if_available(),
            DeviceChoice::Cpu => Device::Cpu,
            DeviceChoice::Cuda => Device::Cuda(0),
        }
    }

    fn summarization_config(&self) -> SummarizationConfig {
        let params = &self.params;
        let base = match &self.model_dir {
            Some(dir) => SummarizationConfig {
                model_resource: ModelResource::Torch(local(dir, "rust_model.ot")),
                config_resource: local(dir, "config.json"),
                vocab_resource: local(dir, "vocab.json"),
                merges_resource: Some(local(dir, "merges.txt")),
                ..Default::default()
            },
            // rust-bert's default summarization resources are bart-large-cnn.
            None => SummarizationConfig::default(),
        };

        SummarizationConfig {
            min_length: params.min_length,
            max_length: Some(params.max_length),
            num_beams: params.num_beams,
            length_penalty: params.length_penalty,
            early_stopping: params.early_stopping,
            device: self.torch_device(),
            ..base
        }
    }

    fn display_name(&self) -> String {
        match &self.model_dir {
            Some(dir) => dir.display().to_string(),
            None => MODEL_NAME.to_string(),
        }
    }
}

fn local(dir: &Path, file: &str) -> Box<dyn ResourceProvider + Send> {
    Box::new(LocalResource::from(dir.join(file)))
}

struct Job {
    text: String,
    reply: mpsc::Sender<Result<String, SummarizerError>>,
}

/// [`Summarizer`] backed by a BART model running on its own thread.
pub struct BartSummarizer {
    model_name: String,
    jobs: mpsc::Sender<Job>,
}

impl BartSummarizer {
    /// Load the model, blocking until the weights are ready.
    ///
    /// The first call without a `model_dir` downloads roughly 1.6 GB.
    pub fn load(options: BartOptions) -> Result<Self, SummarizerError> {
        let model_name = options.display_name();
        let (jobs_tx, jobs_rx) = mpsc::channel::<Job>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), SummarizerError>>(1);

        let worker_name = model_name.clone();
        thread::Builder::new()
            .name("bart-summarizer".to_string())
            .spawn(move || {
                let started = Instant::now();
                let model = match SummarizationModel::new(options.summarization_config()) {
                    Ok(model) => model,
                    Err(e) => {
                        let _ = ready_tx.send(Err(SummarizerError::Load(e.to_string())));
                        return;
                    }
                };
                tracing::info!(
                    model = %worker_name,
                    device = %options.device,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "summarization model loaded"
                );
                let _ = ready_tx.send(Ok(()));

                serve_jobs(jobs_rx, |text| run_generation(&model, &options.params, text));
                tracing::debug!(model = %worker_name, "summarization worker stopped");
            })
            .map_err(|e| SummarizerError::Load(format!("failed to spawn model thread: {e}")))?;

        ready_rx
            .recv()
            .map_err(|_| SummarizerError::Load("model thread exited during load".to_string()))??;

        Ok(Self {
            model_name,
            jobs: jobs_tx,
        })
    }
}

/// Answer jobs until every sender is dropped.
///
/// A panic inside `generate` (libtorch panics on CUDA OOM and shape errors)
/// fails only the job that caused it; the worker keeps serving.
fn serve_jobs(
    jobs: mpsc::Receiver<Job>,
    mut generate: impl FnMut(&str) -> Result<String, SummarizerError>,
) {
    for job in jobs {
        let result = panic::catch_unwind(AssertUnwindSafe(|| generate(&job.text)))
            .unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                tracing::error!(panic = %message, "summarization panicked");
                Err(SummarizerError::Generation(format!("model panicked: {message}")))
            });
        // The caller may have given up waiting.
        let _ = job.reply.send(result);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn run_generation(
    model: &SummarizationModel,
    params: &GenerationParams,
    text: &str,
) -> Result<String, SummarizerError> {
    let started = Instant::now();
    let input = format!("{}{}", params.prefix, truncate_chars(text, INPUT_CHAR_BUDGET));
    let mut output = model
        .summarize(&[input])
        .map_err(|e| SummarizerError::Generation(e.to_string()))?;
    tracing::debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "beam search finished"
    );
    let summary = output.pop().unwrap_or_default().trim().to_string();
    if summary.is_empty() {
        return Err(SummarizerError::EmptyOutput);
    }
    Ok(summary)
}

/// Prefix of `text` holding at most `max_chars` characters.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

impl Summarizer for BartSummarizer {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn generate(&self, text: &str) -> Result<String, SummarizerError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.jobs
            .send(Job {
                text: text.to_string(),
                reply: reply_tx,
            })
            .map_err(|_| SummarizerError::Generation("model thread is not running".to_string()))?;
        reply_rx.recv().map_err(|_| {
            SummarizerError::Generation("model thread stopped before replying".to_string())
        })?
    }
}
