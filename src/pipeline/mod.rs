//! The fetch, convert and save sequence as an explicit state machine.
//!
//! A [`Pipeline`] walks [`Stage::Validating`] through [`Stage::Done`] in
//! order and stops at the first failure. Every stage it enters is recorded in
//! the returned [`PipelineRun`], so callers can see exactly how far a run got.
//!
//! Component errors never leave this module as errors: they are mapped to an
//! [`OutcomeCode`] and a single `Error: ...` line on the console.

mod error_mapping;

use std::fmt;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use indicatif::HumanBytes;
use tracing::{debug, info, instrument, warn};

use crate::console::Console;
use crate::fetch::Fetcher;
use crate::outcome::OutcomeCode;
use crate::output::{ensure_output_dir, generate_output_filename};
use crate::parser::validate_image_url;
use crate::progress::ProgressRunner;
use crate::scope::Scope;
use crate::transform::Transformer;

use error_mapping::StageFailure;

/// Label shown while the image is downloading.
pub const FETCH_LABEL: &str = "Fetching image";

/// Label shown while the image is converting.
pub const PROCESS_LABEL: &str = "Processing image";

/// Position of a run in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Checking the image URL.
    Validating,
    /// Making sure the output directory exists.
    ResolvingOutput,
    /// Downloading on the I/O pool.
    Fetching,
    /// Converting on the CPU pool.
    Processing,
    /// Saving the converted image.
    Writing,
    /// Finished successfully.
    Done,
    /// Stopped with the given code. Absorbing.
    Failed(OutcomeCode),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validating => f.write_str("validating"),
            Self::ResolvingOutput => f.write_str("resolving-output"),
            Self::Fetching => f.write_str("fetching"),
            Self::Processing => f.write_str("processing"),
            Self::Writing => f.write_str("writing"),
            Self::Done => f.write_str("done"),
            Self::Failed(code) => write!(f, "failed({})", code.code()),
        }
    }
}

/// What to fetch and where to put the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    /// Raw image URL as given by the operator.
    pub image_url: String,
    /// Custom output filename, or `None` for a generated one.
    pub output_filename: Option<String>,
    /// Directory the image is written into.
    pub output_dir: PathBuf,
}

impl PipelineRequest {
    /// Request with a generated filename.
    pub fn new(image_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_url: image_url.into(),
            output_filename: None,
            output_dir: output_dir.into(),
        }
    }

    /// Sets a custom output filename.
    #[must_use]
    pub fn with_output_filename(mut self, name: impl Into<String>) -> Self {
        self.output_filename = Some(name.into());
        self
    }
}

/// The artifact written by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    /// Where the image was written.
    pub path: PathBuf,
    /// Size of the fetched image.
    pub source_bytes: usize,
    /// Size of the written image.
    pub result_bytes: usize,
}

/// Record of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    stages: Vec<Stage>,
    outcome: OutcomeCode,
    saved: Option<SavedImage>,
}

impl PipelineRun {
    fn started() -> Self {
        Self {
            stages: Vec::new(),
            outcome: OutcomeCode::GeneralError,
            saved: None,
        }
    }

    fn enter(&mut self, stage: Stage) {
        debug!(%stage, "entering stage");
        self.stages.push(stage);
    }

    /// Final outcome of the run.
    #[must_use]
    pub fn outcome(&self) -> OutcomeCode {
        self.outcome
    }

    /// Stages in the order they were entered, ending in `Done` or `Failed`.
    #[must_use]
    pub fn stages_entered(&self) -> &[Stage] {
        &self.stages
    }

    /// Returns true when the run reached `stage`.
    #[must_use]
    pub fn entered(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    /// The written image, present only on success.
    #[must_use]
    pub fn saved(&self) -> Option<&SavedImage> {
        self.saved.as_ref()
    }
}

/// Validates, fetches, converts and saves one image.
///
/// Construct it with the worker pool [`Scope`]s and the stage implementations;
/// it owns the operator input used by the directory prompt.
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    transformer: Arc<dyn Transformer>,
    io: Scope,
    cpu: Scope,
    runner: ProgressRunner,
    input: Mutex<Box<dyn BufRead + Send>>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("io", &self.io)
            .field("cpu", &self.cpu)
            .field("runner", &self.runner)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Creates a pipeline reading prompt answers from stdin.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        transformer: Arc<dyn Transformer>,
        io: Scope,
        cpu: Scope,
        runner: ProgressRunner,
    ) -> Self {
        Self {
            fetcher,
            transformer,
            io,
            cpu,
            runner,
            input: Mutex::new(Box::new(BufReader::new(io::stdin()))),
        }
    }

    /// Replaces the source of prompt answers.
    #[must_use]
    pub fn with_input(mut self, input: impl BufRead + Send + 'static) -> Self {
        self.input = Mutex::new(Box::new(input));
        self
    }

    fn console(&self) -> &Console {
        self.runner.console()
    }

    /// Runs every stage for `request` and reports how it ended.
    ///
    /// Never fails: a stage failure prints one `Error:` line and is reflected
    /// in [`PipelineRun::outcome`].
    #[instrument(skip_all, fields(url = %request.image_url))]
    pub async fn run(&self, request: &PipelineRequest) -> PipelineRun {
        let mut run = PipelineRun::started();

        match self.execute(request, &mut run).await {
            Ok(saved) => {
                run.enter(Stage::Done);
                run.outcome = OutcomeCode::Success;
                run.saved = Some(saved);
            }
            Err(failure) => {
                warn!(code = failure.code.code(), message = %failure.message, "pipeline failed");
                self.console().error_line(&failure.message);
                run.enter(Stage::Failed(failure.code));
                run.outcome = failure.code;
            }
        }
        run
    }

    async fn execute(
        &self,
        request: &PipelineRequest,
        run: &mut PipelineRun,
    ) -> Result<SavedImage, StageFailure> {
        run.enter(Stage::Validating);
        let locator = validate_image_url(&request.image_url).map_err(|e| {
            if let Some(suggestion) = e.suggestion() {
                info!(suggestion, "rejected image URL");
            }
            StageFailure::invalid_url(&e)
        })?;
        info!(url = %locator, "starting image processing");

        run.enter(Stage::ResolvingOutput);
        self.resolve_output_dir(&request.output_dir)?;

        run.enter(Stage::Fetching);
        let fetcher = Arc::clone(&self.fetcher);
        let source = self
            .runner
            .run(&self.io, FETCH_LABEL, async move { fetcher.fetch(&locator).await })
            .await
            .ok_or_else(StageFailure::fetch_failed)?;
        let source_bytes = source.len();
        self.console().status_line(&format!(
            "Image fetched successfully, size: {}",
            human_size(source_bytes)
        ));

        run.enter(Stage::Processing);
        let transformer = Arc::clone(&self.transformer);
        let result = self
            .runner
            .run(&self.cpu, PROCESS_LABEL, async move {
                transformer.transform(source)
            })
            .await
            .ok_or_else(StageFailure::processing_failed)?;
        let result_bytes = result.len();
        self.console().status_line(&format!(
            "Image converted to grayscale, size: {}",
            human_size(result_bytes)
        ));

        run.enter(Stage::Writing);
        let filename = generate_output_filename(request.output_filename.as_deref());
        let path = request.output_dir.join(filename);
        self.write_image(&path, result.into_bytes()).await?;

        let shown = std::path::absolute(&path).unwrap_or_else(|_| path.clone());
        self.console()
            .status_line(&format!("Processed image saved to: {}", shown.display()));
        self.console().status_line(&format!(
            "Compression: {} -> {}",
            human_size(source_bytes),
            human_size(result_bytes)
        ));

        Ok(SavedImage {
            path,
            source_bytes,
            result_bytes,
        })
    }

    // Blocking read on the orchestrator thread. Nothing else is scheduled on
    // it while the prompt is open, and `block_in_place` is unavailable on a
    // current-thread runtime.
    fn resolve_output_dir(&self, dir: &Path) -> Result<(), StageFailure> {
        let mut input = self.input.lock().unwrap_or_else(PoisonError::into_inner);
        ensure_output_dir(dir, input.as_mut(), self.console())
            .map(|status| debug!(?status, "output directory ready"))
            .map_err(|e| StageFailure::output_dir(&e))
    }

    async fn write_image(&self, path: &Path, bytes: Vec<u8>) -> Result<(), StageFailure> {
        let target = path.to_path_buf();
        match self.io.spawn(tokio::fs::write(target, bytes)).await {
            Ok(Ok(())) => {
                info!(path = %path.display(), "image saved");
                Ok(())
            }
            Ok(Err(e)) => Err(StageFailure::write_failed(path, &e)),
            Err(join_error) => Err(StageFailure::write_failed(path, &join_error)),
        }
    }
}

fn human_size(bytes: usize) -> HumanBytes {
    HumanBytes(u64::try_from(bytes).unwrap_or(u64::MAX))
}
