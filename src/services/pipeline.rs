//! Sequential Completion Pipeline
//!
//! Runs the idea, tools and steps prompts strictly in order, feeding each
//! step's output into the next step's template and transcript.

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::PipelineError;
use crate::domain::models::template::{allowed_variables, vars};
use crate::domain::models::{
    Exchange, FormSelection, MemoryScope, PipelineConfig, PipelineResult, PipelineStep, RunEvent,
    RunFailure, RunOutcome, RunState, TemplateSet, TemplateVariables, Transcript,
};
use crate::domain::ports::{CompletionClient, CompletionRequest};
use crate::infrastructure::logging::SecretScrubber;

/// One transcript per step; never shared between steps.
#[derive(Debug, Clone, Default)]
struct StepTranscripts {
    idea: Transcript,
    tools: Transcript,
    steps: Transcript,
}

impl StepTranscripts {
    const fn get(&self, step: PipelineStep) -> &Transcript {
        match step {
            PipelineStep::Idea => &self.idea,
            PipelineStep::Tools => &self.tools,
            PipelineStep::Steps => &self.steps,
        }
    }

    fn record(&mut self, step: PipelineStep, exchange: Exchange, limit: usize) {
        let slot = match step {
            PipelineStep::Idea => &mut self.idea,
            PipelineStep::Tools => &mut self.tools,
            PipelineStep::Steps => &mut self.steps,
        };
        *slot = slot.appended(exchange, limit);
    }
}

/// Service that executes the three-step idea → tools → steps chain
///
/// # Examples
///
/// ```no_run
/// use projectgpt::domain::models::{FormSelection, PipelineConfig, ProjectLanguage, ProjectType, TemplateSet};
/// use projectgpt::domain::ports::CompletionClient;
/// use projectgpt::services::CompletionPipeline;
/// use std::sync::Arc;
///
/// # async fn example(client: Arc<dyn CompletionClient>) -> anyhow::Result<()> {
/// let pipeline = CompletionPipeline::new(client, TemplateSet::default(), PipelineConfig::default());
/// let form = FormSelection::new(ProjectType::Robotics, ProjectLanguage::Go, "drones");
///
/// let outcome = pipeline.generate(&form).await?;
/// println!("{:?}", outcome.result.idea);
/// # Ok(())
/// # }
/// ```
pub struct CompletionPipeline {
    client: Arc<dyn CompletionClient>,
    templates: TemplateSet,
    config: PipelineConfig,
    scrubber: SecretScrubber,
    /// Process-scoped transcripts; the lock also admits one run at a time
    memory: Mutex<StepTranscripts>,
}

impl CompletionPipeline {
    /// Create a new pipeline
    pub fn new(
        client: Arc<dyn CompletionClient>,
        templates: TemplateSet,
        config: PipelineConfig,
    ) -> Self {
        Self {
            client,
            templates,
            config,
            scrubber: SecretScrubber::new(),
            memory: Mutex::new(StepTranscripts::default()),
        }
    }

    pub const fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Whether a run is currently in flight
    pub fn is_running(&self) -> bool {
        self.memory.try_lock().is_err()
    }

    /// Snapshot of a step's process-scoped transcript
    ///
    /// Always empty under [`MemoryScope::Run`].
    pub async fn transcript(&self, step: PipelineStep) -> Transcript {
        self.memory.lock().await.get(step).clone()
    }

    /// Run the pipeline for `form`
    ///
    /// An empty topic issues no completion calls. A trigger while another run
    /// is in flight is rejected rather than queued. Step failures do not
    /// return `Err`: they end the run and are reported in the outcome, with
    /// any earlier outputs kept.
    ///
    /// # Returns
    /// * `Ok(RunOutcome)` - The finished run, `Done` or `Failed`
    /// * `Err(PipelineError::Validation)` - Topic was empty
    /// * `Err(PipelineError::Busy)` - Another run is in flight
    #[instrument(skip(self, form), fields(project_type = %form.project_type, language = %form.project_language))]
    pub async fn generate(&self, form: &FormSelection) -> Result<RunOutcome, PipelineError> {
        form.validate()?;

        let Ok(mut memory) = self.memory.try_lock() else {
            warn!("Generate triggered while a run is in flight");
            return Err(PipelineError::Busy);
        };

        let state = RunState::Idle
            .on(RunEvent::FormEdited { ready: true })?
            .on(RunEvent::Generate)?;

        let mut transcripts = match self.config.memory_scope {
            MemoryScope::Run => StepTranscripts::default(),
            MemoryScope::Process => memory.clone(),
        };

        let outcome = self.run(form, state, &mut transcripts).await?;

        if self.config.memory_scope == MemoryScope::Process {
            *memory = transcripts;
        }

        Ok(outcome)
    }

    async fn run(
        &self,
        form: &FormSelection,
        mut state: RunState,
        transcripts: &mut StepTranscripts,
    ) -> Result<RunOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut result = PipelineResult::default();
        let mut failure = None;

        info!(%run_id, topic = %form.topic, "Starting pipeline run");

        for step in PipelineStep::ALL {
            match self.execute_step(step, form, &result, transcripts.get(step)).await {
                Ok((input, output)) => {
                    transcripts.record(
                        step,
                        Exchange::new(input, output.clone()),
                        self.config.max_transcript_exchanges,
                    );
                    result.set(step, output);
                    state = state.on(RunEvent::StepSucceeded(step))?;
                }
                Err(err) => {
                    error!(%run_id, step = %step, "Pipeline step failed: {}", self.scrubber.scrub(&err.to_string()));
                    failure = Some(self.describe_failure(step, &err));
                    state = state.on(RunEvent::StepFailed(step))?;
                    break;
                }
            }
        }

        info!(%run_id, state = ?state, "Pipeline run finished");

        Ok(RunOutcome {
            run_id,
            state,
            result,
            failure,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Render and send one step, returning the transcript input and the output
    #[instrument(skip(self, form, result, context), fields(step = %step, number = step.number()))]
    async fn execute_step(
        &self,
        step: PipelineStep,
        form: &FormSelection,
        result: &PipelineResult,
        context: &Transcript,
    ) -> Result<(String, String), PipelineError> {
        let variables = step_variables(step, form, result);
        let prompt = self
            .templates
            .get(step)
            .render(&variables)
            .map_err(|source| PipelineError::Template { step, source })?;

        debug!(prompt_len = prompt.len(), context_len = context.len(), "Built prompt");

        let started = Instant::now();
        let output = self
            .client
            .complete(CompletionRequest {
                prompt,
                context: context.clone(),
                temperature: self.config.temperature,
            })
            .await
            .map_err(|source| PipelineError::Provider { step, source })?;

        info!(
            output_len = output.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Step completed"
        );

        Ok((transcript_input(step, form, result), output))
    }

    /// User-facing message for a failed step
    fn describe_failure(&self, step: PipelineStep, err: &PipelineError) -> RunFailure {
        let message = match err {
            PipelineError::Provider { source, .. } => self.scrubber.scrub(&source.to_string()),
            _ => format!(
                "Something went wrong while preparing the {step} prompt. Please try again."
            ),
        };
        RunFailure { step, message }
    }
}

/// Values visible to `step`: form fields for the first step, earlier outputs
/// afterwards.
fn step_variables<'a>(
    step: PipelineStep,
    form: &'a FormSelection,
    result: &'a PipelineResult,
) -> TemplateVariables<'a> {
    let mut variables = TemplateVariables::from([
        (vars::PROJECT_TYPE, form.project_type.label()),
        (vars::PROJECT_LANGUAGE, form.project_language.label()),
        (vars::TOPIC, form.topic.as_str()),
    ]);
    if let Some(idea) = result.idea.as_deref() {
        variables.insert(vars::IDEA, idea);
    }
    if let Some(tools) = result.tools.as_deref() {
        variables.insert(vars::TOOLS, tools);
    }

    let allowed = allowed_variables(step);
    variables.retain(|name, _| allowed.contains(name));
    variables
}

/// What a step's transcript records as the input side of its exchange
fn transcript_input(step: PipelineStep, form: &FormSelection, result: &PipelineResult) -> String {
    match step {
        PipelineStep::Idea => form.topic.clone(),
        PipelineStep::Tools => result.idea.clone().unwrap_or_default(),
        PipelineStep::Steps => format!(
            "{}\n\n{}",
            result.idea.as_deref().unwrap_or_default(),
            result.tools.as_deref().unwrap_or_default()
        ),
    }
}
