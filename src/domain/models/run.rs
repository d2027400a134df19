//! Pipeline run models: steps, results and the run state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The three completion steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStep {
    Idea,
    Tools,
    Steps,
}

impl PipelineStep {
    pub const ALL: [Self; 3] = [Self::Idea, Self::Tools, Self::Steps];

    /// Lowercase name, also used as the template name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::Tools => "tools",
            Self::Steps => "steps",
        }
    }

    /// Heading shown above the step's output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idea => "IDEA",
            Self::Tools => "TOOLS",
            Self::Steps => "STEPS",
        }
    }

    /// 1-based position in the pipeline.
    pub const fn number(self) -> usize {
        match self {
            Self::Idea => 1,
            Self::Tools => 2,
            Self::Steps => 3,
        }
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Idea => Some(Self::Tools),
            Self::Tools => Some(Self::Steps),
            Self::Steps => None,
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outputs collected so far; fields fill in step order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idea: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<String>,
}

impl PipelineResult {
    pub fn get(&self, step: PipelineStep) -> Option<&str> {
        match step {
            PipelineStep::Idea => self.idea.as_deref(),
            PipelineStep::Tools => self.tools.as_deref(),
            PipelineStep::Steps => self.steps.as_deref(),
        }
    }

    pub fn set(&mut self, step: PipelineStep, text: String) {
        match step {
            PipelineStep::Idea => self.idea = Some(text),
            PipelineStep::Tools => self.tools = Some(text),
            PipelineStep::Steps => self.steps = Some(text),
        }
    }

    pub const fn is_complete(&self) -> bool {
        self.idea.is_some() && self.tools.is_some() && self.steps.is_some()
    }
}

/// Lifecycle of a single user-triggered run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "step", rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    AwaitingInput,
    Running(PipelineStep),
    Done,
    Failed,
}

/// Inputs that drive [`RunState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    /// The form was edited; `ready` is whether the topic is non-empty.
    FormEdited { ready: bool },
    /// The generate trigger fired.
    Generate,
    StepSucceeded(PipelineStep),
    StepFailed(PipelineStep),
}

/// A transition the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid run transition from {from:?} on {event:?}")]
pub struct InvalidTransition {
    pub from: RunState,
    pub event: RunEvent,
}

impl RunState {
    /// Apply `event`, returning the next state.
    pub fn on(self, event: RunEvent) -> Result<Self, InvalidTransition> {
        use RunEvent::{FormEdited, Generate, StepFailed, StepSucceeded};

        let next = match (self, event) {
            (Self::Idle | Self::AwaitingInput | Self::Done | Self::Failed, FormEdited { ready }) => {
                if ready {
                    Self::AwaitingInput
                } else {
                    Self::Idle
                }
            }
            (Self::AwaitingInput, Generate) => Self::Running(PipelineStep::Idea),
            (Self::Running(current), StepSucceeded(step)) if current == step => {
                step.next().map_or(Self::Done, Self::Running)
            }
            (Self::Running(current), StepFailed(step)) if current == step => Self::Failed,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running(_))
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Why a run stopped early, in a form safe to show to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFailure {
    pub step: PipelineStep,
    pub message: String,
}

/// Everything the output view needs after a run ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub state: RunState,
    pub result: PipelineResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<RunFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunOutcome {
    pub const fn succeeded(&self) -> bool {
        matches!(self.state, RunState::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut state = RunState::Idle;
        state = state.on(RunEvent::FormEdited { ready: true }).unwrap();
        assert_eq!(state, RunState::AwaitingInput);
        state = state.on(RunEvent::Generate).unwrap();
        assert_eq!(state, RunState::Running(PipelineStep::Idea));

        for step in PipelineStep::ALL {
            assert_eq!(state, RunState::Running(step));
            state = state.on(RunEvent::StepSucceeded(step)).unwrap();
        }
        assert_eq!(state, RunState::Done);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_failure_from_any_running_step() {
        for step in PipelineStep::ALL {
            let state = RunState::Running(step).on(RunEvent::StepFailed(step)).unwrap();
            assert_eq!(state, RunState::Failed);
        }
    }

    #[test]
    fn test_generate_requires_ready_form() {
        let err = RunState::Idle.on(RunEvent::Generate).unwrap_err();
        assert_eq!(err.from, RunState::Idle);

        let ready = RunState::Idle.on(RunEvent::FormEdited { ready: false }).unwrap();
        assert_eq!(ready, RunState::Idle);
    }

    #[test]
    fn test_trigger_ignored_while_running() {
        let running = RunState::Running(PipelineStep::Tools);
        assert!(running.on(RunEvent::Generate).is_err());
        assert!(running.on(RunEvent::FormEdited { ready: true }).is_err());
        assert!(running.on(RunEvent::StepSucceeded(PipelineStep::Idea)).is_err());
    }

    #[test]
    fn test_reenter_after_terminal() {
        assert_eq!(
            RunState::Done.on(RunEvent::FormEdited { ready: true }).unwrap(),
            RunState::AwaitingInput
        );
        assert_eq!(
            RunState::Failed.on(RunEvent::FormEdited { ready: false }).unwrap(),
            RunState::Idle
        );
        assert!(RunState::Done.on(RunEvent::Generate).is_err());
    }

    #[test]
    fn test_result_fills_by_step() {
        let mut result = PipelineResult::default();
        result.set(PipelineStep::Idea, "i".to_string());
        assert_eq!(result.get(PipelineStep::Idea), Some("i"));
        assert_eq!(result.get(PipelineStep::Tools), None);
        assert!(!result.is_complete());

        result.set(PipelineStep::Tools, "t".to_string());
        result.set(PipelineStep::Steps, "s".to_string());
        assert!(result.is_complete());
    }
}
