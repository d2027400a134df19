//! Common test utilities for integration tests
//!
//! Provides scripted completion clients shared across the integration test
//! files.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use projectgpt::domain::errors::ProviderError;
use projectgpt::domain::models::{FormSelection, PipelineConfig, ProjectLanguage, ProjectType, TemplateSet};
use projectgpt::domain::ports::{CompletionClient, CompletionRequest};
use projectgpt::services::CompletionPipeline;

/// Completion client that replays scripted responses and records every call
#[derive(Default)]
pub struct StubCompletionClient {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletionClient {
    pub fn new(responses: impl IntoIterator<Item = Result<String, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Responds with IDEA_TEXT, TOOLS_TEXT and STEPS_TEXT in turn
    pub fn canned() -> Arc<Self> {
        Self::new([
            Ok("IDEA_TEXT".to_string()),
            Ok("TOOLS_TEXT".to_string()),
            Ok("STEPS_TEXT".to_string()),
        ])
    }

    /// Canned texts for `runs` consecutive runs
    pub fn repeating(runs: usize) -> Arc<Self> {
        Self::new((0..runs).flat_map(|_| {
            [
                Ok("IDEA_TEXT".to_string()),
                Ok("TOOLS_TEXT".to_string()),
                Ok("STEPS_TEXT".to_string()),
            ]
        }))
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.prompt).collect()
    }
}

#[async_trait]
impl CompletionClient for StubCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Network("no scripted response".to_string())))
    }
}

/// Completion client that parks every call until released
#[derive(Default)]
pub struct GatedCompletionClient {
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl CompletionClient for GatedCompletionClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, ProviderError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok("GATED".to_string())
    }
}

pub fn pipeline_with(client: Arc<dyn CompletionClient>, config: PipelineConfig) -> CompletionPipeline {
    CompletionPipeline::new(client, TemplateSet::default(), config)
}

pub fn bird_form() -> FormSelection {
    FormSelection::new(ProjectType::MachineLearning, ProjectLanguage::Python, "bird detection")
}

/// Initialize tracing for test output
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
