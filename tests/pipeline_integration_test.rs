//! Integration tests for the sequential completion pipeline
//!
//! Drives `CompletionPipeline` with scripted completion clients and checks
//! call order, prompt contents, partial results on failure, the busy guard
//! and transcript scoping.

mod common;

use common::{bird_form, pipeline_with, GatedCompletionClient, StubCompletionClient};
use projectgpt::domain::errors::{PipelineError, ProviderError, ValidationError};
use projectgpt::domain::models::{
    FormSelection, MemoryScope, OutputView, PipelineConfig, PipelineStep, ProjectLanguage,
    ProjectType, RunState,
};
use std::sync::Arc;

#[tokio::test]
async fn test_three_calls_in_order() {
    // Arrange
    let client = StubCompletionClient::canned();
    let pipeline = pipeline_with(client.clone(), PipelineConfig::default());

    // Act
    let outcome = pipeline.generate(&bird_form()).await.unwrap();

    // Assert
    let prompts = client.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[0].starts_with("Come up with"));
    assert!(prompts[1].contains("IDEA_TEXT"));
    assert!(prompts[1].ends_with("What technologies, libraries, or APIs would be the best to use for this project?"));
    assert!(prompts[2].contains("IDEA_TEXT"));
    assert!(prompts[2].contains("TOOLS_TEXT"));
    assert!(prompts[2].ends_with("What are the steps to implement this project?"));

    assert_eq!(outcome.state, RunState::Done);
    assert!(outcome.succeeded());
    assert!(outcome.result.is_complete());
}

#[tokio::test]
async fn test_bird_detection_end_to_end() {
    let client = StubCompletionClient::canned();
    let pipeline = pipeline_with(client.clone(), PipelineConfig::default());

    let outcome = pipeline.generate(&bird_form()).await.unwrap();

    assert_eq!(
        client.prompts()[0],
        "Come up with an original, interesting, and useful Machine Learning project idea about bird detection using Python."
    );
    assert_eq!(
        client.prompts()[2],
        "Based the following idea: IDEA_TEXT\n\nAnd the following tools: TOOLS_TEXT.\n\nWhat are the steps to implement this project?"
    );
    assert_eq!(
        OutputView::from_outcome(&outcome).to_string(),
        "IDEA\nIDEA_TEXT\n\nTOOLS\nTOOLS_TEXT\n\nSTEPS\nSTEPS_TEXT\n"
    );
}

#[tokio::test]
async fn test_empty_topic_issues_no_calls() {
    let client = StubCompletionClient::canned();
    let pipeline = pipeline_with(client.clone(), PipelineConfig::default());
    let form = FormSelection::new(ProjectType::Robotics, ProjectLanguage::Go, "");

    let result = pipeline.generate(&form).await;

    assert!(matches!(
        result,
        Err(PipelineError::Validation(ValidationError::EmptyTopic))
    ));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_whitespace_topic_is_accepted() {
    let client = StubCompletionClient::canned();
    let pipeline = pipeline_with(client.clone(), PipelineConfig::default());
    let form = FormSelection::new(ProjectType::Robotics, ProjectLanguage::Go, " ");

    pipeline.generate(&form).await.unwrap();

    assert_eq!(client.calls().len(), 3);
}

#[tokio::test]
async fn test_first_step_failure_stops_run() {
    // Arrange
    let client = StubCompletionClient::new([Err(ProviderError::Timeout)]);
    let pipeline = pipeline_with(client.clone(), PipelineConfig::default());

    // Act
    let outcome = pipeline.generate(&bird_form()).await.unwrap();

    // Assert
    assert_eq!(client.calls().len(), 1);
    assert_eq!(outcome.state, RunState::Failed);
    assert_eq!(outcome.result.idea, None);

    let failure = outcome.failure.as_ref().unwrap();
    assert_eq!(failure.step, PipelineStep::Idea);
    assert_eq!(failure.message, "Request timed out");

    let view = OutputView::from_outcome(&outcome);
    assert!(view.blocks.is_empty());
    assert_eq!(view.to_string(), "ERROR\nRequest timed out\n");
}

#[tokio::test]
async fn test_second_step_failure_keeps_idea() {
    let client = StubCompletionClient::new([
        Ok("IDEA_TEXT".to_string()),
        Err(ProviderError::QuotaExceeded("insufficient_quota".to_string())),
    ]);
    let pipeline = pipeline_with(client.clone(), PipelineConfig::default());

    let outcome = pipeline.generate(&bird_form()).await.unwrap();

    assert_eq!(client.calls().len(), 2);
    assert_eq!(outcome.result.idea.as_deref(), Some("IDEA_TEXT"));
    assert_eq!(outcome.result.tools, None);
    assert_eq!(outcome.result.steps, None);
    assert_eq!(outcome.failure.as_ref().unwrap().step, PipelineStep::Tools);

    let view = OutputView::from_outcome(&outcome);
    assert_eq!(view.blocks.len(), 1);
    assert_eq!(view.blocks[0].label, "IDEA");
    assert!(view.error.unwrap().contains("insufficient_quota"));
}

#[tokio::test]
async fn test_failure_message_is_scrubbed() {
    let client = StubCompletionClient::new([Err(ProviderError::Authentication(
        "Incorrect API key provided: sk-abcdefghijklmnopqrstuvwxyz".to_string(),
    ))]);
    let pipeline = pipeline_with(client.clone(), PipelineConfig::default());

    let outcome = pipeline.generate(&bird_form()).await.unwrap();

    let message = &outcome.failure.unwrap().message;
    assert!(!message.contains("sk-abcdefghijklmnopqrstuvwxyz"));
    assert!(message.contains("[API_KEY_REDACTED]"));
}

#[tokio::test]
async fn test_temperature_is_forwarded() {
    let client = StubCompletionClient::canned();
    let config = PipelineConfig {
        temperature: 0.3,
        ..PipelineConfig::default()
    };
    let pipeline = pipeline_with(client.clone(), config);

    pipeline.generate(&bird_form()).await.unwrap();

    assert!(client
        .calls()
        .iter()
        .all(|c| (c.temperature - 0.3).abs() < f32::EPSILON));
}

#[tokio::test]
async fn test_run_scope_starts_each_run_fresh() {
    let client = StubCompletionClient::repeating(2);
    let pipeline = pipeline_with(client.clone(), PipelineConfig::default());

    pipeline.generate(&bird_form()).await.unwrap();
    pipeline.generate(&bird_form()).await.unwrap();

    assert!(client.calls().iter().all(|c| c.context.is_empty()));
    assert!(pipeline.transcript(PipelineStep::Idea).await.is_empty());
}

#[tokio::test]
async fn test_process_scope_accumulates_per_step() {
    // Arrange
    let client = StubCompletionClient::repeating(2);
    let config = PipelineConfig {
        memory_scope: MemoryScope::Process,
        ..PipelineConfig::default()
    };
    let pipeline = pipeline_with(client.clone(), config);

    // Act
    pipeline.generate(&bird_form()).await.unwrap();
    pipeline.generate(&bird_form()).await.unwrap();

    // Assert: second run sees exactly one prior exchange per step, its own
    let calls = client.calls();
    assert_eq!(calls.len(), 6);
    assert!(calls[..3].iter().all(|c| c.context.is_empty()));

    let idea_context = &calls[3].context;
    assert_eq!(idea_context.len(), 1);
    assert_eq!(idea_context.entries()[0].input, "bird detection");
    assert_eq!(idea_context.entries()[0].output, "IDEA_TEXT");

    let tools_context = &calls[4].context;
    assert_eq!(tools_context.entries()[0].input, "IDEA_TEXT");
    assert_eq!(tools_context.entries()[0].output, "TOOLS_TEXT");

    let steps_context = &calls[5].context;
    assert_eq!(steps_context.entries()[0].input, "IDEA_TEXT\n\nTOOLS_TEXT");
    assert_eq!(steps_context.entries()[0].output, "STEPS_TEXT");

    assert_eq!(pipeline.transcript(PipelineStep::Steps).await.len(), 2);
}

#[tokio::test]
async fn test_process_scope_respects_exchange_limit() {
    let client = StubCompletionClient::repeating(3);
    let config = PipelineConfig {
        memory_scope: MemoryScope::Process,
        max_transcript_exchanges: 1,
        ..PipelineConfig::default()
    };
    let pipeline = pipeline_with(client.clone(), config);

    for _ in 0..3 {
        pipeline.generate(&bird_form()).await.unwrap();
    }

    assert_eq!(pipeline.transcript(PipelineStep::Idea).await.len(), 1);
    assert!(client.calls().iter().all(|c| c.context.len() <= 1));
}

#[tokio::test]
async fn test_second_trigger_while_running_is_rejected() {
    // Arrange
    let client = Arc::new(GatedCompletionClient::default());
    let pipeline = Arc::new(pipeline_with(client.clone(), PipelineConfig::default()));

    let running = tokio::spawn({
        let pipeline = Arc::clone(&pipeline);
        async move { pipeline.generate(&bird_form()).await }
    });
    client.entered.notified().await;

    // Act
    assert!(pipeline.is_running());
    let second = pipeline.generate(&bird_form()).await;

    // Assert
    assert!(matches!(second, Err(PipelineError::Busy)));

    client.release.notify_one();
    for _ in 0..2 {
        client.entered.notified().await;
        client.release.notify_one();
    }

    let first = running.await.unwrap().unwrap();
    assert_eq!(first.state, RunState::Done);
    assert!(!pipeline.is_running());
}
