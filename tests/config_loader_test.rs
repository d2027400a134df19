//! Configuration loading tests
//!
//! Environment mutations go through `temp_env`, which serializes tests that
//! touch the process environment and restores it afterwards.

use std::io::Write;
use tempfile::NamedTempFile;

use projectgpt::domain::models::{LogFormat, MemoryScope};
use projectgpt::infrastructure::config::{ConfigError, ConfigLoader, API_KEY_ENV};

const CLEAN_ENV: [(&str, Option<&str>); 5] = [
    (API_KEY_ENV, None),
    ("PROJECTGPT_PROVIDER__API_KEY", None),
    ("PROJECTGPT_PROVIDER__MODEL", None),
    ("PROJECTGPT_PIPELINE__TEMPERATURE", None),
    ("PROJECTGPT_SERVER__PORT", None),
];

fn env_with<'a>(overrides: &[(&'a str, Option<&'a str>)]) -> Vec<(&'a str, Option<&'a str>)> {
    let mut vars: Vec<_> = CLEAN_ENV
        .iter()
        .filter(|(key, _)| !overrides.iter().any(|(k, _)| k == key))
        .copied()
        .collect();
    vars.extend_from_slice(overrides);
    vars
}

fn yaml_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_missing_api_key_fails_fast() {
    let file = yaml_file("provider:\n  model: gpt-4o-mini\n");

    temp_env::with_vars(env_with(&[]), || {
        let result = ConfigLoader::load_from_file(file.path());
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    });
}

#[test]
fn test_api_key_falls_back_to_openai_env() {
    let file = yaml_file("server:\n  port: 9001\n");

    temp_env::with_vars(env_with(&[(API_KEY_ENV, Some("sk-from-env"))]), || {
        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.provider.api_key.as_deref(), Some("sk-from-env"));
        assert_eq!(config.server.port, 9001);
    });
}

#[test]
fn test_file_key_wins_over_openai_env() {
    let file = yaml_file("provider:\n  api_key: sk-from-file\n");

    temp_env::with_vars(env_with(&[(API_KEY_ENV, Some("sk-from-env"))]), || {
        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(
            ConfigLoader::api_key(&config).unwrap(),
            "sk-from-file"
        );
    });
}

#[test]
fn test_hierarchical_merging() {
    // Arrange: file sets model and scope, env overrides model and port
    let file = yaml_file(
        r"
provider:
  api_key: sk-file-key
  model: gpt-4o
pipeline:
  memory_scope: process
logging:
  format: json
",
    );

    temp_env::with_vars(
        env_with(&[
            ("PROJECTGPT_PROVIDER__MODEL", Some("gpt-4.1-mini")),
            ("PROJECTGPT_SERVER__PORT", Some("9100")),
        ]),
        || {
            // Act
            let config = ConfigLoader::load_from_file(file.path()).unwrap();

            // Assert
            assert_eq!(config.provider.model, "gpt-4.1-mini");
            assert_eq!(config.server.port, 9100);
            assert_eq!(config.pipeline.memory_scope, MemoryScope::Process);
            assert_eq!(config.logging.format, LogFormat::Json);
            // Untouched defaults survive the merge
            assert_eq!(config.provider.max_tokens, 256);
            assert_eq!(config.provider.base_url, "https://api.openai.com");
        },
    );
}

#[test]
fn test_env_temperature_is_validated() {
    let file = yaml_file("provider:\n  api_key: sk-file-key\n");

    temp_env::with_vars(
        env_with(&[("PROJECTGPT_PIPELINE__TEMPERATURE", Some("3.5"))]),
        || {
            let result = ConfigLoader::load_from_file(file.path());
            assert!(matches!(result, Err(ConfigError::InvalidTemperature(_))));
        },
    );
}

#[test]
fn test_template_override_from_file() {
    let file = yaml_file(
        r#"
provider:
  api_key: sk-file-key
templates:
  idea: "Pitch a {project_type} project about {topic} in {project_language}."
"#,
    );

    temp_env::with_vars(env_with(&[]), || {
        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert!(config.templates.idea.is_some());
        assert!(config.templates.tools.is_none());
    });
}

#[test]
fn test_template_override_with_forward_reference_is_rejected() {
    let file = yaml_file(
        r#"
provider:
  api_key: sk-file-key
templates:
  idea: "An idea about {topic} using {tools}"
"#,
    );

    temp_env::with_vars(env_with(&[]), || {
        let result = ConfigLoader::load_from_file(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidTemplate(_))));
    });
}

#[test]
fn test_invalid_yaml_is_a_load_error() {
    let file = yaml_file("provider: [not, a, map\n");

    temp_env::with_vars(env_with(&[(API_KEY_ENV, Some("sk-from-env"))]), || {
        let result = ConfigLoader::load_from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Load(_))));
    });
}
