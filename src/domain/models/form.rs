//! Input form values: the two fixed selectors and the free-text topic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::ValidationError;

/// Kind of project the idea should target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    #[default]
    #[serde(rename = "Data Engineering", alias = "data-engineering")]
    DataEngineering,
    #[serde(rename = "Software Engineering", alias = "software-engineering")]
    SoftwareEngineering,
    #[serde(rename = "Machine Learning", alias = "machine-learning")]
    MachineLearning,
    #[serde(rename = "Game Development", alias = "game-development")]
    GameDevelopment,
    #[serde(rename = "Cybersecurity", alias = "cybersecurity")]
    Cybersecurity,
    #[serde(rename = "Robotics", alias = "robotics")]
    Robotics,
}

impl ProjectType {
    /// Every option, in display order.
    pub const ALL: [Self; 6] = [
        Self::DataEngineering,
        Self::SoftwareEngineering,
        Self::MachineLearning,
        Self::GameDevelopment,
        Self::Cybersecurity,
        Self::Robotics,
    ];

    /// Label shown in the selector and substituted into prompts.
    pub const fn label(self) -> &'static str {
        match self {
            Self::DataEngineering => "Data Engineering",
            Self::SoftwareEngineering => "Software Engineering",
            Self::MachineLearning => "Machine Learning",
            Self::GameDevelopment => "Game Development",
            Self::Cybersecurity => "Cybersecurity",
            Self::Robotics => "Robotics",
        }
    }

    /// Kebab-case identifier accepted on the command line.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::DataEngineering => "data-engineering",
            Self::SoftwareEngineering => "software-engineering",
            Self::MachineLearning => "machine-learning",
            Self::GameDevelopment => "game-development",
            Self::Cybersecurity => "cybersecurity",
            Self::Robotics => "robotics",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProjectType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(needle) || t.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownProjectType(s.to_string()))
    }
}

/// Programming language the project should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectLanguage {
    #[default]
    #[serde(rename = "Python", alias = "python")]
    Python,
    #[serde(rename = "JavaScript", alias = "javascript")]
    JavaScript,
    #[serde(rename = "C/C++", alias = "c-cpp")]
    CCpp,
    #[serde(rename = "Dart", alias = "dart")]
    Dart,
    #[serde(rename = "Go", alias = "go")]
    Go,
}

impl ProjectLanguage {
    /// Every option, in display order.
    pub const ALL: [Self; 5] = [Self::Python, Self::JavaScript, Self::CCpp, Self::Dart, Self::Go];

    /// Label shown in the selector and substituted into prompts.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::CCpp => "C/C++",
            Self::Dart => "Dart",
            Self::Go => "Go",
        }
    }

    /// Kebab-case identifier accepted on the command line.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::CCpp => "c-cpp",
            Self::Dart => "dart",
            Self::Go => "go",
        }
    }
}

impl fmt::Display for ProjectLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProjectLanguage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.label().eq_ignore_ascii_case(needle) || l.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownLanguage(s.to_string()))
    }
}

/// Current values of the input form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSelection {
    pub project_type: ProjectType,
    pub project_language: ProjectLanguage,
    #[serde(default)]
    pub topic: String,
}

impl FormSelection {
    pub fn new(
        project_type: ProjectType,
        project_language: ProjectLanguage,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            project_type,
            project_language,
            topic: topic.into(),
        }
    }

    /// Whether the generate trigger is enabled.
    pub fn is_ready(&self) -> bool {
        !self.topic.is_empty()
    }

    /// Only non-emptiness of the topic is checked.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(ValidationError::EmptyTopic)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_type_parsing() {
        assert_eq!(
            "Machine Learning".parse::<ProjectType>().unwrap(),
            ProjectType::MachineLearning
        );
        assert_eq!(
            "machine-learning".parse::<ProjectType>().unwrap(),
            ProjectType::MachineLearning
        );
        assert_eq!("ROBOTICS".parse::<ProjectType>().unwrap(), ProjectType::Robotics);
        assert_eq!(
            "Quantum".parse::<ProjectType>().unwrap_err(),
            ValidationError::UnknownProjectType("Quantum".to_string())
        );
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("C/C++".parse::<ProjectLanguage>().unwrap(), ProjectLanguage::CCpp);
        assert_eq!("c-cpp".parse::<ProjectLanguage>().unwrap(), ProjectLanguage::CCpp);
        assert_eq!("javascript".parse::<ProjectLanguage>().unwrap(), ProjectLanguage::JavaScript);
        assert!("Rust".parse::<ProjectLanguage>().is_err());
    }

    #[test]
    fn test_option_order_matches_selectors() {
        let labels: Vec<_> = ProjectType::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(
            labels,
            [
                "Data Engineering",
                "Software Engineering",
                "Machine Learning",
                "Game Development",
                "Cybersecurity",
                "Robotics"
            ]
        );
        assert_eq!(ProjectType::default(), ProjectType::DataEngineering);
        assert_eq!(ProjectLanguage::default(), ProjectLanguage::Python);
    }

    #[test]
    fn test_serde_uses_labels() {
        let form = FormSelection::new(ProjectType::GameDevelopment, ProjectLanguage::CCpp, "chess");
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["project_type"], "Game Development");
        assert_eq!(json["project_language"], "C/C++");

        let parsed: FormSelection = serde_json::from_str(
            r#"{"project_type":"robotics","project_language":"go","topic":"arm"}"#,
        )
        .unwrap();
        assert_eq!(parsed.project_type, ProjectType::Robotics);
        assert_eq!(parsed.project_language, ProjectLanguage::Go);
    }

    #[test]
    fn test_validate_empty_topic() {
        let form = FormSelection::default();
        assert!(!form.is_ready());
        assert_eq!(form.validate(), Err(ValidationError::EmptyTopic));

        let form = FormSelection::new(ProjectType::Robotics, ProjectLanguage::Go, "drones");
        assert!(form.is_ready());
        assert!(form.validate().is_ok());
    }
}
