//! Prompt templates with `{name}` placeholders.
//!
//! Rendering is a single pass over pre-parsed segments, so substituted values
//! are never scanned for placeholders themselves. `{{` and `}}` produce literal
//! braces; any other brace that does not enclose an identifier is kept as-is.

use std::collections::{BTreeMap, BTreeSet};

use super::config::TemplatesConfig;
use super::run::PipelineStep;
use crate::domain::errors::TemplateError;

/// Placeholder names used by the built-in templates.
pub mod vars {
    pub const PROJECT_TYPE: &str = "project_type";
    pub const PROJECT_LANGUAGE: &str = "project_language";
    pub const TOPIC: &str = "topic";
    pub const IDEA: &str = "idea";
    pub const TOOLS: &str = "tools";
}

pub const IDEA_TEMPLATE: &str = "Come up with an original, interesting, and useful {project_type} project idea about {topic} using {project_language}.";

pub const TOOLS_TEMPLATE: &str = "Based the following idea: {idea}\n\nWhat technologies, libraries, or APIs would be the best to use for this project?";

pub const STEPS_TEMPLATE: &str = "Based the following idea: {idea}\n\nAnd the following tools: {tools}.\n\nWhat are the steps to implement this project?";

/// Values substituted into a template, keyed by placeholder name.
pub type TemplateVariables<'a> = BTreeMap<&'a str, &'a str>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A named format string whose placeholders are all required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    body: String,
    segments: Vec<Segment>,
    required_variables: BTreeSet<String>,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        let segments = parse_segments(&body);
        let required_variables = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Placeholder(var) => Some(var.clone()),
                Segment::Literal(_) => None,
            })
            .collect();

        Self {
            name: name.into(),
            body,
            segments,
            required_variables,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Every placeholder that appears in the body.
    pub const fn required_variables(&self) -> &BTreeSet<String> {
        &self.required_variables
    }

    /// Substitute `variables` into the body.
    ///
    /// Variables that the template does not reference are ignored.
    pub fn render(&self, variables: &TemplateVariables<'_>) -> Result<String, TemplateError> {
        let mut rendered = String::with_capacity(self.body.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder(var) => {
                    let value = variables.get(var.as_str()).ok_or_else(|| {
                        TemplateError::MissingVariable {
                            template: self.name.clone(),
                            variable: var.clone(),
                        }
                    })?;
                    rendered.push_str(value);
                }
            }
        }

        Ok(rendered)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn parse_segments(body: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < body.len() {
        let rest = &body[i..];

        if rest.starts_with("{{") {
            literal.push('{');
            i += 2;
            continue;
        }
        if rest.starts_with("}}") {
            literal.push('}');
            i += 2;
            continue;
        }
        if let Some(inner) = rest.strip_prefix('{') {
            if let Some(end) = inner.find('}') {
                let ident = &inner[..end];
                if is_identifier(ident) {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(ident.to_string()));
                    i += end + 2;
                    continue;
                }
            }
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        literal.push(ch);
        i += ch.len_utf8();
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    segments
}

/// Placeholders a step's template may reference: form values for the first
/// step, then only outputs of earlier steps.
pub const fn allowed_variables(step: PipelineStep) -> &'static [&'static str] {
    match step {
        PipelineStep::Idea => &[vars::PROJECT_TYPE, vars::PROJECT_LANGUAGE, vars::TOPIC],
        PipelineStep::Tools => &[vars::IDEA],
        PipelineStep::Steps => &[vars::IDEA, vars::TOOLS],
    }
}

/// The three templates, one per pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    idea: PromptTemplate,
    tools: PromptTemplate,
    steps: PromptTemplate,
}

impl TemplateSet {
    /// Build a set, rejecting templates that reference values their step cannot see.
    pub fn new(
        idea: PromptTemplate,
        tools: PromptTemplate,
        steps: PromptTemplate,
    ) -> Result<Self, TemplateError> {
        let set = Self { idea, tools, steps };
        for step in PipelineStep::ALL {
            let template = set.get(step);
            let allowed = allowed_variables(step);
            if let Some(var) = template
                .required_variables()
                .iter()
                .find(|v| !allowed.contains(&v.as_str()))
            {
                return Err(TemplateError::UnexpectedVariable {
                    template: template.name().to_string(),
                    variable: var.clone(),
                });
            }
        }
        Ok(set)
    }

    /// Built-in templates with any configured body overrides applied.
    pub fn from_config(config: &TemplatesConfig) -> Result<Self, TemplateError> {
        let pick = |step: PipelineStep, custom: Option<&String>, builtin: &str| {
            PromptTemplate::new(step.name(), custom.map_or(builtin, String::as_str))
        };

        Self::new(
            pick(PipelineStep::Idea, config.idea.as_ref(), IDEA_TEMPLATE),
            pick(PipelineStep::Tools, config.tools.as_ref(), TOOLS_TEMPLATE),
            pick(PipelineStep::Steps, config.steps.as_ref(), STEPS_TEMPLATE),
        )
    }

    pub const fn get(&self, step: PipelineStep) -> &PromptTemplate {
        match step {
            PipelineStep::Idea => &self.idea,
            PipelineStep::Tools => &self.tools,
            PipelineStep::Steps => &self.steps,
        }
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            idea: PromptTemplate::new(PipelineStep::Idea.name(), IDEA_TEMPLATE),
            tools: PromptTemplate::new(PipelineStep::Tools.name(), TOOLS_TEMPLATE),
            steps: PromptTemplate::new(PipelineStep::Steps.name(), STEPS_TEMPLATE),
        }
    }
}
