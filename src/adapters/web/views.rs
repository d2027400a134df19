//! Page rendering for the form and its output.

use handlebars::Handlebars;
use serde::Serialize;

use crate::domain::models::{FormSelection, OutputView, ProjectLanguage, ProjectType};

const INDEX_TEMPLATE: &str = "index";
const PAGE_TITLE: &str = "ProjectGPT";

/// One `<option>` in a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Everything the index template needs.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub title: &'static str,
    pub project_types: Vec<OptionView>,
    pub languages: Vec<OptionView>,
    pub topic: String,
    pub generate_enabled: bool,
    pub output: Option<OutputView>,
    pub notice: Option<String>,
}

impl PageView {
    /// Page for `form` with the selectors preset and no output yet
    pub fn new(form: &FormSelection) -> Self {
        let project_types = ProjectType::ALL
            .into_iter()
            .map(|t| OptionView {
                value: t.slug(),
                label: t.label(),
                selected: t == form.project_type,
            })
            .collect();
        let languages = ProjectLanguage::ALL
            .into_iter()
            .map(|l| OptionView {
                value: l.slug(),
                label: l.label(),
                selected: l == form.project_language,
            })
            .collect();

        Self {
            title: PAGE_TITLE,
            project_types,
            languages,
            topic: form.topic.clone(),
            generate_enabled: form.is_ready(),
            output: None,
            notice: None,
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: OutputView) -> Self {
        self.output = (!output.is_empty()).then_some(output);
        self
    }

    #[must_use]
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}

/// Handlebars registry holding the page templates
///
/// Values are HTML-escaped on output, so model text is shown literally.
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    /// Register the embedded templates
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_template_string(
            INDEX_TEMPLATE,
            include_str!("templates/index.html.hbs"),
        )?;
        Ok(Self { registry })
    }

    pub fn render(&self, page: &PageView) -> Result<String, handlebars::RenderError> {
        self.registry.render(INDEX_TEMPLATE, page)
    }
}
