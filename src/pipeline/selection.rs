//! Include/exclude filtering of the step catalogue

use super::error::PipelineError;
use super::step::BuildStep;

/// Which steps of the catalogue run in an invocation.
///
/// Matching is by substring: an entry selects every step whose name contains
/// it. Selection narrows the catalogue and never reorders it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StepSelection {
    #[default]
    All,
    Include(Vec<String>),
    Exclude(Vec<String>),
    /// Exactly one step, by full name (used by the per-step subcommands)
    Only(String),
}

impl StepSelection {
    /// Builds a selection from user input. Giving both lists is rejected.
    pub fn from_filters(include: &[String], exclude: &[String]) -> Result<Self, PipelineError> {
        let include = normalize(include);
        let exclude = normalize(exclude);

        match (include.is_empty(), exclude.is_empty()) {
            (false, false) => Err(PipelineError::ConflictingSelection),
            (false, true) => Ok(StepSelection::Include(include)),
            (true, false) => Ok(StepSelection::Exclude(exclude)),
            (true, true) => Ok(StepSelection::All),
        }
    }

    pub fn only(name: impl Into<String>) -> Self {
        StepSelection::Only(name.into())
    }

    pub fn is_selected(&self, name: &str) -> bool {
        match self {
            StepSelection::All => true,
            StepSelection::Include(entries) => entries.iter().any(|e| name.contains(e.as_str())),
            StepSelection::Exclude(entries) => !entries.iter().any(|e| name.contains(e.as_str())),
            StepSelection::Only(only) => name == only,
        }
    }

    /// Filters `catalogue`, keeping canonical order
    pub fn apply<'a>(&self, catalogue: &'a [Box<dyn BuildStep>]) -> Vec<&'a dyn BuildStep> {
        catalogue
            .iter()
            .map(|step| step.as_ref())
            .filter(|step| self.is_selected(step.name()))
            .collect()
    }
}

fn normalize(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}
