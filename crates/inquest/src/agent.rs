//! The agent: owner of a validation plan, its execution results, and its
//! failing-row extracts.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::error::{InquestError, Result};
use crate::input::{Reader, ReaderConfig, SourceInfo, Table};
use crate::interrogate::{self, InterrogateOptions};
use crate::plan::{StepSpec, ValidationPlan};
use crate::report::{self, Density, Labels, Report, ReportBuilder, ReportOptions};

/// Configuration for an agent.
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    /// Agent name; defaults to a timestamped name. Used in extract file
    /// names (with `:` normalized away).
    pub name: Option<String>,
    /// Reader configuration for [`Agent::from_path`].
    pub reader: ReaderConfig,
    /// Execution options used by [`Agent::interrogate`].
    pub interrogate: InterrogateOptions,
    /// Language resource injected into the report builder.
    pub labels: Labels,
}

/// Owns a target table, a validation plan, and everything an interrogation
/// produces. One logical thread of control per agent: `interrogate` takes
/// `&mut self`, so report requests cannot interleave with a running
/// interrogation of the same agent.
pub struct Agent {
    name: String,
    table: Table,
    source: Option<SourceInfo>,
    plan: ValidationPlan,
    extracts: IndexMap<usize, Table>,
    interrogated_at: Option<DateTime<Utc>>,
    builder: ReportBuilder,
    config: AgentConfig,
}

impl Agent {
    /// Create an agent over an in-memory table with default configuration.
    pub fn new(table: Table) -> Self {
        Self::with_config(table, AgentConfig::default())
    }

    pub fn with_config(table: Table, config: AgentConfig) -> Self {
        let name = config
            .name
            .clone()
            .unwrap_or_else(|| format!("agent_{}", Utc::now().format("%Y-%m-%d_%H:%M:%S")));
        let builder = ReportBuilder::with_labels(config.labels.clone());

        Self {
            name,
            table,
            source: None,
            plan: ValidationPlan::new(),
            extracts: IndexMap::new(),
            interrogated_at: None,
            builder,
            config,
        }
    }

    /// Create an agent by reading a delimited file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_path_with_config(path, AgentConfig::default())
    }

    pub fn from_path_with_config(path: impl AsRef<Path>, config: AgentConfig) -> Result<Self> {
        let reader = Reader::with_config(config.reader.clone());
        let (table, source) = reader.read_file(path)?;
        let mut agent = Self::with_config(table, config);
        agent.source = Some(source);
        Ok(agent)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn source(&self) -> Option<&SourceInfo> {
        self.source.as_ref()
    }

    pub fn plan(&self) -> &ValidationPlan {
        &self.plan
    }

    pub fn extracts(&self) -> &IndexMap<usize, Table> {
        &self.extracts
    }

    /// When the last interrogation ran; `None` before the first.
    pub fn interrogated_at(&self) -> Option<DateTime<Utc>> {
        self.interrogated_at
    }

    /// Add a step to the plan, returning its assigned 1-based index.
    ///
    /// Wildcard column selections are resolved against the table schema as
    /// it is now; later schema changes do not affect the step.
    pub fn add_step(&mut self, spec: StepSpec) -> Result<usize> {
        self.plan.add_step(spec, &self.table.headers)
    }

    /// Execute every active step with the agent's configured options.
    pub fn interrogate(&mut self) {
        let options = self.config.interrogate.clone();
        self.interrogate_with(&options);
    }

    /// Execute every active step with explicit options.
    pub fn interrogate_with(&mut self, options: &InterrogateOptions) {
        self.extracts = interrogate::run(&self.table, &mut self.plan, options);
        self.interrogated_at = Some(Utc::now());
    }

    /// Build the report model for the plan's current state (works both
    /// before and after interrogation).
    pub fn report(&self, options: &ReportOptions) -> Result<Report> {
        self.builder
            .build(&self.name, &self.plan, &self.extracts, options)
    }

    /// Render a report as a fixed-width text table.
    pub fn render_report(&self, report: &Report, density: Density) -> String {
        self.builder.render_text(report, density)
    }

    /// Write the failing-row extract for one step to `dir`, using the
    /// `{agent_name}_{index:04}.csv` naming contract.
    pub fn export_extract(&self, index: usize, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let extract = self.extracts.get(&index).ok_or_else(|| {
            InquestError::EmptyData(format!("no extract available for step {}", index))
        })?;
        report::export_extract(&self.name, index, extract, dir)
    }
}
