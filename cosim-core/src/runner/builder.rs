//! Builder for assembling a [`Runner`] from its collaborators.

use crate::component::SlaveFactory;
use crate::errors::{CosimError, CosimResult};
use crate::table::Table;
use crate::variable::ModelDescription;

use super::runtime::Runner;
use super::{InitOverrides, RunConfig};

/// Build a new [`Runner`] from a model description, a component factory and
/// the tabular data for one scenario.
///
/// The model, factory and input table are required; the expected table and
/// overrides default to empty (a drive with no validation), and the
/// configuration defaults to [`RunConfig::default`].
#[derive(Default)]
pub struct RunnerBuilder {
    model: Option<ModelDescription>,
    factory: Option<Box<dyn SlaveFactory>>,
    inputs: Option<Table>,
    expected: Table,
    overrides: InitOverrides,
    config: RunConfig,
}

impl RunnerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(&mut self, model: ModelDescription) -> &mut Self {
        self.model = Some(model);
        self
    }

    pub fn with_factory(&mut self, factory: Box<dyn SlaveFactory>) -> &mut Self {
        self.factory = Some(factory);
        self
    }

    pub fn with_inputs(&mut self, inputs: Table) -> &mut Self {
        self.inputs = Some(inputs);
        self
    }

    pub fn with_expected(&mut self, expected: Table) -> &mut Self {
        self.expected = expected;
        self
    }

    pub fn with_overrides(&mut self, overrides: InitOverrides) -> &mut Self {
        self.overrides = overrides;
        self
    }

    pub fn with_config(&mut self, config: RunConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Assemble the runner.
    ///
    /// Fails if a required collaborator is missing.
    pub fn build(&mut self) -> CosimResult<Runner> {
        let model = self
            .model
            .take()
            .ok_or_else(|| CosimError::Error("no model description provided".to_string()))?;
        let factory = self
            .factory
            .take()
            .ok_or_else(|| CosimError::Error("no component factory provided".to_string()))?;
        let inputs = self
            .inputs
            .take()
            .ok_or_else(|| CosimError::Error("no input table provided".to_string()))?;

        Ok(Runner::new(
            model,
            factory,
            inputs,
            std::mem::take(&mut self.expected),
            std::mem::take(&mut self.overrides),
            std::mem::take(&mut self.config),
        ))
    }
}
