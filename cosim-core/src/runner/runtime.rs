//! Runner struct and runtime execution.

use crate::component::{Instance, SlaveFactory};
use crate::errors::CosimResult;
use crate::table::Table;
use crate::validation::{RunReport, Validator};
use crate::value::Value;
use crate::variable::{Causality, ModelDescription};
use log::{info, warn};

use super::{InitOverrides, RunConfig};

/// Drives a single-component co-simulation scenario for a configured number
/// of independent runs.
///
/// Each run walks the same sequence the source drivers use: instantiate,
/// declare the experiment, apply initial overrides, bracket initialization
/// mode, then for every aligned input row apply the inputs, step, advance the
/// time cursor and validate outputs at the new cursor. Termination and
/// release are guaranteed on every exit path by the instance's ownership
/// semantics.
pub struct Runner {
    model: ModelDescription,
    factory: Box<dyn SlaveFactory>,
    inputs: Table,
    expected: Table,
    overrides: InitOverrides,
    config: RunConfig,
    validator: Validator,
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("model", &self.model)
            .field("factory", &"<dyn SlaveFactory>")
            .field("inputs", &self.inputs)
            .field("expected", &self.expected)
            .field("overrides", &self.overrides)
            .field("config", &self.config)
            .field("validator", &self.validator)
            .finish()
    }
}

impl Runner {
    pub(crate) fn new(
        model: ModelDescription,
        factory: Box<dyn SlaveFactory>,
        inputs: Table,
        expected: Table,
        overrides: InitOverrides,
        config: RunConfig,
    ) -> Self {
        let validator = Validator::new(config.real_tolerance);
        Self {
            model,
            factory,
            inputs,
            expected,
            overrides,
            config,
            validator,
        }
    }

    pub fn model(&self) -> &ModelDescription {
        &self.model
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Execute the configured number of independent runs.
    ///
    /// A failed run is reported and never stops the remaining runs.
    pub fn run_all(&self) -> Vec<RunReport> {
        (0..self.config.run_count)
            .map(|run_index| {
                info!("starting run #{}...", run_index + 1);
                self.run_once(run_index)
            })
            .collect()
    }

    /// Execute one fully independent run.
    pub fn run_once(&self, run_index: usize) -> RunReport {
        let mut report = RunReport::new(run_index);
        if let Err(err) = self.drive(&mut report) {
            warn!("run #{} aborted: {}", run_index + 1, err);
            report.failure = Some(err);
        }
        report
    }

    fn drive(&self, report: &mut RunReport) -> CosimResult<()> {
        let mut instance = Instance::instantiate(self.factory.as_ref(), &self.model, "instance1")?;
        instance.setup_experiment(self.config.start_time)?;

        info!("setting initial values...");
        self.apply_overrides(&mut instance)?;

        instance.enter_initialization_mode()?;
        instance.exit_initialization_mode()?;

        info!("----- initial state -----");
        self.log_state(&instance);

        let mut t = self.config.start_time;
        for step in self.inputs.steps(self.config.default_step_size) {
            info!("setting input values...");
            self.apply_inputs(&mut instance, step.index);

            info!("----- state @ {} -----", t);
            self.log_state(&instance);

            info!("calling do_step(t={}, step_size={})", t, step.step_size);
            instance.do_step(t, step.step_size)?;
            t += step.step_size;
            report.steps_completed += 1;

            match self.expected.row_at(t, self.config.time_tolerance) {
                Some(row) => {
                    info!("validating results for t={}:", t);
                    let records = self.validator.validate_row(
                        &self.model.variables,
                        &instance,
                        &self.expected,
                        row,
                        t,
                    );
                    for record in &records {
                        info!("  {}", record);
                    }
                    report.records.extend(records);
                }
                None => info!("no validation entry for t={}, skipping validation", t),
            }
        }

        instance.terminate()
    }

    /// Apply the initial overrides, strictly between instantiation and
    /// initialization mode.
    ///
    /// An override naming an unknown variable aborts the run; a malformed
    /// value or a rejected set only skips that variable.
    fn apply_overrides(&self, instance: &mut Instance) -> CosimResult<()> {
        for (name, raw) in &self.overrides {
            let descriptor = self.model.variables.resolve(name)?;
            if !matches!(
                descriptor.causality,
                Causality::Input | Causality::Parameter
            ) {
                warn!(
                    "initial override '{}' targets a {} variable, skipping",
                    name, descriptor.causality
                );
                continue;
            }
            let value = match Value::decode(descriptor.var_type, raw) {
                Ok(value) => value,
                Err(err) => {
                    warn!("skipping initial override '{}': {}", name, err);
                    continue;
                }
            };
            match instance.set_value(descriptor, &value) {
                Ok(()) => info!("{} -> {}", name, value),
                Err(err) => warn!("failed to set initial override '{}': {}", name, err),
            }
        }
        Ok(())
    }

    /// Apply one input row. Per-variable problems are logged and skipped.
    fn apply_inputs(&self, instance: &mut Instance, row: usize) {
        for (name, raw) in self.inputs.entries(row) {
            let descriptor = match self.model.variables.resolve(name) {
                Ok(descriptor) => descriptor,
                Err(err) => {
                    warn!("skipping input column '{}': {}", name, err);
                    continue;
                }
            };
            let value = match Value::decode(descriptor.var_type, raw) {
                Ok(value) => value,
                Err(err) => {
                    warn!("skipping input '{}': {}", name, err);
                    continue;
                }
            };
            match instance.set_value(descriptor, &value) {
                Ok(()) => info!("{} -> {}", name, value),
                Err(err) => warn!("failed to set input '{}': {}", name, err),
            }
        }
    }

    /// Log every non-input variable's current value.
    fn log_state(&self, instance: &Instance) {
        for descriptor in self
            .model
            .variables
            .iter()
            .filter(|v| v.causality != Causality::Input)
        {
            match instance.get_value(descriptor) {
                Ok(value) => info!("[{}] {} = {}", descriptor.causality, descriptor.name, value),
                Err(err) => warn!("could not read '{}': {}", descriptor.name, err),
            }
        }
    }
}
