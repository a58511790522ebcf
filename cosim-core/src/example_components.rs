#![allow(dead_code)]

//! Minimal in-crate slaves used by the driver's own tests.
//!
//! `EchoSlave` stores whatever is set per value reference and reads it back,
//! so outputs aliased to an input's reference behave as an instant
//! feedthrough. The factory shares a termination counter with every instance
//! it creates, which is what the release-discipline tests observe.

use crate::component::{Slave, SlaveFactory};
use crate::errors::{CosimError, CosimResult};
use crate::table::Time;
use crate::value::VarType;
use crate::variable::{
    Causality, ModelDescription, ValueReference, VariableDescriptor, VariableRegistry,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

pub(crate) struct EchoSlave {
    reals: HashMap<ValueReference, f64>,
    integers: HashMap<ValueReference, i64>,
    booleans: HashMap<ValueReference, bool>,
    strings: HashMap<ValueReference, String>,
    /// 1-based index of the `do_step` call that fails, if any
    fail_at_step: Option<usize>,
    steps_taken: usize,
    terminations: Rc<Cell<usize>>,
}

impl EchoSlave {
    fn new(fail_at_step: Option<usize>, terminations: Rc<Cell<usize>>) -> Self {
        Self {
            reals: HashMap::new(),
            integers: HashMap::new(),
            booleans: HashMap::new(),
            strings: HashMap::new(),
            fail_at_step,
            steps_taken: 0,
            terminations,
        }
    }
}

impl Slave for EchoSlave {
    fn setup_experiment(&mut self, _start_time: Time) -> CosimResult<()> {
        Ok(())
    }

    fn enter_initialization_mode(&mut self) -> CosimResult<()> {
        Ok(())
    }

    fn exit_initialization_mode(&mut self) -> CosimResult<()> {
        Ok(())
    }

    fn do_step(&mut self, current_time: Time, step_size: Time) -> CosimResult<()> {
        self.steps_taken += 1;
        if self.fail_at_step == Some(self.steps_taken) {
            return Err(CosimError::StepFailed {
                time: current_time,
                step_size,
            });
        }
        Ok(())
    }

    fn terminate(&mut self) -> CosimResult<()> {
        self.terminations.set(self.terminations.get() + 1);
        Ok(())
    }

    fn get_real(&self, reference: ValueReference) -> CosimResult<f64> {
        Ok(self.reals.get(&reference).copied().unwrap_or_default())
    }

    fn set_real(&mut self, reference: ValueReference, value: f64) -> CosimResult<()> {
        self.reals.insert(reference, value);
        Ok(())
    }

    fn get_integer(&self, reference: ValueReference) -> CosimResult<i64> {
        Ok(self.integers.get(&reference).copied().unwrap_or_default())
    }

    fn set_integer(&mut self, reference: ValueReference, value: i64) -> CosimResult<()> {
        self.integers.insert(reference, value);
        Ok(())
    }

    fn get_boolean(&self, reference: ValueReference) -> CosimResult<bool> {
        Ok(self.booleans.get(&reference).copied().unwrap_or_default())
    }

    fn set_boolean(&mut self, reference: ValueReference, value: bool) -> CosimResult<()> {
        self.booleans.insert(reference, value);
        Ok(())
    }

    fn get_string(&self, reference: ValueReference) -> CosimResult<String> {
        Ok(self.strings.get(&reference).cloned().unwrap_or_default())
    }

    fn set_string(&mut self, reference: ValueReference, value: &str) -> CosimResult<()> {
        self.strings.insert(reference, value.to_string());
        Ok(())
    }
}

/// Clones share the termination counter, so a clone kept outside a runner
/// observes the instances the runner creates.
#[derive(Clone, Default)]
pub(crate) struct EchoFactory {
    pub fail_at_step: Option<usize>,
    pub refuse_instantiation: bool,
    pub(crate) terminations: Rc<Cell<usize>>,
}

impl EchoFactory {
    pub fn failing_at_step(step: usize) -> Self {
        Self {
            fail_at_step: Some(step),
            ..Self::default()
        }
    }

    /// Total `terminate` calls across every instance this factory created.
    pub fn terminations(&self) -> usize {
        self.terminations.get()
    }
}

impl SlaveFactory for EchoFactory {
    fn instantiate(
        &self,
        model: &ModelDescription,
        _instance_name: &str,
    ) -> CosimResult<Box<dyn Slave>> {
        if self.refuse_instantiation {
            return Err(CosimError::Instantiation(format!(
                "no implementation for model '{}'",
                model.model_identifier
            )));
        }
        Ok(Box::new(EchoSlave::new(
            self.fail_at_step,
            Rc::clone(&self.terminations),
        )))
    }
}

/// Model metadata for [`EchoSlave`]: each output aliases its input's value
/// reference, so a set followed by a get echoes the value back.
pub(crate) fn echo_model() -> ModelDescription {
    let registry = VariableRegistry::new(vec![
        VariableDescriptor::new("u_real", VarType::Real, Causality::Input, 1),
        VariableDescriptor::new("y_real", VarType::Real, Causality::Output, 1),
        VariableDescriptor::new("u_int", VarType::Integer, Causality::Input, 2),
        VariableDescriptor::new("y_int", VarType::Integer, Causality::Output, 2),
        VariableDescriptor::new("u_bool", VarType::Boolean, Causality::Input, 3),
        VariableDescriptor::new("y_bool", VarType::Boolean, Causality::Output, 3),
        VariableDescriptor::new("label", VarType::String, Causality::Parameter, 4),
    ]);
    ModelDescription::new("Echo", "echo-guid", "echo", registry)
}
