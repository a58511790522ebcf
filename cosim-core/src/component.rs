//! The interface to the simulated component and the lifecycle adapter that
//! drives it.
//!
//! A co-simulation component is stateful and phase-sensitive: it must be
//! instantiated, given its experiment window, initialized, stepped, and
//! terminated in exactly that order. [`Instance`] wraps a boxed [`Slave`] and
//! enforces the ordering, and its `Drop` guarantees the component is released
//! exactly once on every exit path of a run.

use crate::errors::{CosimError, CosimResult};
use crate::table::Time;
use crate::value::{Value, VarType};
use crate::variable::{ModelDescription, ValueReference, VariableDescriptor};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The externally supplied simulated unit.
///
/// Implementations expose the standard phased lifecycle and per-type
/// single-value accessors keyed by the component's opaque value reference.
/// Only single-element access exists at this layer; there is no batch form.
pub trait Slave {
    fn setup_experiment(&mut self, start_time: Time) -> CosimResult<()>;
    fn enter_initialization_mode(&mut self) -> CosimResult<()>;
    fn exit_initialization_mode(&mut self) -> CosimResult<()>;

    /// Advance the component by `step_size` from `current_time`.
    ///
    /// A rejected step (internal solver divergence, out-of-range state) is
    /// [`CosimError::StepFailed`]; it is surfaced, never retried.
    fn do_step(&mut self, current_time: Time, step_size: Time) -> CosimResult<()>;

    fn terminate(&mut self) -> CosimResult<()>;

    fn get_real(&self, reference: ValueReference) -> CosimResult<f64>;
    fn set_real(&mut self, reference: ValueReference, value: f64) -> CosimResult<()>;
    fn get_integer(&self, reference: ValueReference) -> CosimResult<i64>;
    fn set_integer(&mut self, reference: ValueReference, value: i64) -> CosimResult<()>;
    fn get_boolean(&self, reference: ValueReference) -> CosimResult<bool>;
    fn set_boolean(&mut self, reference: ValueReference, value: bool) -> CosimResult<()>;
    fn get_string(&self, reference: ValueReference) -> CosimResult<String>;
    fn set_string(&mut self, reference: ValueReference, value: &str) -> CosimResult<()>;
}

/// Binds model identity to a fresh component instance.
pub trait SlaveFactory {
    /// Create a new instance of the component implementation named by the
    /// model description.
    ///
    /// Fails with [`CosimError::Instantiation`] if the component cannot be
    /// created (wrong identity token, missing implementation, ...).
    fn instantiate(
        &self,
        model: &ModelDescription,
        instance_name: &str,
    ) -> CosimResult<Box<dyn Slave>>;
}

/// Lifecycle phase of an [`Instance`].
///
/// Transitions are one-way: `Instantiated` → `InitializationMode` → `Running`
/// → `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Instantiated,
    InitializationMode,
    Running,
    Terminated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Instantiated => write!(f, "Instantiated"),
            Phase::InitializationMode => write!(f, "InitializationMode"),
            Phase::Running => write!(f, "Running"),
            Phase::Terminated => write!(f, "Terminated"),
        }
    }
}

/// One live component instance plus its phase bookkeeping.
///
/// Initial overrides must be applied strictly between instantiation and
/// [`Instance::enter_initialization_mode`]; the typed accessors refuse to
/// touch a terminated instance. Dropping an instance terminates a still-live
/// component, so release happens on failure paths without any explicit
/// cleanup code in the driver.
pub struct Instance {
    slave: Box<dyn Slave>,
    phase: Phase,
    experiment_defined: bool,
    name: String,
}

impl Instance {
    /// Create and bind a fresh component instance.
    pub fn instantiate(
        factory: &dyn SlaveFactory,
        model: &ModelDescription,
        instance_name: &str,
    ) -> CosimResult<Self> {
        let slave = factory.instantiate(model, instance_name)?;
        debug!(
            "instantiated '{}' of model '{}'",
            instance_name, model.model_identifier
        );
        Ok(Self {
            slave,
            phase: Phase::Instantiated,
            experiment_defined: false,
            name: instance_name.to_string(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare the simulation start time. Must precede
    /// [`Instance::enter_initialization_mode`].
    pub fn setup_experiment(&mut self, start_time: Time) -> CosimResult<()> {
        self.expect_phase("setup_experiment", Phase::Instantiated)?;
        self.slave.setup_experiment(start_time)?;
        self.experiment_defined = true;
        Ok(())
    }

    pub fn enter_initialization_mode(&mut self) -> CosimResult<()> {
        self.expect_phase("enter_initialization_mode", Phase::Instantiated)?;
        if !self.experiment_defined {
            return Err(CosimError::InvalidPhase {
                operation: "enter_initialization_mode before setup_experiment",
                phase: self.phase,
            });
        }
        self.slave.enter_initialization_mode()?;
        self.phase = Phase::InitializationMode;
        Ok(())
    }

    pub fn exit_initialization_mode(&mut self) -> CosimResult<()> {
        self.expect_phase("exit_initialization_mode", Phase::InitializationMode)?;
        self.slave.exit_initialization_mode()?;
        self.phase = Phase::Running;
        Ok(())
    }

    /// Advance the component by `step_size` from `current_time`.
    pub fn do_step(&mut self, current_time: Time, step_size: Time) -> CosimResult<()> {
        self.expect_phase("do_step", Phase::Running)?;
        self.slave.do_step(current_time, step_size)
    }

    pub fn terminate(&mut self) -> CosimResult<()> {
        if self.phase == Phase::Terminated {
            return Err(CosimError::InvalidPhase {
                operation: "terminate",
                phase: self.phase,
            });
        }
        self.slave.terminate()?;
        self.phase = Phase::Terminated;
        Ok(())
    }

    /// Write a typed value through the accessor matching the descriptor's
    /// declared type.
    ///
    /// The value's tag must equal the declared type; mixing tags is a
    /// [`CosimError::TypeMismatch`], never a silent coercion.
    pub fn set_value(&mut self, descriptor: &VariableDescriptor, value: &Value) -> CosimResult<()> {
        self.expect_live("set_value")?;
        if value.var_type() != descriptor.var_type {
            return Err(CosimError::TypeMismatch {
                variable: descriptor.name.clone(),
                declared: descriptor.var_type,
                actual: value.var_type(),
            });
        }
        match value {
            Value::Real(v) => self.slave.set_real(descriptor.value_reference, *v),
            Value::Integer(v) => self.slave.set_integer(descriptor.value_reference, *v),
            Value::Boolean(v) => self.slave.set_boolean(descriptor.value_reference, *v),
            Value::String(v) => self.slave.set_string(descriptor.value_reference, v),
        }
    }

    /// Read a variable back as a value tagged with its declared type.
    pub fn get_value(&self, descriptor: &VariableDescriptor) -> CosimResult<Value> {
        self.expect_live("get_value")?;
        match descriptor.var_type {
            VarType::Real => self
                .slave
                .get_real(descriptor.value_reference)
                .map(Value::Real),
            VarType::Integer => self
                .slave
                .get_integer(descriptor.value_reference)
                .map(Value::Integer),
            VarType::Boolean => self
                .slave
                .get_boolean(descriptor.value_reference)
                .map(Value::Boolean),
            VarType::String => self
                .slave
                .get_string(descriptor.value_reference)
                .map(Value::String),
        }
    }

    fn expect_phase(&self, operation: &'static str, expected: Phase) -> CosimResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(CosimError::InvalidPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    fn expect_live(&self, operation: &'static str) -> CosimResult<()> {
        if self.phase == Phase::Terminated {
            Err(CosimError::InvalidPhase {
                operation,
                phase: self.phase,
            })
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .finish()
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        if self.phase != Phase::Terminated {
            if let Err(err) = self.slave.terminate() {
                warn!("terminating '{}' on release failed: {}", self.name, err);
            }
            self.phase = Phase::Terminated;
        }
    }
}
