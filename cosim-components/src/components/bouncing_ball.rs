//! Bouncing ball component
//!
//! A ball dropped under constant gravity, losing a fraction of its speed at
//! every bounce. The component integrates internally with a fixed substep,
//! so a single communication step can span several bounces.

use cosim_core::component::{Slave, SlaveFactory};
use cosim_core::errors::{CosimError, CosimResult};
use cosim_core::table::Time;
use cosim_core::value::VarType;
use cosim_core::variable::{
    Causality, ModelDescription, ValueReference, VariableDescriptor, VariableRegistry,
};
use serde::{Deserialize, Serialize};

pub const VR_H: ValueReference = 0;
pub const VR_V: ValueReference = 1;
pub const VR_G: ValueReference = 2;
pub const VR_E: ValueReference = 3;

/// Parameters for the bouncing ball component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BouncingBallParameters {
    /// Gravitational acceleration, negative is downward
    /// unit: m / s^2
    pub g: f64,
    /// Fraction of speed retained at each bounce
    pub e: f64,
    /// Initial height
    /// unit: m
    pub h0: f64,
    /// Initial vertical speed
    /// unit: m / s
    pub v0: f64,
    /// Internal integration substep
    /// unit: s
    pub solver_step: f64,
    /// Reject any step starting at or beyond this time, to exercise a
    /// driver's abort path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_after: Option<Time>,
}

impl Default for BouncingBallParameters {
    fn default() -> Self {
        Self {
            g: -9.81,
            e: 0.7,
            h0: 1.0,
            v0: 0.0,
            solver_step: 1e-3,
            fail_after: None,
        }
    }
}

/// Ball state advanced by explicit Euler substeps with a reflecting event at
/// the floor.
#[derive(Debug, Clone)]
pub struct BouncingBall {
    parameters: BouncingBallParameters,
    h: f64,
    v: f64,
}

impl BouncingBall {
    pub fn from_parameters(parameters: BouncingBallParameters) -> Self {
        let h = parameters.h0;
        let v = parameters.v0;
        Self { parameters, h, v }
    }

    /// Advance the state by `dt`, extracted for testability.
    fn advance(&mut self, dt: f64) {
        let mut remaining = dt;
        while remaining > 0.0 {
            let substep = remaining.min(self.parameters.solver_step);
            self.v += self.parameters.g * substep;
            self.h += self.v * substep;
            if self.h < 0.0 {
                self.h = 0.0;
                self.v = -self.v * self.parameters.e;
            }
            remaining -= substep;
        }
    }
}

impl Slave for BouncingBall {
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
        if let Some(fail_after) = self.parameters.fail_after {
            if current_time >= fail_after {
                return Err(CosimError::StepFailed {
                    time: current_time,
                    step_size,
                });
            }
        }
        self.advance(step_size);
        Ok(())
    }

    fn terminate(&mut self) -> CosimResult<()> {
        Ok(())
    }

    fn get_real(&self, reference: ValueReference) -> CosimResult<f64> {
        match reference {
            VR_H => Ok(self.h),
            VR_V => Ok(self.v),
            VR_G => Ok(self.parameters.g),
            VR_E => Ok(self.parameters.e),
            _ => Err(unknown_reference(reference)),
        }
    }

    fn set_real(&mut self, reference: ValueReference, value: f64) -> CosimResult<()> {
        match reference {
            VR_H => self.h = value,
            VR_V => self.v = value,
            VR_G => self.parameters.g = value,
            VR_E => self.parameters.e = value,
            _ => return Err(unknown_reference(reference)),
        }
        Ok(())
    }

    fn get_integer(&self, reference: ValueReference) -> CosimResult<i64> {
        Err(unknown_reference(reference))
    }

    fn set_integer(&mut self, reference: ValueReference, _value: i64) -> CosimResult<()> {
        Err(unknown_reference(reference))
    }

    fn get_boolean(&self, reference: ValueReference) -> CosimResult<bool> {
        Err(unknown_reference(reference))
    }

    fn set_boolean(&mut self, reference: ValueReference, _value: bool) -> CosimResult<()> {
        Err(unknown_reference(reference))
    }

    fn get_string(&self, reference: ValueReference) -> CosimResult<String> {
        Err(unknown_reference(reference))
    }

    fn set_string(&mut self, reference: ValueReference, _value: &str) -> CosimResult<()> {
        Err(unknown_reference(reference))
    }
}

/// Creates a fresh ball per instantiation from a fixed parameter set.
pub struct BouncingBallFactory {
    parameters: BouncingBallParameters,
}

impl BouncingBallFactory {
    pub fn new(parameters: BouncingBallParameters) -> Self {
        Self { parameters }
    }
}

impl Default for BouncingBallFactory {
    fn default() -> Self {
        Self::new(BouncingBallParameters::default())
    }
}

impl SlaveFactory for BouncingBallFactory {
    fn instantiate(
        &self,
        model: &ModelDescription,
        _instance_name: &str,
    ) -> CosimResult<Box<dyn Slave>> {
        if model.model_identifier != "BouncingBall" {
            return Err(CosimError::Instantiation(format!(
                "no implementation for model '{}'",
                model.model_identifier
            )));
        }
        Ok(Box::new(BouncingBall::from_parameters(
            self.parameters.clone(),
        )))
    }
}

/// Metadata matching [`BouncingBall`]'s variables.
pub fn model_description() -> ModelDescription {
    let registry = VariableRegistry::new(vec![
        VariableDescriptor::new("h", VarType::Real, Causality::Output, VR_H),
        VariableDescriptor::new("v", VarType::Real, Causality::Output, VR_V),
        VariableDescriptor::new("g", VarType::Real, Causality::Parameter, VR_G),
        VariableDescriptor::new("e", VarType::Real, Causality::Parameter, VR_E),
    ]);
    ModelDescription::new("BouncingBall", "bouncing-ball-0001", "BouncingBall", registry)
}

fn unknown_reference(reference: ValueReference) -> CosimError {
    CosimError::Error(format!("unknown value reference {}", reference))
}
