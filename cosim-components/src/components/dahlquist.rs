//! Dahlquist test equation component
//!
//! Integrates x' = -k·x with explicit Euler at a fixed internal substep.
//! With the default k = 1 and substep 0.1, two communication steps of 0.5
//! give x = 0.9^10 from x0 = 1, which is handy as a closed-form check.

use cosim_core::component::{Slave, SlaveFactory};
use cosim_core::errors::{CosimError, CosimResult};
use cosim_core::table::Time;
use cosim_core::value::VarType;
use cosim_core::variable::{
    Causality, ModelDescription, ValueReference, VariableDescriptor, VariableRegistry,
};
use serde::{Deserialize, Serialize};

pub const VR_X: ValueReference = 0;
pub const VR_K: ValueReference = 1;

/// Parameters for the Dahlquist component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DahlquistParameters {
    /// Decay rate
    /// unit: 1 / s
    pub k: f64,
    /// Initial state
    pub x0: f64,
    /// Internal integration substep
    /// unit: s
    pub solver_step: f64,
}

impl Default for DahlquistParameters {
    fn default() -> Self {
        Self {
            k: 1.0,
            x0: 1.0,
            solver_step: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dahlquist {
    parameters: DahlquistParameters,
    x: f64,
}

impl Dahlquist {
    pub fn from_parameters(parameters: DahlquistParameters) -> Self {
        let x = parameters.x0;
        Self { parameters, x }
    }
}

impl Slave for Dahlquist {
    fn setup_experiment(&mut self, _start_time: Time) -> CosimResult<()> {
        Ok(())
    }

    fn enter_initialization_mode(&mut self) -> CosimResult<()> {
        Ok(())
    }

    fn exit_initialization_mode(&mut self) -> CosimResult<()> {
        Ok(())
    }

    fn do_step(&mut self, _current_time: Time, step_size: Time) -> CosimResult<()> {
        let mut remaining = step_size;
        while remaining > 0.0 {
            let substep = remaining.min(self.parameters.solver_step);
            self.x *= 1.0 - self.parameters.k * substep;
            remaining -= substep;
        }
        Ok(())
    }

    fn terminate(&mut self) -> CosimResult<()> {
        Ok(())
    }

    fn get_real(&self, reference: ValueReference) -> CosimResult<f64> {
        match reference {
            VR_X => Ok(self.x),
            VR_K => Ok(self.parameters.k),
            _ => Err(unknown_reference(reference)),
        }
    }

    fn set_real(&mut self, reference: ValueReference, value: f64) -> CosimResult<()> {
        match reference {
            VR_X => self.x = value,
            VR_K => self.parameters.k = value,
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

pub struct DahlquistFactory {
    parameters: DahlquistParameters,
}

impl DahlquistFactory {
    pub fn new(parameters: DahlquistParameters) -> Self {
        Self { parameters }
    }
}

impl Default for DahlquistFactory {
    fn default() -> Self {
        Self::new(DahlquistParameters::default())
    }
}

impl SlaveFactory for DahlquistFactory {
    fn instantiate(
        &self,
        model: &ModelDescription,
        _instance_name: &str,
    ) -> CosimResult<Box<dyn Slave>> {
        if model.model_identifier != "Dahlquist" {
            return Err(CosimError::Instantiation(format!(
                "no implementation for model '{}'",
                model.model_identifier
            )));
        }
        Ok(Box::new(Dahlquist::from_parameters(
            self.parameters.clone(),
        )))
    }
}

/// Metadata matching [`Dahlquist`]'s variables.
pub fn model_description() -> ModelDescription {
    let registry = VariableRegistry::new(vec![
        VariableDescriptor::new("x", VarType::Real, Causality::Output, VR_X),
        VariableDescriptor::new("k", VarType::Real, Causality::Parameter, VR_K),
    ]);
    ModelDescription::new("Dahlquist", "dahlquist-0001", "Dahlquist", registry)
}

fn unknown_reference(reference: ValueReference) -> CosimError {
    CosimError::Error(format!("unknown value reference {}", reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn two_half_steps_match_the_closed_form() {
        let mut slave = Dahlquist::from_parameters(DahlquistParameters::default());
        slave.do_step(0.0, 0.5).unwrap();
        slave.do_step(0.5, 0.5).unwrap();

        let x = slave.get_real(VR_X).unwrap();
        assert!(is_close!(x, 0.9_f64.powi(10)), "x={}", x);
    }

    #[test]
    fn decay_is_monotonic() {
        let mut slave = Dahlquist::from_parameters(DahlquistParameters::default());
        let mut previous = slave.get_real(VR_X).unwrap();
        for i in 0..5 {
            slave.do_step(i as f64 * 0.5, 0.5).unwrap();
            let x = slave.get_real(VR_X).unwrap();
            assert!(x < previous);
            assert!(x > 0.0);
            previous = x;
        }
    }

    #[test]
    fn rate_parameter_is_settable() {
        let mut slave = Dahlquist::from_parameters(DahlquistParameters::default());
        slave.set_real(VR_K, 0.0).unwrap();
        slave.do_step(0.0, 1.0).unwrap();
        assert_eq!(slave.get_real(VR_X).unwrap(), 1.0);
    }
}
