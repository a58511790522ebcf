//! Typed feedthrough component
//!
//! Echoes every input to the output of the same type, one variable per
//! supported domain. Useful for exercising the full codec and accessor
//! dispatch of a driver without any dynamics.

use cosim_core::component::{Slave, SlaveFactory};
use cosim_core::errors::{CosimError, CosimResult};
use cosim_core::table::Time;
use cosim_core::value::VarType;
use cosim_core::variable::{
    Causality, ModelDescription, ValueReference, VariableDescriptor, VariableRegistry,
};

pub const VR_REAL_INPUT: ValueReference = 1;
pub const VR_REAL_OUTPUT: ValueReference = 2;
pub const VR_INTEGER_INPUT: ValueReference = 3;
pub const VR_INTEGER_OUTPUT: ValueReference = 4;
pub const VR_BOOLEAN_INPUT: ValueReference = 5;
pub const VR_BOOLEAN_OUTPUT: ValueReference = 6;
pub const VR_STRING_PARAMETER: ValueReference = 7;

/// Pass-through of one variable per value domain.
///
/// Outputs read the current value of the matching input; there is no
/// internal state to advance, so stepping is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Feedthrough {
    real_input: f64,
    integer_input: i64,
    boolean_input: bool,
    string_parameter: String,
}

impl Feedthrough {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Slave for Feedthrough {
    fn setup_experiment(&mut self, _start_time: Time) -> CosimResult<()> {
        Ok(())
    }

    fn enter_initialization_mode(&mut self) -> CosimResult<()> {
        Ok(())
    }

    fn exit_initialization_mode(&mut self) -> CosimResult<()> {
        Ok(())
    }

    fn do_step(&mut self, _current_time: Time, _step_size: Time) -> CosimResult<()> {
        Ok(())
    }

    fn terminate(&mut self) -> CosimResult<()> {
        Ok(())
    }

    fn get_real(&self, reference: ValueReference) -> CosimResult<f64> {
        match reference {
            VR_REAL_INPUT | VR_REAL_OUTPUT => Ok(self.real_input),
            _ => Err(unknown_reference(reference)),
        }
    }

    fn set_real(&mut self, reference: ValueReference, value: f64) -> CosimResult<()> {
        match reference {
            VR_REAL_INPUT => {
                self.real_input = value;
                Ok(())
            }
            _ => Err(unknown_reference(reference)),
        }
    }

    fn get_integer(&self, reference: ValueReference) -> CosimResult<i64> {
        match reference {
            VR_INTEGER_INPUT | VR_INTEGER_OUTPUT => Ok(self.integer_input),
            _ => Err(unknown_reference(reference)),
        }
    }

    fn set_integer(&mut self, reference: ValueReference, value: i64) -> CosimResult<()> {
        match reference {
            VR_INTEGER_INPUT => {
                self.integer_input = value;
                Ok(())
            }
            _ => Err(unknown_reference(reference)),
        }
    }

    fn get_boolean(&self, reference: ValueReference) -> CosimResult<bool> {
        match reference {
            VR_BOOLEAN_INPUT | VR_BOOLEAN_OUTPUT => Ok(self.boolean_input),
            _ => Err(unknown_reference(reference)),
        }
    }

    fn set_boolean(&mut self, reference: ValueReference, value: bool) -> CosimResult<()> {
        match reference {
            VR_BOOLEAN_INPUT => {
                self.boolean_input = value;
                Ok(())
            }
            _ => Err(unknown_reference(reference)),
        }
    }

    fn get_string(&self, reference: ValueReference) -> CosimResult<String> {
        match reference {
            VR_STRING_PARAMETER => Ok(self.string_parameter.clone()),
            _ => Err(unknown_reference(reference)),
        }
    }

    fn set_string(&mut self, reference: ValueReference, value: &str) -> CosimResult<()> {
        match reference {
            VR_STRING_PARAMETER => {
                self.string_parameter = value.to_string();
                Ok(())
            }
            _ => Err(unknown_reference(reference)),
        }
    }
}

pub struct FeedthroughFactory;

impl SlaveFactory for FeedthroughFactory {
    fn instantiate(
        &self,
        model: &ModelDescription,
        _instance_name: &str,
    ) -> CosimResult<Box<dyn Slave>> {
        if model.model_identifier != "Feedthrough" {
            return Err(CosimError::Instantiation(format!(
                "no implementation for model '{}'",
                model.model_identifier
            )));
        }
        Ok(Box::new(Feedthrough::new()))
    }
}

/// Metadata matching [`Feedthrough`]'s variables.
pub fn model_description() -> ModelDescription {
    let registry = VariableRegistry::new(vec![
        VariableDescriptor::new("real_input", VarType::Real, Causality::Input, VR_REAL_INPUT),
        VariableDescriptor::new(
            "real_output",
            VarType::Real,
            Causality::Output,
            VR_REAL_OUTPUT,
        ),
        VariableDescriptor::new(
            "integer_input",
            VarType::Integer,
            Causality::Input,
            VR_INTEGER_INPUT,
        ),
        VariableDescriptor::new(
            "integer_output",
            VarType::Integer,
            Causality::Output,
            VR_INTEGER_OUTPUT,
        ),
        VariableDescriptor::new(
            "boolean_input",
            VarType::Boolean,
            Causality::Input,
            VR_BOOLEAN_INPUT,
        ),
        VariableDescriptor::new(
            "boolean_output",
            VarType::Boolean,
            Causality::Output,
            VR_BOOLEAN_OUTPUT,
        ),
        VariableDescriptor::new(
            "string_parameter",
            VarType::String,
            Causality::Parameter,
            VR_STRING_PARAMETER,
        ),
    ]);
    ModelDescription::new("Feedthrough", "feedthrough-0001", "Feedthrough", registry)
}

fn unknown_reference(reference: ValueReference) -> CosimError {
    CosimError::Error(format!("unknown value reference {}", reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_mirror_inputs() {
        let mut slave = Feedthrough::new();
        slave.set_real(VR_REAL_INPUT, 10.5).unwrap();
        slave.set_integer(VR_INTEGER_INPUT, -3).unwrap();
        slave.set_boolean(VR_BOOLEAN_INPUT, true).unwrap();

        assert_eq!(slave.get_real(VR_REAL_OUTPUT).unwrap(), 10.5);
        assert_eq!(slave.get_integer(VR_INTEGER_OUTPUT).unwrap(), -3);
        assert!(slave.get_boolean(VR_BOOLEAN_OUTPUT).unwrap());
    }

    #[test]
    fn outputs_are_not_settable() {
        let mut slave = Feedthrough::new();
        assert!(slave.set_real(VR_REAL_OUTPUT, 1.0).is_err());
    }

    #[test]
    fn factory_checks_model_identity() {
        let model = model_description();
        assert!(FeedthroughFactory.instantiate(&model, "instance1").is_ok());

        let mut other = model_description();
        other.model_identifier = "SomethingElse".to_string();
        assert!(matches!(
            FeedthroughFactory.instantiate(&other, "instance1"),
            Err(CosimError::Instantiation(_))
        ));
    }

    #[test]
    fn metadata_matches_accessors() {
        let model = model_description();
        let descriptor = model.variables.resolve("real_output").unwrap();
        assert_eq!(descriptor.var_type, VarType::Real);
        assert_eq!(descriptor.causality, Causality::Output);
        assert_eq!(descriptor.value_reference, VR_REAL_OUTPUT);
    }
}
