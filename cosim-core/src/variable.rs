//! Variable metadata and the name-keyed registry.
//!
//! A model's metadata declares its variables once; the registry indexes them
//! by name and is read-only afterwards. A descriptor's value reference plus
//! its declared type uniquely determine how the lifecycle adapter marshals
//! values for that variable.

use crate::errors::{CosimError, CosimResult};
use crate::value::VarType;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque integer key understood by the component's typed accessors.
pub type ValueReference = u32;

/// A variable's role as declared by the model metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Causality {
    /// Values that are set from outside of the component
    Input,
    /// Values that are calculated within the component
    Output,
    /// Fixed values configured before initialization
    Parameter,
    /// Anything else the metadata may declare (local, independent, ...)
    Other,
}

impl fmt::Display for Causality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Causality::Input => write!(f, "input"),
            Causality::Output => write!(f, "output"),
            Causality::Parameter => write!(f, "parameter"),
            Causality::Other => write!(f, "other"),
        }
    }
}

impl FromStr for Causality {
    type Err = std::convert::Infallible;

    /// Metadata declares a long tail of causality kinds; everything beyond
    /// input/output/parameter collapses into [`Causality::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "input" => Causality::Input,
            "output" => Causality::Output,
            "parameter" => Causality::Parameter,
            _ => Causality::Other,
        })
    }
}

/// Identity record for one variable, owned by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    /// Unique name within the model
    pub name: String,
    /// Value domain; fixes which accessor pair the adapter dispatches to
    pub var_type: VarType,
    pub causality: Causality,
    /// Key passed to the component's typed accessors
    pub value_reference: ValueReference,
}

impl VariableDescriptor {
    pub fn new(
        name: impl Into<String>,
        var_type: VarType,
        causality: Causality,
        value_reference: ValueReference,
    ) -> Self {
        Self {
            name: name.into(),
            var_type,
            causality,
            value_reference,
        }
    }
}

/// Name-keyed index over a model's variable descriptors.
///
/// Lookup is a linear scan; names are unique by construction of the model, so
/// no ordering across ties can arise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariableRegistry {
    variables: Vec<VariableDescriptor>,
}

impl VariableRegistry {
    /// Build a registry from descriptors.
    ///
    /// Panics if two descriptors share a name
    pub fn new(variables: Vec<VariableDescriptor>) -> Self {
        let mut registry = Self::default();
        variables
            .into_iter()
            .for_each(|descriptor| registry.push(descriptor));
        registry
    }

    /// Add a descriptor to the registry.
    ///
    /// Panics if a descriptor with the same name already exists
    pub fn push(&mut self, descriptor: VariableDescriptor) {
        self.variables.iter().for_each(|x| {
            if x.name == descriptor.name {
                panic!("variable {} already exists", descriptor.name)
            }
        });
        self.variables.push(descriptor);
    }

    /// Build a registry from raw metadata tuples of
    /// `(name, declared type, causality, value reference)`.
    ///
    /// Variables with a declared type outside the supported kinds are logged
    /// and skipped; they never abort registry construction.
    pub fn from_raw<'a, I>(raw: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str, ValueReference)>,
    {
        let mut registry = Self::default();
        for (name, declared, causality, value_reference) in raw {
            match declared.parse::<VarType>() {
                Ok(var_type) => registry.push(VariableDescriptor::new(
                    name,
                    var_type,
                    causality.parse().unwrap_or(Causality::Other),
                    value_reference,
                )),
                Err(err) => warn!("skipping variable '{}': {}", name, err),
            }
        }
        registry
    }

    /// Look a variable up by name.
    pub fn resolve(&self, name: &str) -> CosimResult<&VariableDescriptor> {
        self.variables
            .iter()
            .find(|x| x.name == name)
            .ok_or_else(|| CosimError::UnknownVariable(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&VariableDescriptor> {
        self.variables.iter().find(|x| x.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableDescriptor> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Model identity plus its variable registry, as produced by the metadata
/// extraction collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescription {
    pub model_name: String,
    /// Identity token checked by component factories on instantiation
    pub guid: String,
    /// Identifier of the component implementation to bind to
    pub model_identifier: String,
    pub variables: VariableRegistry,
}

impl ModelDescription {
    pub fn new(
        model_name: impl Into<String>,
        guid: impl Into<String>,
        model_identifier: impl Into<String>,
        variables: VariableRegistry,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            guid: guid.into(),
            model_identifier: model_identifier.into(),
            variables,
        }
    }
}
