//! Requested model outputs
//!
//! A model is asked for a set of named outputs, each described by a
//! [`ModelOutput`]. The output name determines its [`OutputKind`]: a few names
//! have a standardized metadata layout which is enforced by
//! [`check_outputs`](crate::check_outputs), every other name is a custom
//! output.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Description of one output requested from a model
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOutput {
    /// Physical quantity of this output (e.g. `"energy"`), empty if unknown
    pub quantity: String,
    /// Unit of the output values, empty if unknown
    pub unit: String,
    /// Whether the output is computed per atom or per system
    pub per_atom: bool,
    /// Parameters with respect to which gradients are computed explicitly
    pub explicit_gradients: Vec<String>,
}

impl ModelOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = quantity.into();
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn per_atom(mut self, per_atom: bool) -> Self {
        self.per_atom = per_atom;
        self
    }

    pub fn explicit_gradients<S: Into<String>>(mut self, gradients: impl IntoIterator<Item = S>) -> Self {
        self.explicit_gradients = gradients.into_iter().map(Into::into).collect();
        self
    }
}

/// Kind of a model output, derived from its name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// `"energy"`: one energy per system or per atom
    Energy,
    /// `"energy_ensemble"`: several energy predictions per system or per atom
    EnergyEnsemble,
    /// Any other name, not validated
    Custom(String),
}

impl OutputKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "energy" => OutputKind::Energy,
            "energy_ensemble" => OutputKind::EnergyEnsemble,
            other => OutputKind::Custom(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            OutputKind::Energy => "energy",
            OutputKind::EnergyEnsemble => "energy_ensemble",
            OutputKind::Custom(name) => name,
        }
    }

    /// Whether outputs of this kind have a standardized metadata layout
    pub fn is_standard(&self) -> bool {
        !matches!(self, OutputKind::Custom(_))
    }
}

impl FromStr for OutputKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(OutputKind::from_name(s))
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
