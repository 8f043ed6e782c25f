//! Output contract validation
//!
//! [`check_outputs`] verifies that the outputs produced by a model match what
//! was requested, and that standardized outputs (see [`OutputKind`]) follow
//! their metadata layout:
//!
//! - keys are `Labels('_', [[0]])`
//! - samples are `["system"]`, or `["system", "atom"]` for per-atom outputs,
//!   with exactly the entries expected from the systems and selected atoms
//! - there are no components
//! - properties are `Labels('energy', [[0]])` for energies, and
//!   `Labels('energy', [[0], ..., [n - 1]])` for energy ensembles
//! - only `strain` and `positions` gradients are allowed, with their own
//!   samples and components layout
//!
//! Validation stops at the first violation.

use std::collections::BTreeMap;

use tenmap_core::{label_value, Array, DType, Labels, TensorBlock, TensorMap};

use crate::error::{OutputError, Result};
use crate::output::{ModelOutput, OutputKind};
use crate::system::System;

/// Check the outputs of a model against the requested outputs
///
/// `outputs` must contain exactly the names in `requested`. Non-empty outputs
/// must use `expected_dtype`. When `selected_atoms` is given, it must have
/// `["system", "atom"]` names, and restricts the expected samples of standard
/// outputs to these atoms (or the systems containing them, for per-system
/// outputs).
///
/// # Errors
///
/// Returns the first [`OutputError`] found. Outputs are checked in name order:
/// first all produced outputs against the requests, then every request
/// against the produced outputs.
pub fn check_outputs<A: Array, S: System>(
    systems: &[S],
    requested: &BTreeMap<String, ModelOutput>,
    selected_atoms: Option<&Labels>,
    outputs: &BTreeMap<String, TensorMap<A>>,
    expected_dtype: DType,
) -> Result<()> {
    for (name, output) in outputs {
        if !requested.contains_key(name) {
            return Err(OutputError::UnrequestedOutput(name.clone()));
        }

        if let Some(block) = output.blocks().first() {
            let actual = block.values().dtype();
            if actual != expected_dtype {
                return Err(OutputError::DtypeMismatch {
                    name: name.clone(),
                    expected: expected_dtype,
                    actual,
                });
            }
        }
    }

    for (name, request) in requested {
        let output = outputs
            .get(name)
            .ok_or_else(|| OutputError::MissingOutput(name.clone()))?;

        match OutputKind::from_name(name) {
            kind @ (OutputKind::Energy | OutputKind::EnergyEnsemble) => {
                check_energy_like(&kind, output, systems, request, selected_atoms)?;
            }
            OutputKind::Custom(_) => {
                tracing::debug!(output = %name, "skipping checks for custom output");
                continue;
            }
        }

        tracing::debug!(output = %name, per_atom = request.per_atom, "output checked");
    }

    Ok(())
}

fn xyz(name: &str) -> Result<Labels> {
    Ok(Labels::range(name, 3)?)
}

fn expected_samples<S: System>(
    systems: &[S],
    per_atom: bool,
    selected_atoms: Option<&Labels>,
) -> Result<Labels> {
    if per_atom {
        let mut values = Vec::new();
        for (s, system) in systems.iter().enumerate() {
            let s = label_value(s)?;
            for a in 0..system.len() {
                values.push(s);
                values.push(label_value(a)?);
            }
        }
        let all = Labels::from_flat(&["system", "atom"], values)?;

        match selected_atoms {
            Some(selected) => Ok(all.intersection(selected)?),
            None => Ok(all),
        }
    } else {
        let all = Labels::range("system", systems.len())?;

        match selected_atoms {
            Some(selected) => {
                let selected_systems = selected.select(&["system"])?.unique();
                Ok(all.intersection(&selected_systems)?)
            }
            None => Ok(all),
        }
    }
}

fn check_energy_like<A: Array, S: System>(
    kind: &OutputKind,
    output: &TensorMap<A>,
    systems: &[S],
    request: &ModelOutput,
    selected_atoms: Option<&Labels>,
) -> Result<()> {
    let name = kind.name();

    if output.keys() != &Labels::single() {
        return Err(OutputError::InvalidKeys {
            name: name.to_string(),
        });
    }
    let block = output.block_by_id(0)?;

    let expected_names: &[&str] = if request.per_atom {
        &["system", "atom"]
    } else {
        &["system"]
    };
    if block.samples().names() != expected_names {
        return Err(OutputError::samples(
            name,
            format!(
                "expected the names to be {expected_names:?}, got {:?}",
                block.samples().names()
            ),
        ));
    }

    let expected = expected_samples(systems, request.per_atom, selected_atoms)?;
    let all_expected = block.samples().iter().all(|entry| expected.contains(entry));
    if !all_expected || block.samples().len() != expected.len() {
        return Err(OutputError::samples(
            name,
            format!(
                "the entries do not match the `systems` and `selected_atoms`. \
                Expected samples:\n{expected}"
            ),
        ));
    }

    if !block.components().is_empty() {
        return Err(OutputError::components(name, "components should be empty"));
    }

    let (expected_properties, message) = match kind {
        OutputKind::EnergyEnsemble => {
            let n_members = block.values().shape().last().copied().unwrap_or(0);
            (
                Labels::range("energy", n_members)?,
                "`Labels('energy', [[0], ..., [n]])`",
            )
        }
        _ => (Labels::range("energy", 1)?, "`Labels('energy', [[0]])`"),
    };
    if block.properties() != &expected_properties {
        return Err(OutputError::InvalidProperties {
            name: name.to_string(),
            expected: message.to_string(),
        });
    }

    for (parameter, gradient) in block.gradients() {
        match parameter {
            "strain" => check_strain_gradient(name, gradient)?,
            "positions" => check_positions_gradient(name, gradient)?,
            other => {
                return Err(OutputError::InvalidGradient {
                    name: name.to_string(),
                    parameter: other.to_string(),
                })
            }
        }
    }

    Ok(())
}

fn check_strain_gradient<A: Array>(name: &str, gradient: &TensorBlock<A>) -> Result<()> {
    if gradient.samples().names() != ["sample"] {
        return Err(OutputError::samples(
            name,
            format!(
                "'strain' gradients: expected the names to be [\"sample\"], got {:?}",
                gradient.samples().names()
            ),
        ));
    }

    let components = gradient.components();
    if components.len() != 2 {
        return Err(OutputError::components(
            name,
            "'strain' gradients: expected two components",
        ));
    }

    if *components[0] != xyz("xyz_1")? {
        return Err(OutputError::components(
            name,
            "'strain' gradients: expected Labels('xyz_1', [[0], [1], [2]]) for the first component",
        ));
    }

    if *components[1] != xyz("xyz_2")? {
        return Err(OutputError::components(
            name,
            "'strain' gradients: expected Labels('xyz_2', [[0], [1], [2]]) for the second component",
        ));
    }

    Ok(())
}

fn check_positions_gradient<A: Array>(name: &str, gradient: &TensorBlock<A>) -> Result<()> {
    if gradient.samples().names() != ["sample", "system", "atom"] {
        return Err(OutputError::samples(
            name,
            format!(
                "'positions' gradients: expected the names to be [\"sample\", \"system\", \"atom\"], got {:?}",
                gradient.samples().names()
            ),
        ));
    }

    let components = gradient.components();
    if components.len() != 1 {
        return Err(OutputError::components(
            name,
            "'positions' gradients: expected one component",
        ));
    }

    if *components[0] != xyz("xyz")? {
        return Err(OutputError::components(
            name,
            "'positions' gradients: expected Labels('xyz', [[0], [1], [2]]) for the first component",
        ));
    }

    Ok(())
}
