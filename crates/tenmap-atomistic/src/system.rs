//! Atomic system descriptors
//!
//! Output validation only needs the number of atoms of each system, which is
//! all the [`System`] trait exposes. [`AtomicSystem`] is a simple owned
//! implementation carrying atom types, positions and the unit cell.

use tenmap_core::{Result, TensorMapError};

/// Anything with a number of atoms
pub trait System {
    /// Number of atoms in this system
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Atom types, Cartesian positions and unit cell of one system
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicSystem {
    types: Vec<i32>,
    positions: Vec<[f64; 3]>,
    cell: [[f64; 3]; 3],
}

impl AtomicSystem {
    /// Create a new system. A zero cell describes a non-periodic system.
    ///
    /// # Errors
    ///
    /// Returns [`TensorMapError::LengthMismatch`] if there is not one position
    /// per atom type.
    pub fn new(types: Vec<i32>, positions: Vec<[f64; 3]>, cell: [[f64; 3]; 3]) -> Result<Self> {
        if types.len() != positions.len() {
            return Err(TensorMapError::LengthMismatch {
                what: "atom positions",
                expected: types.len(),
                actual: positions.len(),
            });
        }

        Ok(Self {
            types,
            positions,
            cell,
        })
    }

    /// A non-periodic system
    pub fn non_periodic(types: Vec<i32>, positions: Vec<[f64; 3]>) -> Result<Self> {
        Self::new(types, positions, [[0.0; 3]; 3])
    }

    pub fn types(&self) -> &[i32] {
        &self.types
    }

    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }

    pub fn cell(&self) -> &[[f64; 3]; 3] {
        &self.cell
    }

    pub fn is_periodic(&self) -> bool {
        self.cell.iter().flatten().any(|&x| x != 0.0)
    }
}

impl System for AtomicSystem {
    fn len(&self) -> usize {
        self.types.len()
    }
}

impl<S: System + ?Sized> System for &S {
    fn len(&self) -> usize {
        (**self).len()
    }
}
