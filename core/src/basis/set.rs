use std::collections::HashMap;

use crate::{
    atom::Atom, basis::BasisFunction, error::Error, molecule::Molecule,
    periodic_table::ElementType,
};

use super::ContractedGaussian;

#[derive(Debug)]
pub struct BasisSet {
    atomic_mapping: HashMap<ElementType, AtomicBasis>,
}

impl BasisSet {
    /// Returns the basis of a given atom, if it exists.
    pub fn for_atom(&self, atom: &Atom) -> Option<&AtomicBasis> {
        self.atomic_mapping.get(&atom.element_type)
    }

    /// Create a new basis set given mappings from element type to the basis of that element
    pub(crate) fn new(atomic_mapping: HashMap<ElementType, AtomicBasis>) -> Self {
        Self { atomic_mapping }
    }
}

/// Represents the basis functions for a single atom.
#[derive(Debug)]
pub struct AtomicBasis {
    pub(crate) shells: Vec<ElectronShell>,
}

impl AtomicBasis {
    pub(crate) fn empty() -> Self {
        Self { shells: Vec::new() }
    }

    pub fn basis_functions(&self) -> impl Iterator<Item = &ContractedGaussian> {
        self.shells.iter().flat_map(|shell| &shell.basis_functions)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ElectronShell {
    #[allow(unused)]
    pub(crate) angular_magnitude: i32,
    pub(crate) basis_functions: Vec<ContractedGaussian>,
}

impl ElectronShell {
    pub(crate) fn new(angular_magnitude: i32) -> Self {
        Self {
            angular_magnitude,
            basis_functions: Vec::new(),
        }
    }
}

/// A basis set expanded over the atoms of a concrete molecule, keeping track
/// of which atom each atomic orbital sits on. The atom map is what the
/// Pipek-Mezey localization and the per-atom scrambling need.
#[derive(Debug, Clone)]
pub struct AoBasis {
    functions: Vec<BasisFunction>,
    atom_indices: Vec<usize>,
    n_atoms: usize,
}

impl AoBasis {
    pub fn expand(molecule: &Molecule, basis_set: &BasisSet) -> Result<Self, Error> {
        let mut functions = Vec::new();
        let mut atom_indices = Vec::new();

        for (atom_index, atom) in molecule.atoms().iter().enumerate() {
            let atomic_basis = basis_set
                .for_atom(atom)
                .ok_or(Error::MissingElementBasis(atom.element_type))?;

            for contracted in atomic_basis.basis_functions() {
                functions.push(BasisFunction {
                    contracted_gaussian: contracted.clone(),
                    position: atom.position,
                });
                atom_indices.push(atom_index);
            }
        }

        Ok(Self {
            functions,
            atom_indices,
            n_atoms: molecule.atoms().len(),
        })
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn functions(&self) -> &[BasisFunction] {
        &self.functions
    }

    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    /// Atomic orbital indices centered on the given atom.
    pub fn orbitals_on_atom(&self, atom_index: usize) -> impl Iterator<Item = usize> + '_ {
        self.atom_indices
            .iter()
            .enumerate()
            .filter(move |(_, &atom)| atom == atom_index)
            .map(|(orbital, _)| orbital)
    }
}
