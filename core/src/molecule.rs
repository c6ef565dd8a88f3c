use crate::atom::Atom;

/// Represents a molecule
#[derive(Debug, Clone)]
pub struct Molecule {
    pub(crate) atoms: Vec<Atom>,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Number of electrons of the neutral molecule.
    pub fn n_electrons(&self) -> usize {
        self.atoms
            .iter()
            .map(|atom| atom.nuclear_charge() as usize)
            .sum()
    }
}
