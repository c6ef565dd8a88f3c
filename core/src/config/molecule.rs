use nalgebra::Vector3;
use serde::Deserialize;

use crate::{atom::Atom, error::Error, molecule::Molecule, periodic_table::ElementType};

/// Represents a full molecule in a config file.
/// A molecule is just a list of positioned atoms.
#[derive(Deserialize)]
pub struct ConfigMolecule(Vec<ConfigAtom>);

#[derive(Deserialize)]
struct ConfigAtom {
    element: ElementType,
    /// x, y, z in bohr
    position: Vec<f64>,
}

impl TryFrom<ConfigMolecule> for Molecule {
    type Error = Error;

    fn try_from(value: ConfigMolecule) -> Result<Self, Self::Error> {
        let ConfigMolecule(config_atoms) = value;

        let mut atoms = Vec::with_capacity(config_atoms.len());

        for atom in config_atoms {
            let &[x, y, z] = atom.position.as_slice() else {
                return Err(Error::Dimension(format!(
                    "atom {} needs exactly x, y, z coordinates, got {} values",
                    atom.element.symbol(),
                    atom.position.len()
                )));
            };

            atoms.push(Atom {
                position: Vector3::new(x, y, z),
                element_type: atom.element,
            });
        }

        Ok(Molecule::new(atoms))
    }
}
