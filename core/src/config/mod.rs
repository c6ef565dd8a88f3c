//! Serde descriptions of the JSON input files: a molecule is a list of
//! positioned atoms, a basis set follows the MolSSI BSE JSON schema.

mod basis_set;
mod molecule;

pub use basis_set::ConfigBasisSet;
pub use molecule::ConfigMolecule;
