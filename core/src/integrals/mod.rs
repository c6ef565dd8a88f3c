mod electron_tensor;
mod mmd;
mod utils;

use nalgebra::Vector3;

use crate::atom::Atom;

pub use electron_tensor::ElectronTensor;
pub use mmd::McMurchieDavidson;

pub type DefaultIntegrator = McMurchieDavidson;

pub trait Integrator {
    type Item;

    /// Calculate the overlap integral between two basis functions.
    fn overlap(&self, functions: (&Self::Item, &Self::Item)) -> f64;

    /// Calculate the kinetic energy integral between two basis functions.
    fn kinetic(&self, functions: (&Self::Item, &Self::Item)) -> f64;

    /// Calculate the nuclear attraction integral between two basis functions
    /// and the nuclei of a quantum system.
    fn nuclear(&self, functions: (&Self::Item, &Self::Item), nuclei: &[Atom]) -> f64;

    /// Calculate the electron-electron repulsion integral between four basis functions.
    fn electron_repulsion(
        &self,
        functions: (&Self::Item, &Self::Item, &Self::Item, &Self::Item),
    ) -> f64;

    /// Calculate the electric dipole moment integral (about the origin)
    /// between two basis functions.
    fn dipole(&self, functions: (&Self::Item, &Self::Item)) -> Vector3<f64>;
}
