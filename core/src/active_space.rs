//! Partitioning of the molecular orbitals into doubly occupied core
//! orbitals and an active window. The core electrons are folded into an
//! effective one-electron hamiltonian and a constant energy shift, so that
//! a correlated solver only ever sees the active orbitals.

use nalgebra::DMatrix;

use crate::{error::Error, hf::utils, integrals::ElectronTensor};

/// A window of orbitals: `n_core` doubly occupied orbitals below it,
/// `n_active` orbitals inside it.
#[derive(Copy, Clone, Debug)]
pub struct ActiveSpace {
    pub n_core: usize,
    pub n_active: usize,
}

/// The one-electron hamiltonian over the active orbitals, plus the constant
/// energy carried by the nuclei and the frozen core.
#[derive(Debug)]
pub struct EffectiveHamiltonian {
    /// `n_active` x `n_active`, in the active molecular orbital basis
    pub h1: DMatrix<f64>,
    /// nuclear repulsion plus the energy of the frozen core electrons
    pub core_energy: f64,
}

/// Folds the core orbitals of `coefficients` into an effective hamiltonian
/// for the active window.
///
/// The frozen core contributes its coulomb and exchange field to the active
/// one-electron operator, and its mean-field energy to the constant shift.
pub fn effective_hamiltonian(
    coefficients: &DMatrix<f64>,
    core_hamiltonian: &DMatrix<f64>,
    electron: &ElectronTensor,
    nuclear_repulsion: f64,
    space: ActiveSpace,
) -> Result<EffectiveHamiltonian, Error> {
    let n_basis = coefficients.nrows();
    if space.n_core + space.n_active > coefficients.ncols() {
        return Err(Error::Dimension(format!(
            "active space needs {} orbitals, only {} available",
            space.n_core + space.n_active,
            coefficients.ncols()
        )));
    }

    let core = coefficients.columns(0, space.n_core);
    let active = coefficients.columns(space.n_core, space.n_active);

    // each core orbital is doubly occupied
    let core_density = 2.0 * &core * core.transpose();

    let core_field = utils::symmetric_matrix(n_basis, |i, j| {
        let mut sum = 0.0;
        for x in 0..n_basis {
            for y in 0..n_basis {
                sum += core_density[(x, y)]
                    * (electron[(i, j, x, y)] - 0.5 * electron[(i, x, j, y)]);
            }
        }
        sum
    });

    let h1 = active.transpose() * (core_hamiltonian + &core_field) * active;

    let core_energy = nuclear_repulsion
        + (&core_density * core_hamiltonian).trace()
        + 0.5 * (&core_density * &core_field).trace();

    Ok(EffectiveHamiltonian { h1, core_energy })
}
