//! One-electron operator matrices over an expanded basis, shared by the
//! restricted, unrestricted and generalized mean-field drivers and by the
//! Boys localization.

use nalgebra::DMatrix;

use crate::{
    atom::Atom,
    basis::{AoBasis, BasisFunction},
    integrals::Integrator,
};

use super::utils;

pub(crate) fn nuclear_repulsion(atoms: &[Atom]) -> f64 {
    let n_atoms = atoms.len();

    let mut potential = 0.0;
    for atom_a in 0..n_atoms {
        for atom_b in atom_a + 1..n_atoms {
            potential += (atoms[atom_a].nuclear_charge() * atoms[atom_b].nuclear_charge()) as f64
                / (atoms[atom_b].position - atoms[atom_a].position).norm()
        }
    }
    log::debug!("nuclear repulsion energy: {potential}");
    potential
}

pub(crate) fn overlap_matrix(
    basis: &[BasisFunction],
    integrator: &impl Integrator<Item = BasisFunction>,
) -> DMatrix<f64> {
    utils::symmetric_matrix(basis.len(), |i, j| {
        let overlap_ij = integrator.overlap((&basis[i], &basis[j]));
        log::trace!("overlap ({i}{j}) = {overlap_ij}");
        overlap_ij
    })
}

pub(crate) fn kinetic_matrix(
    basis: &[BasisFunction],
    integrator: &impl Integrator<Item = BasisFunction>,
) -> DMatrix<f64> {
    utils::symmetric_matrix(basis.len(), |i, j| {
        let kinetic_ij = integrator.kinetic((&basis[i], &basis[j]));
        log::trace!("kinetic ({i}{j}) = {kinetic_ij}");
        kinetic_ij
    })
}

pub(crate) fn nuclear_matrix(
    basis: &[BasisFunction],
    nuclei: &[Atom],
    integrator: &impl Integrator<Item = BasisFunction>,
) -> DMatrix<f64> {
    utils::symmetric_matrix(basis.len(), |i, j| {
        let nuclear_ij = integrator.nuclear((&basis[i], &basis[j]), nuclei);
        log::trace!("nuclear ({i}{j}) = {nuclear_ij}");
        nuclear_ij
    })
}

/// The dipole moment matrices (x, y, z components) over the atomic orbitals.
pub(crate) fn dipole_matrices(
    basis: &AoBasis,
    integrator: &impl Integrator<Item = BasisFunction>,
) -> [DMatrix<f64>; 3] {
    let functions = basis.functions();
    let n = functions.len();

    let mut components =
        [DMatrix::zeros(n, n), DMatrix::zeros(n, n), DMatrix::zeros(n, n)];

    for i in 0..n {
        for j in i..n {
            let dipole_ij = integrator.dipole((&functions[i], &functions[j]));
            for (axis, component) in components.iter_mut().enumerate() {
                component[(i, j)] = dipole_ij[axis];
                component[(j, i)] = dipole_ij[axis];
            }
        }
    }

    components
}

/// S^{-1/2}, the symmetric orthogonalization of the overlap matrix.
pub(crate) fn transformation_matrix(overlap: &DMatrix<f64>) -> DMatrix<f64> {
    let (u, _) = utils::eigs(overlap.clone());
    let diagonal_matrix = &u.transpose() * (overlap * &u);

    let diagonal_inv_sqrt =
        DMatrix::from_diagonal(&diagonal_matrix.map_diagonal(|f| f.sqrt().recip()));
    &u * (diagonal_inv_sqrt * &u.transpose())
}
