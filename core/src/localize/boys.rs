use nalgebra::DMatrix;

use crate::{basis::AoBasis, hf::operators, integrals::DefaultIntegrator};

use super::jacobi;

/// Foster-Boys localization: rotates the orbitals to minimize their total
/// quadratic spread, which is the same as maximizing the sum of squared
/// orbital dipole moments.
pub fn boys(coefficients: &DMatrix<f64>, basis: &AoBasis) -> DMatrix<f64> {
    let integrator = DefaultIntegrator::default();
    let dipoles = operators::dipole_matrices(basis, &integrator);
    jacobi::maximize_diagonal_squares(coefficients, &dipoles)
}
