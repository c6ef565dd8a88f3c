//! Pairing wave function starting points built from a converged mean
//! field: a geminal power from restricted orbitals and a pfaffian pairing
//! matrix from generalized spinors.

use nalgebra::DMatrix;
use num_complex::Complex64;
use rand::Rng;

use crate::{
    error::Error,
    hf::{GeneralizedHartreeFockOutput, RestrictedHartreeFockOutput},
};

/// The pairing matrix of an antisymmetrized geminal power that reproduces
/// the restricted determinant: the sum of the occupied orbital dyads. The
/// result is symmetric.
pub fn agp_from_rhf(hf: &RestrictedHartreeFockOutput) -> DMatrix<f64> {
    let occupied = hf.occupied_coefficients();
    &occupied * occupied.transpose()
}

/// The pairing matrix of the pfaffian wave function equivalent to a
/// generalized determinant: adjacent occupied spinors are paired with
/// alternating sign, giving an antisymmetric matrix over the spinor basis.
///
/// Spinors are paired two at a time, so the electron count must be even.
pub fn pfaffian_from_ghf(hf: &GeneralizedHartreeFockOutput) -> Result<DMatrix<f64>, Error> {
    if hf.n_electrons % 2 != 0 {
        return Err(Error::Dimension(format!(
            "pfaffian pairing needs an even electron count, got {}",
            hf.n_electrons
        )));
    }

    let occupied = hf.occupied_coefficients();
    let n_pairs = hf.n_electrons / 2;

    // block diagonal antisymmetric pairing of adjacent spinors
    let mut pairing = DMatrix::zeros(hf.n_electrons, hf.n_electrons);
    for pair in 0..n_pairs {
        pairing[(2 * pair, 2 * pair + 1)] = 1.0;
        pairing[(2 * pair + 1, 2 * pair)] = -1.0;
    }

    Ok(&occupied * pairing * occupied.transpose())
}

/// Perturbs every entry by a uniform sample from `[0, scale)`. Useful to
/// nudge a pairing matrix off an exact symmetry before an optimization.
pub fn add_noise(matrix: &mut DMatrix<f64>, scale: f64, rng: &mut impl Rng) {
    for entry in matrix.iter_mut() {
        *entry += scale * rng.gen::<f64>();
    }
}

pub fn add_noise_complex(matrix: &mut DMatrix<Complex64>, scale: f64, rng: &mut impl Rng) {
    for entry in matrix.iter_mut() {
        *entry += Complex64::new(scale * rng.gen::<f64>(), scale * rng.gen::<f64>());
    }
}
