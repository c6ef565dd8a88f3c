use nalgebra::DMatrix;

use crate::basis::AoBasis;

use super::jacobi;

/// Pipek-Mezey localization: rotates the orbitals to maximize the sum of
/// squared Mulliken populations, concentrating each orbital on as few
/// atoms as possible.
pub fn pipek_mezey(
    coefficients: &DMatrix<f64>,
    overlap: &DMatrix<f64>,
    basis: &AoBasis,
) -> DMatrix<f64> {
    let operators = atom_population_operators(overlap, basis);
    jacobi::maximize_diagonal_squares(coefficients, &operators)
}

/// The symmetrized Mulliken population operator of each atom,
/// `(P_A S + S P_A) / 2` with `P_A` the projector onto the atomic
/// orbitals centered on atom `A`.
fn atom_population_operators(overlap: &DMatrix<f64>, basis: &AoBasis) -> Vec<DMatrix<f64>> {
    let n = basis.len();

    (0..basis.n_atoms())
        .map(|atom| {
            let mut operator = DMatrix::zeros(n, n);
            for mu in basis.orbitals_on_atom(atom) {
                for nu in 0..n {
                    operator[(mu, nu)] += 0.5 * overlap[(mu, nu)];
                    operator[(nu, mu)] += 0.5 * overlap[(nu, mu)];
                }
            }
            operator
        })
        .collect()
}
