//! Localized molecular orbitals. The canonical mean-field orbitals are
//! delocalized over the whole molecule; for pairing wave functions and
//! active space selection it helps to rotate them into orbitals that live
//! on as few atoms as possible.

mod boys;
mod jacobi;
mod lowdin;
mod pipek_mezey;

pub use boys::boys;
pub use lowdin::lowdin_orbitals;
pub use pipek_mezey::pipek_mezey;

use nalgebra::DMatrix;
use rand::Rng;

use crate::{basis::AoBasis, error::Error, hf::RestrictedHartreeFockOutput};

/// Which localization scheme to apply to the converged orbitals.
#[derive(Copy, Clone, Debug, Default)]
pub enum Localization {
    /// symmetrically orthogonalized atomic orbitals, S^{-1/2}
    #[default]
    Lowdin,
    /// maximize Mulliken populations, starting from the canonical orbitals
    PipekMezey,
    /// minimize the orbital spread, starting from the canonical orbitals
    Boys,
    /// Pipek-Mezey sweeps seeded with the Lowdin orbitals
    PipekMezeyFromLowdin,
}

/// Produces localized orbitals from a converged restricted calculation.
pub fn localize_orbitals(
    method: Localization,
    hf: &RestrictedHartreeFockOutput,
) -> DMatrix<f64> {
    match method {
        Localization::Lowdin => lowdin_orbitals(&hf.overlap),
        Localization::PipekMezey => pipek_mezey(&hf.coefficients, &hf.overlap, &hf.basis),
        Localization::Boys => boys(&hf.coefficients, &hf.basis),
        Localization::PipekMezeyFromLowdin => {
            let seed = lowdin_orbitals(&hf.overlap);
            pipek_mezey(&seed, &hf.overlap, &hf.basis)
        }
    }
}

/// Expresses a matrix of atomic orbital coefficients in a localized
/// orbital basis: row `k` of the result holds the expansion of localized
/// orbital `k` over the columns of `matrix`.
pub fn basis_change(
    matrix: &DMatrix<f64>,
    overlap: &DMatrix<f64>,
    localized: &DMatrix<f64>,
) -> Result<DMatrix<f64>, Error> {
    if matrix.nrows() != overlap.nrows() || localized.nrows() != overlap.ncols() {
        return Err(Error::Dimension(format!(
            "basis change over {} atomic orbitals got a {}x{} matrix and {} localized rows",
            overlap.nrows(),
            matrix.nrows(),
            matrix.ncols(),
            localized.nrows()
        )));
    }

    Ok(localized.transpose() * overlap * matrix)
}

/// Mixes the localized orbitals on each atom among themselves by a random
/// orthogonal rotation. Orbital k is attributed to the atom carrying
/// atomic orbital k, which matches the Lowdin ordering.
pub fn scramble_atom_blocks(
    localized: &DMatrix<f64>,
    basis: &AoBasis,
    rng: &mut impl Rng,
) -> DMatrix<f64> {
    let mut scrambled = localized.clone();

    for atom in 0..basis.n_atoms() {
        let columns: Vec<usize> = basis.orbitals_on_atom(atom).collect();
        if columns.len() < 2 {
            continue;
        }

        let random = DMatrix::from_fn(columns.len(), columns.len(), |_, _| rng.gen::<f64>() - 0.5);
        let rotation = random.qr().q();

        let mixed = localized.select_columns(&columns) * rotation;
        for (local, &column) in columns.iter().enumerate() {
            scrambled.set_column(column, &mixed.column(local));
        }
    }

    scrambled
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use rand::{rngs::StdRng, SeedableRng};

    use super::{basis_change, localize_orbitals, scramble_atom_blocks, Localization};
    use crate::testing;

    fn assert_orthonormal(orbitals: &DMatrix<f64>, overlap: &DMatrix<f64>) {
        let gram = orbitals.transpose() * overlap * orbitals;
        for i in 0..gram.nrows() {
            for j in 0..gram.ncols() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(gram[(i, j)], expected, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn lowdin_orbitals_are_orthonormal() {
        let hf = testing::hydrogen_sto_3g();
        let localized = localize_orbitals(Localization::Lowdin, &hf);
        assert_eq!(localized.ncols(), hf.basis.len());
        assert_orthonormal(&localized, &hf.overlap);
    }

    #[test]
    fn jacobi_sweeps_preserve_orthonormality() {
        let hf = testing::hydrogen_sto_3g();
        for method in [
            Localization::PipekMezey,
            Localization::Boys,
            Localization::PipekMezeyFromLowdin,
        ] {
            let localized = localize_orbitals(method, &hf);
            assert_orthonormal(&localized, &hf.overlap);
        }
    }

    // in H2 the two Lowdin orbitals sit on different atoms; Pipek-Mezey
    // sweeps should leave such a maximally local set essentially alone
    #[test]
    fn pipek_mezey_keeps_atom_centered_orbitals_local() {
        let hf = testing::hydrogen_sto_3g();
        let seed = localize_orbitals(Localization::Lowdin, &hf);
        let localized = localize_orbitals(Localization::PipekMezeyFromLowdin, &hf);

        for col in 0..seed.ncols() {
            let dot: f64 = localized
                .column(col)
                .iter()
                .zip(seed.column(col).iter())
                .map(|(a, b)| a * b)
                .sum();
            let norm_product = localized.column(col).norm() * seed.column(col).norm();
            assert_relative_eq!(dot.abs() / norm_product, 1.0, epsilon = 1e-6);
        }
    }

    // needs more than one orbital per atom for the blocks to mix
    #[test]
    fn scrambling_preserves_orthonormality() {
        use crate::{
            basis::BasisSet,
            config::ConfigBasisSet,
            hf::{restricted_hartree_fock, HartreeFockInput, MolecularElectronConfig},
        };

        let molecule = testing::molecule! {
            H => (0.0, 0.0, 0.0),
            H => (0.0, 0.0, 1.4)
        };
        let basis_set: ConfigBasisSet = serde_json::from_str(testing::BASIS_6_31G).unwrap();
        let basis_set = BasisSet::try_from(basis_set).unwrap();
        let hf = restricted_hartree_fock(&HartreeFockInput {
            molecule: &molecule,
            configuration: MolecularElectronConfig::ClosedShell,
            basis_set: &basis_set,
            max_iterations: 100,
            epsilon: 1e-8,
        })
        .unwrap();

        let localized = localize_orbitals(Localization::Lowdin, &hf);

        let mut rng = StdRng::seed_from_u64(5);
        let scrambled = scramble_atom_blocks(&localized, &hf.basis, &mut rng);
        assert!((&scrambled - &localized).norm() > 1e-6);
        assert_orthonormal(&scrambled, &hf.overlap);
    }

    #[test]
    fn basis_change_of_the_localized_set_is_the_identity() {
        let hf = testing::hydrogen_sto_3g();
        let localized = localize_orbitals(Localization::Lowdin, &hf);

        let changed = basis_change(&localized, &hf.overlap, &localized).unwrap();
        for i in 0..changed.nrows() {
            for j in 0..changed.ncols() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(changed[(i, j)], expected, epsilon = 1e-8);
            }
        }
    }
}
