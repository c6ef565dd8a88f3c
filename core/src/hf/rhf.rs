use nalgebra::DMatrix;

use crate::{
    basis::AoBasis,
    diis::Diis,
    error::Error,
    integrals::{DefaultIntegrator, ElectronTensor},
};

use super::{operators, utils, HartreeFockInput};

/// The output of a restricted hartree fock calculation. Everything the
/// preparation pipeline consumes downstream is carried here explicitly:
/// coefficients for localization and pairing matrices, overlap for basis
/// changes, core hamiltonian and repulsion integrals for the active-space
/// effective hamiltonian and the FCIDUMP transform.
#[derive(Debug)]
#[non_exhaustive]
pub struct RestrictedHartreeFockOutput {
    /// the basis the calculation was carried out in
    pub basis: AoBasis,
    /// molecular orbital coefficients, one orbital per column, sorted by
    /// ascending orbital energy
    pub coefficients: DMatrix<f64>,
    /// the orbital energies that were found in this hartree fock calculation, sorted in
    /// ascending order
    pub orbital_energies: Vec<f64>,
    /// overlap matrix of the atomic orbitals
    pub overlap: DMatrix<f64>,
    /// one-electron core hamiltonian (kinetic + nuclear attraction)
    pub core_hamiltonian: DMatrix<f64>,
    /// two-electron repulsion integrals over the atomic orbitals
    pub electron: ElectronTensor,
    /// The number of electrons paired up in the orbitals
    pub n_electrons: usize,
    /// The electronic energy of the system
    pub electronic_energy: f64,
    /// The nuclear repulsion energy
    pub nuclear_repulsion: f64,
    /// After how many iterations did the system converge
    pub iterations: usize,
}

impl RestrictedHartreeFockOutput {
    pub fn total_energy(&self) -> f64 {
        self.electronic_energy + self.nuclear_repulsion
    }

    /// The doubly occupied orbital coefficients, one column per electron pair.
    pub fn occupied_coefficients(&self) -> DMatrix<f64> {
        self.coefficients.columns(0, self.n_electrons / 2).into()
    }
}

pub fn restricted_hartree_fock(
    input: &HartreeFockInput,
) -> Result<RestrictedHartreeFockOutput, Error> {
    let integrator = DefaultIntegrator::default();

    let basis = input.basis()?;
    let n_basis = basis.len();
    let n_electrons = input.n_electrons();

    let nuclear_repulsion = operators::nuclear_repulsion(input.molecule.atoms());

    let overlap = operators::overlap_matrix(basis.functions(), &integrator);
    let kinetic = operators::kinetic_matrix(basis.functions(), &integrator);
    let nuclear = operators::nuclear_matrix(basis.functions(), input.molecule.atoms(), &integrator);
    let electron = ElectronTensor::from_basis(basis.functions(), &integrator);

    let core_hamiltonian = kinetic + nuclear;
    let transform = operators::transformation_matrix(&overlap);
    let mut density = compute_hückel_density(
        &core_hamiltonian,
        &overlap,
        &transform,
        n_basis,
        n_electrons,
    );

    let mut electron_terms = vec![0.0; n_basis.pow(4)];
    for (j, i, x, y) in itertools::iproduct!(0..n_basis, 0..n_basis, 0..n_basis, 0..n_basis) {
        electron_terms[j * n_basis.pow(3) + i * n_basis.pow(2) + y * n_basis + x] =
            electron[(i, j, x, y)] - 0.5 * electron[(i, x, j, y)];
    }

    // start of scf iteration
    let mut diis = Diis::new();
    for iteration in 0..=input.max_iterations {
        let electronic_hamiltonian =
            compute_electronic_hamiltonian(&density, &electron_terms, n_basis);

        let fock = &core_hamiltonian + &electronic_hamiltonian;
        let error = &fock * &density * &overlap - &overlap * &density * &fock;

        let fock = diis
            .fock(error, fock)
            .ok_or(Error::ScfNotConverged {
                max_iterations: input.max_iterations,
            })?;
        let transformed_fock = &transform.transpose() * (&fock * &transform);
        let (transformed_coefficients, orbital_energies) = utils::sorted_eigs(transformed_fock);
        let coefficients = &transform * &transformed_coefficients;

        let new_density = compute_updated_density(&coefficients, n_basis, n_electrons);

        let density_change = new_density - &density;
        density += &density_change;

        let electronic_energy =
            0.5 * (&density * (2.0 * &core_hamiltonian + &electronic_hamiltonian)).trace();

        let density_rms =
            (density_change.map_diagonal(|entry| entry.powi(2)).sum() / n_basis as f64).sqrt();

        log::info!(
            "iteration {iteration:<4} - electronic energy {electronic_energy:1.4}. density rms {density_rms:1.4e}",
        );

        if density_rms < input.epsilon {
            return Ok(RestrictedHartreeFockOutput {
                basis,
                coefficients,
                orbital_energies: orbital_energies.as_slice().to_vec(),
                overlap,
                core_hamiltonian,
                electron,
                n_electrons,
                electronic_energy,
                nuclear_repulsion,
                iterations: iteration,
            });
        }
    }

    Err(Error::ScfNotConverged {
        max_iterations: input.max_iterations,
    })
}

fn compute_hückel_density(
    hamiltonian: &DMatrix<f64>,
    overlap: &DMatrix<f64>,
    transform: &DMatrix<f64>,
    n_basis: usize,
    n_electrons: usize,
) -> DMatrix<f64> {
    const WOLFSBERG_HELMHOLTZ: f64 = 1.75;
    let hamiltonian_eht = utils::symmetric_matrix(n_basis, |i, j| {
        WOLFSBERG_HELMHOLTZ * overlap[(i, j)] * (hamiltonian[(i, i)] + hamiltonian[(j, j)]) / 2.0
    });

    let transformed = &transform.transpose() * (hamiltonian_eht * transform);
    let (coeffs_prime, _orbital_energies) = utils::sorted_eigs(transformed);
    let coeffs = transform * coeffs_prime;

    compute_updated_density(&coeffs, n_basis, n_electrons)
}

fn compute_electronic_hamiltonian(
    density: &DMatrix<f64>,
    electron_terms: &[f64],
    n_basis: usize,
) -> DMatrix<f64> {
    utils::symmetric_matrix(n_basis, |i, j| {
        let mut sum = 0.0;
        for y in 0..n_basis {
            for x in 0..n_basis {
                sum += density[(x, y)]
                    * electron_terms[j * n_basis.pow(3) + i * n_basis.pow(2) + y * n_basis + x];
            }
        }
        sum
    })
}

fn compute_updated_density(
    coefficients: &DMatrix<f64>,
    n_basis: usize,
    n_electrons: usize,
) -> DMatrix<f64> {
    utils::symmetric_matrix(n_basis, |i, j| {
        let mut sum = 0.0;
        for k in 0..n_electrons / 2 {
            sum += coefficients[(i, k)] * coefficients[(j, k)]
        }
        2.0 * sum
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::{
        basis::BasisSet,
        config::ConfigBasisSet,
        hf::{restricted_hartree_fock, HartreeFockInput, MolecularElectronConfig},
        testing,
    };

    #[test]
    fn hydrogen_6_31g() {
        let molecule = testing::molecule! {
            H => (0.0, 0.0, 0.0),
            H => (0.0, 0.0, 1.4)
        };
        let basis_set: ConfigBasisSet = serde_json::from_str(testing::BASIS_6_31G).unwrap();
        let basis_set = BasisSet::try_from(basis_set).unwrap();

        let input = HartreeFockInput {
            molecule: &molecule,
            configuration: MolecularElectronConfig::ClosedShell,
            basis_set: &basis_set,
            max_iterations: 100,
            epsilon: 1e-6,
        };

        let output = restricted_hartree_fock(&input).unwrap();

        assert_relative_eq!(output.electronic_energy, -1.8410539726907735, epsilon = 1e-3);
        assert_relative_eq!(output.nuclear_repulsion, 0.7142857142857142, epsilon = 1e-3);
        assert_relative_eq!(output.orbital_energies[0], -0.595564373728178, epsilon = 1e-3);
        assert_relative_eq!(output.orbital_energies[1], 0.2382503139896246, epsilon = 1e-3);
        assert_relative_eq!(output.orbital_energies[2], 0.7750727506800223, epsilon = 1e-3);
        assert_relative_eq!(output.orbital_energies[3], 1.40316490313582, epsilon = 1e-3);
    }

    #[test]
    fn water_6_31g() {
        let molecule = testing::water();
        let basis_set: ConfigBasisSet = serde_json::from_str(testing::BASIS_6_31G).unwrap();
        let basis_set = BasisSet::try_from(basis_set).unwrap();

        let input = HartreeFockInput {
            molecule: &molecule,
            configuration: MolecularElectronConfig::ClosedShell,
            basis_set: &basis_set,
            max_iterations: 100,
            epsilon: 1e-6,
        };

        let output = restricted_hartree_fock(&input).unwrap();

        // reference energy converged with this integrator at epsilon 1e-6
        assert_relative_eq!(output.electronic_energy, -91.94201623514206, epsilon = 1e-3);
        assert_relative_eq!(output.nuclear_repulsion, 17.488049195046216, epsilon = 1e-6);

        // five doubly occupied orbitals below a virtual gap, energies ascending
        assert!(output
            .orbital_energies
            .windows(2)
            .all(|pair| pair[0] <= pair[1]));
        assert!(output.orbital_energies[..5].iter().all(|&energy| energy < 0.0));
        assert!(output.orbital_energies[0] < -20.0);
        assert!(output.orbital_energies[5] > 0.0);
    }

    #[test]
    fn occupied_coefficients_have_one_column_per_pair() {
        let molecule = testing::molecule! {
            H => (0.0, 0.0, 0.0),
            H => (0.0, 0.0, 1.4)
        };
        let basis_set: ConfigBasisSet = serde_json::from_str(testing::BASIS_6_31G).unwrap();
        let basis_set = BasisSet::try_from(basis_set).unwrap();

        let input = HartreeFockInput {
            molecule: &molecule,
            configuration: MolecularElectronConfig::ClosedShell,
            basis_set: &basis_set,
            max_iterations: 100,
            epsilon: 1e-6,
        };

        let output = restricted_hartree_fock(&input).unwrap();
        let occupied = output.occupied_coefficients();

        assert_eq!(occupied.nrows(), 4);
        assert_eq!(occupied.ncols(), 1);
    }
}
