use nalgebra::{DMatrix, DVector};
use rand::Rng;

use crate::{
    basis::AoBasis,
    error::Error,
    integrals::{DefaultIntegrator, ElectronTensor},
};

use super::{operators, utils, HartreeFockInput};

/// The output of an unrestricted hartree fock calculation
#[derive(Debug)]
#[non_exhaustive]
pub struct UnrestrictedHartreeFockOutput {
    /// the basis the calculation was carried out in
    pub basis: AoBasis,
    /// The spin up molecular orbital coefficients, sorted by ascending energy
    pub coefficients_alpha: DMatrix<f64>,
    /// The spin down molecular orbital coefficients, sorted by ascending energy
    pub coefficients_beta: DMatrix<f64>,
    /// the spin up orbital energies, ascending
    pub orbital_energies_alpha: Vec<f64>,
    /// the spin down orbital energies, ascending
    pub orbital_energies_beta: Vec<f64>,
    /// number of spin up electrons
    pub n_alpha: usize,
    /// number of spin down electrons
    pub n_beta: usize,
    /// The electronic energy of the system
    pub electronic_energy: f64,
    /// The nuclear repulsion energy
    pub nuclear_repulsion: f64,
    /// After how many iterations did the system converge
    pub iterations: usize,
}

impl UnrestrictedHartreeFockOutput {
    pub fn total_energy(&self) -> f64 {
        self.electronic_energy + self.nuclear_repulsion
    }
}

pub fn unrestricted_hartree_fock(
    input: &HartreeFockInput,
    rng: &mut impl Rng,
) -> Result<UnrestrictedHartreeFockOutput, Error> {
    let integrator = DefaultIntegrator::default();

    let basis = input.basis()?;
    let n_basis = basis.len();

    let n_alpha = input.n_alpha();
    let n_beta = input.n_beta();

    let nuclear_repulsion = operators::nuclear_repulsion(input.molecule.atoms());

    let overlap = operators::overlap_matrix(basis.functions(), &integrator);
    let kinetic = operators::kinetic_matrix(basis.functions(), &integrator);
    let nuclear = operators::nuclear_matrix(basis.functions(), input.molecule.atoms(), &integrator);
    let electron = ElectronTensor::from_basis(basis.functions(), &integrator);

    let core_hamiltonian = kinetic + nuclear;
    let transform = operators::transformation_matrix(&overlap);

    // core guesses, perturbed separately for each spin so the iteration can
    // leave the spin-symmetric saddle point
    let mut guess = |n_occupied: usize| {
        let noise = utils::symmetric_matrix(n_basis, |_, _| rng.gen_range(-0.01..0.01));
        let transformed = &transform.transpose() * ((&core_hamiltonian + noise) * &transform);
        let (coeffs_prime, _) = utils::sorted_eigs(transformed);
        let coefficients = &transform * coeffs_prime;
        compute_updated_density(&coefficients, n_basis, n_occupied)
    };
    let mut density_alpha = guess(n_alpha);
    let mut density_beta = guess(n_beta);

    let mut fock_matrices = [
        DMatrix::zeros(n_basis, n_basis),
        DMatrix::zeros(n_basis, n_basis),
    ];
    let mut coefficient_matrices = [
        DMatrix::zeros(n_basis, n_basis),
        DMatrix::zeros(n_basis, n_basis),
    ];
    let mut orbital_energies = [DVector::zeros(n_basis), DVector::zeros(n_basis)];

    // start of scf iteration
    for iteration in 0..=input.max_iterations {
        for spin in 0..=1 {
            // "main" density and "other" density
            let (density_one, density_two) = match spin {
                0 => (&density_alpha, &density_beta),
                1 => (&density_beta, &density_alpha),
                _ => unreachable!(),
            };

            let fock = &core_hamiltonian
                + compute_electronic_hamiltonian(density_one, density_two, &electron, n_basis);

            let transformed_fock = &transform.transpose() * (&fock * &transform);
            let (transformed_coefficients, spin_orbital_energies) =
                utils::sorted_eigs(transformed_fock);
            let coefficients = &transform * &transformed_coefficients;

            fock_matrices[spin] = fock;
            coefficient_matrices[spin] = coefficients;
            orbital_energies[spin] = spin_orbital_energies;
        }

        // second loop, because we need the new coefficients to compute the new density matrices
        let mut density_rms = 0.0;
        for spin in 0..=1 {
            let (old_density, coefficients, electrons) = match spin {
                0 => (&mut density_alpha, &coefficient_matrices[0], n_alpha),
                1 => (&mut density_beta, &coefficient_matrices[1], n_beta),
                _ => unreachable!(),
            };

            let new_density = compute_updated_density(coefficients, n_basis, electrons);

            const F: f64 = 0.5;
            let density_change = &new_density - &*old_density;
            *old_density += &density_change * F;

            let self_rms =
                (density_change.map_diagonal(|entry| entry.powi(2)).sum() / n_basis as f64).sqrt();

            density_rms += self_rms;

            log::debug!(
                "spin {} - density rms {self_rms:03.3e}",
                ["up", "down"][spin]
            )
        }

        let electronic_energy = 0.5
            * ((&density_alpha * (&core_hamiltonian + &fock_matrices[0])).trace()
                + (&density_beta * (&core_hamiltonian + &fock_matrices[1])).trace());

        log::info!(
            "iteration {iteration:<4} - electronic energy {electronic_energy:1.4}. density rms {density_rms:1.4e}",
        );

        if density_rms / 2.0 < input.epsilon {
            let [orbital_energies_alpha, orbital_energies_beta] =
                orbital_energies.map(|x| x.as_slice().to_vec());
            let [coefficients_alpha, coefficients_beta] = coefficient_matrices;

            return Ok(UnrestrictedHartreeFockOutput {
                basis,
                coefficients_alpha,
                coefficients_beta,
                orbital_energies_alpha,
                orbital_energies_beta,
                n_alpha,
                n_beta,
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

fn compute_electronic_hamiltonian(
    density_one: &DMatrix<f64>,
    density_two: &DMatrix<f64>,
    multi: &ElectronTensor,
    n_basis: usize,
) -> DMatrix<f64> {
    utils::symmetric_matrix(n_basis, |i, j| {
        let mut sum = 0.0;
        for k in 0..n_basis {
            for l in 0..n_basis {
                sum += density_one[(k, l)] * multi[(i, j, k, l)]
                    + density_two[(k, l)] * multi[(i, j, k, l)]
                    - density_one[(k, l)] * multi[(i, k, j, l)]
            }
        }
        sum
    })
}

fn compute_updated_density(
    coefficients: &DMatrix<f64>,
    n_basis: usize,
    n_occupied: usize,
) -> DMatrix<f64> {
    utils::symmetric_matrix(n_basis, |i, j| {
        let mut sum = 0.0;
        for k in 0..n_occupied {
            sum += coefficients[(i, k)] * coefficients[(j, k)];
        }
        sum
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use crate::{
        basis::BasisSet,
        config::ConfigBasisSet,
        hf::{
            restricted_hartree_fock, unrestricted_hartree_fock, HartreeFockInput,
            MolecularElectronConfig,
        },
        testing,
    };

    #[test]
    fn closed_shell_hydrogen_matches_restricted_result() {
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
            max_iterations: 200,
            epsilon: 1e-6,
        };

        let mut rng = StdRng::seed_from_u64(1);
        let output = unrestricted_hartree_fock(&input, &mut rng).unwrap();

        // near equilibrium the spin-symmetric solution is stable, so the
        // perturbed guess still collapses onto the RHF solution
        assert_relative_eq!(output.electronic_energy, -1.8410539726907735, epsilon = 1e-3);
        assert_relative_eq!(
            output.orbital_energies_alpha[0],
            output.orbital_energies_beta[0],
            epsilon = 1e-6
        );
    }

    #[test]
    fn stretched_hydrogen_breaks_spin_symmetry() {
        let molecule = testing::molecule! {
            H => (0.0, 0.0, 0.0),
            H => (0.0, 0.0, 5.0)
        };
        let basis_set: ConfigBasisSet = serde_json::from_str(testing::BASIS_STO_3G).unwrap();
        let basis_set = BasisSet::try_from(basis_set).unwrap();

        let input = HartreeFockInput {
            molecule: &molecule,
            configuration: MolecularElectronConfig::ClosedShell,
            basis_set: &basis_set,
            max_iterations: 500,
            epsilon: 1e-8,
        };

        let restricted = restricted_hartree_fock(&input).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let unrestricted = unrestricted_hartree_fock(&input, &mut rng).unwrap();

        // past the Coulson-Fischer point the broken-symmetry solution sits
        // well below the restricted one and approaches two free atoms
        assert!(unrestricted.total_energy() < restricted.total_energy() - 0.05);
        assert!(unrestricted.total_energy() < -0.9);

        // each spin localizes on its own atom
        let up = unrestricted.coefficients_alpha[(0, 0)].abs();
        let down = unrestricted.coefficients_beta[(0, 0)].abs();
        assert!((up - down).abs() > 0.1);
    }
}
