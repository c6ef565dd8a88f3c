use nalgebra::DMatrix;
use rand::Rng;

use crate::{
    basis::AoBasis,
    error::Error,
    integrals::{DefaultIntegrator, ElectronTensor},
};

use super::{operators, utils, HartreeFockInput};

/// The output of a generalized hartree fock calculation. Orbitals are
/// spinors: each column holds the alpha components in its upper half and
/// the beta components in its lower half.
#[derive(Debug)]
#[non_exhaustive]
pub struct GeneralizedHartreeFockOutput {
    /// the basis the calculation was carried out in
    pub basis: AoBasis,
    /// The spinor coefficients, sorted by ascending energy. Twice the
    /// dimension of the atomic basis
    pub coefficients: DMatrix<f64>,
    /// the spinor energies, ascending
    pub orbital_energies: Vec<f64>,
    /// how many electrons there are in the system
    pub n_electrons: usize,
    /// The electronic energy of the system
    pub electronic_energy: f64,
    /// The nuclear repulsion energy
    pub nuclear_repulsion: f64,
    /// After how many iterations did the system converge
    pub iterations: usize,
}

impl GeneralizedHartreeFockOutput {
    pub fn total_energy(&self) -> f64 {
        self.electronic_energy + self.nuclear_repulsion
    }

    /// The occupied spinor coefficients, a 2n x n_electrons matrix.
    pub fn occupied_coefficients(&self) -> DMatrix<f64> {
        self.coefficients.columns(0, self.n_electrons).into_owned()
    }
}

/// Solves the self consistent field equations in a spinor basis, where the
/// alpha and beta components of each orbital can mix. A small amount of
/// random noise is mixed into the initial guess so that the iteration can
/// leave the spin-restricted manifold.
pub fn generalized_hartree_fock(
    input: &HartreeFockInput,
    rng: &mut impl Rng,
) -> Result<GeneralizedHartreeFockOutput, Error> {
    let integrator = DefaultIntegrator::default();

    let basis = input.basis()?;
    let n_basis = basis.len();
    let n_spinor = 2 * n_basis;

    let n_electrons = input.n_electrons();

    let nuclear_repulsion = operators::nuclear_repulsion(input.molecule.atoms());

    let overlap = operators::overlap_matrix(basis.functions(), &integrator);
    let kinetic = operators::kinetic_matrix(basis.functions(), &integrator);
    let nuclear = operators::nuclear_matrix(basis.functions(), input.molecule.atoms(), &integrator);
    let electron = ElectronTensor::from_basis(basis.functions(), &integrator);

    let core_hamiltonian = kinetic + nuclear;
    let zeros = DMatrix::zeros(n_basis, n_basis);

    let spinor_core = spin_blocks(&core_hamiltonian, &zeros, &zeros, &core_hamiltonian);
    let spinor_transform = {
        let transform = operators::transformation_matrix(&overlap);
        spin_blocks(&transform, &zeros, &zeros, &transform)
    };

    // core guess, perturbed to break spin symmetry
    let mut density = {
        let noise = utils::symmetric_matrix(n_spinor, |_, _| rng.gen_range(-0.01..0.01));
        let transformed =
            &spinor_transform.transpose() * ((&spinor_core + noise) * &spinor_transform);
        let (coeffs_prime, _) = utils::sorted_eigs(transformed);
        let coefficients = &spinor_transform * coeffs_prime;
        compute_updated_density(&coefficients, n_spinor, n_electrons)
    };

    for iteration in 0..=input.max_iterations {
        let fock = &spinor_core + compute_electronic_hamiltonian(&density, &electron, n_basis);

        let transformed_fock = &spinor_transform.transpose() * (&fock * &spinor_transform);
        let (transformed_coefficients, orbital_energies) = utils::sorted_eigs(transformed_fock);
        let coefficients = &spinor_transform * &transformed_coefficients;

        let new_density = compute_updated_density(&coefficients, n_spinor, n_electrons);

        const F: f64 = 0.5;
        let density_change = &new_density - &density;
        density += &density_change * F;

        let electronic_energy = 0.5 * (&density * (&spinor_core + &fock)).trace();

        let density_rms =
            (density_change.map_diagonal(|entry| entry.powi(2)).sum() / n_spinor as f64).sqrt();

        log::info!(
            "iteration {iteration:<4} - electronic energy {electronic_energy:1.4}. density rms {density_rms:1.4e}",
        );

        if density_rms < input.epsilon {
            return Ok(GeneralizedHartreeFockOutput {
                basis,
                coefficients,
                orbital_energies: orbital_energies.as_slice().to_vec(),
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

/// Assembles a spinor matrix from its four spin blocks.
fn spin_blocks(
    aa: &DMatrix<f64>,
    ab: &DMatrix<f64>,
    ba: &DMatrix<f64>,
    bb: &DMatrix<f64>,
) -> DMatrix<f64> {
    let n = aa.nrows();
    DMatrix::from_fn(2 * n, 2 * n, |i, j| match (i < n, j < n) {
        (true, true) => aa[(i, j)],
        (true, false) => ab[(i, j - n)],
        (false, true) => ba[(i - n, j)],
        (false, false) => bb[(i - n, j - n)],
    })
}

/// The two electron part of the spinor fock matrix. The coulomb term only
/// couples to the total charge density, while exchange acts within each
/// spin block separately.
fn compute_electronic_hamiltonian(
    density: &DMatrix<f64>,
    multi: &ElectronTensor,
    n_basis: usize,
) -> DMatrix<f64> {
    let block = |spin_i: usize, spin_j: usize| {
        density
            .view((spin_i * n_basis, spin_j * n_basis), (n_basis, n_basis))
            .into_owned()
    };
    let (density_aa, density_ab) = (block(0, 0), block(0, 1));
    let (density_ba, density_bb) = (block(1, 0), block(1, 1));
    let charge_density = &density_aa + &density_bb;

    let coulomb = utils::symmetric_matrix(n_basis, |i, j| {
        let mut sum = 0.0;
        for x in 0..n_basis {
            for y in 0..n_basis {
                sum += charge_density[(x, y)] * multi[(i, j, x, y)];
            }
        }
        sum
    });
    let exchange = |spin_density: &DMatrix<f64>| {
        DMatrix::from_fn(n_basis, n_basis, |i, j| {
            let mut sum = 0.0;
            for x in 0..n_basis {
                for y in 0..n_basis {
                    sum += spin_density[(x, y)] * multi[(i, x, j, y)];
                }
            }
            sum
        })
    };

    spin_blocks(
        &(&coulomb - exchange(&density_aa)),
        &(-exchange(&density_ab)),
        &(-exchange(&density_ba)),
        &(&coulomb - exchange(&density_bb)),
    )
}

fn compute_updated_density(
    coefficients: &DMatrix<f64>,
    n_spinor: usize,
    n_occupied: usize,
) -> DMatrix<f64> {
    utils::symmetric_matrix(n_spinor, |i, j| {
        let mut sum = 0.0;
        for k in 0..n_occupied {
            sum += coefficients[(i, k)] * coefficients[(j, k)];
        }
        sum
    })
}
