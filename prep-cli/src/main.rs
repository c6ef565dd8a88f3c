use std::{fs::File, num::NonZeroU32, path::PathBuf, time::Instant};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use rand::{rngs::StdRng, SeedableRng};

use prep_core::{
    active_space::{effective_hamiltonian, ActiveSpace},
    ao2mo::MoEri,
    basis::BasisSet,
    config::{ConfigBasisSet, ConfigMolecule},
    fcidump,
    hf::{
        generalized_hartree_fock, restricted_hartree_fock, unrestricted_hartree_fock,
        HartreeFockInput, MolecularElectronConfig,
    },
    localize, matio,
    molecule::Molecule,
    pairing,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: PrepCommand,
}

#[derive(Subcommand, Debug)]
enum PrepCommand {
    /// Run a restricted hartree fock calculation and report the energies
    #[command(name = "rhf")]
    RestrictedHartreeFock {
        /// What basis set to use for the hartree fock calculation
        #[arg(long, short)]
        basis_set: PathBuf,
        /// A path to the molecule to perform the calculation on
        #[arg(long, short)]
        molecule: PathBuf,
        /// The maximum number of iterations the SCF loop should attempt before the
        /// system is considered to not converge
        #[arg(long, default_value_t = 100)]
        max_iterations: usize,
        /// if the rms of the density matrix drops below this, the system is considered
        /// converged
        #[arg(long, default_value_t = 1e-6)]
        epsilon: f64,
    },
    /// Run an unrestricted hartree fock calculation and report the energies
    #[command(name = "uhf")]
    UnrestrictedHartreeFock {
        /// What basis set to use for the hartree fock calculation
        #[arg(long, short)]
        basis_set: PathBuf,
        /// A path to the molecule to perform the calculation on
        #[arg(long, short)]
        molecule: PathBuf,
        /// The charge of the molecule
        #[arg(long, short, default_value_t = 0)]
        charge: i32,
        /// The spin multiplicity of the molecule
        #[arg(long, short, default_value_t = 1)]
        spin_multiplicity: u32,
        /// Seed for the random perturbation of the initial guess
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// The maximum number of iterations the SCF loop should attempt before the
        /// system is considered to not converge
        #[arg(long, default_value_t = 100)]
        max_iterations: usize,
        /// if the rms of the density matrix drops below this, the system is considered
        /// converged
        #[arg(long, default_value_t = 1e-6)]
        epsilon: f64,
    },
    /// Run the full preparation pipeline: mean field, localization, active
    /// space integrals and pairing matrices, written as text files
    #[command(name = "prep")]
    Prepare {
        /// What basis set to use for the hartree fock calculation
        #[arg(long, short)]
        basis_set: PathBuf,
        /// A path to the molecule to perform the calculation on
        #[arg(long, short)]
        molecule: PathBuf,
        /// Which localization scheme to apply to the converged orbitals
        #[arg(long, short, value_enum, default_value = "lowdin")]
        localization: LocalizationArg,
        /// Mix the localized orbitals on each atom by a random rotation
        #[arg(long)]
        scramble: bool,
        /// Number of doubly occupied orbitals frozen into the core
        #[arg(long, default_value_t = 0)]
        n_core: usize,
        /// Number of orbitals in the active window; all remaining orbitals
        /// if not given
        #[arg(long)]
        n_active: Option<usize>,
        /// Also run a generalized (spinor) calculation and write the
        /// pfaffian pairing matrix derived from it
        #[arg(long)]
        ghf: bool,
        /// Perturb the pairing matrices by uniform noise of this magnitude
        #[arg(long)]
        noise: Option<f64>,
        /// Seed for the scrambling, noise and spinor guess randomness
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Where to put the output files
        #[arg(long, short, default_value = ".")]
        output_dir: PathBuf,
        #[arg(long, default_value_t = 200)]
        max_iterations: usize,
        #[arg(long, default_value_t = 1e-8)]
        epsilon: f64,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LocalizationArg {
    Lowdin,
    PipekMezey,
    Boys,
    PipekMezeyFromLowdin,
}

impl From<LocalizationArg> for localize::Localization {
    fn from(value: LocalizationArg) -> Self {
        match value {
            LocalizationArg::Lowdin => Self::Lowdin,
            LocalizationArg::PipekMezey => Self::PipekMezey,
            LocalizationArg::Boys => Self::Boys,
            LocalizationArg::PipekMezeyFromLowdin => Self::PipekMezeyFromLowdin,
        }
    }
}

fn load_molecule(path: &PathBuf) -> anyhow::Result<Molecule> {
    let config: ConfigMolecule = serde_json::from_reader(
        File::open(path).with_context(|| format!("opening molecule file {}", path.display()))?,
    )
    .context("parsing molecule file")?;
    Ok(Molecule::try_from(config)?)
}

fn load_basis_set(path: &PathBuf) -> anyhow::Result<BasisSet> {
    let config: ConfigBasisSet = serde_json::from_reader(
        File::open(path).with_context(|| format!("opening basis set file {}", path.display()))?,
    )
    .context("parsing basis set file")?;
    Ok(BasisSet::try_from(config)?)
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args: Args = Args::parse();

    match args.command {
        PrepCommand::RestrictedHartreeFock {
            basis_set,
            molecule,
            max_iterations,
            epsilon,
        } => {
            let basis_set = load_basis_set(&basis_set)?;
            let molecule = load_molecule(&molecule)?;

            let start = Instant::now();
            let output = restricted_hartree_fock(&HartreeFockInput {
                molecule: &molecule,
                configuration: MolecularElectronConfig::ClosedShell,
                basis_set: &basis_set,
                max_iterations,
                epsilon,
            })?;

            println!(
                "hartree fock converged after {} iterations and {:0.2?}",
                output.iterations,
                start.elapsed()
            );
            println!("electronic energy: {:3.6}", output.electronic_energy);
            println!("nuclear repulsion energy: {:3.6}", output.nuclear_repulsion);
            println!("hartree fock energy: {:3.6}", output.total_energy());
            println!("orbital energies: {:3.3?}", output.orbital_energies);
        }

        PrepCommand::UnrestrictedHartreeFock {
            basis_set,
            molecule,
            charge,
            spin_multiplicity,
            seed,
            max_iterations,
            epsilon,
        } => {
            let basis_set = load_basis_set(&basis_set)?;
            let molecule = load_molecule(&molecule)?;

            let configuration = match NonZeroU32::new(spin_multiplicity) {
                Some(spin_multiplicity) if charge != 0 || spin_multiplicity.get() != 1 => {
                    MolecularElectronConfig::OpenShell {
                        molecular_charge: charge,
                        spin_multiplicity,
                    }
                }
                Some(_) => MolecularElectronConfig::ClosedShell,
                None => anyhow::bail!("spin multiplicity must be at least 1"),
            };

            let mut rng = StdRng::seed_from_u64(seed);

            let start = Instant::now();
            let output = unrestricted_hartree_fock(
                &HartreeFockInput {
                    molecule: &molecule,
                    configuration,
                    basis_set: &basis_set,
                    max_iterations,
                    epsilon,
                },
                &mut rng,
            )?;

            println!(
                "hartree fock converged after {} iterations and {:0.2?}",
                output.iterations,
                start.elapsed()
            );
            println!("electronic energy: {:3.6}", output.electronic_energy);
            println!("nuclear repulsion energy: {:3.6}", output.nuclear_repulsion);
            println!("hartree fock energy: {:3.6}", output.total_energy());
            println!(
                "orbital energies alpha spin: {:3.3?}",
                output.orbital_energies_alpha
            );
            println!(
                "orbital energies beta spin: {:3.3?}",
                output.orbital_energies_beta
            );
        }

        PrepCommand::Prepare {
            basis_set,
            molecule,
            localization,
            scramble,
            n_core,
            n_active,
            ghf,
            noise,
            seed,
            output_dir,
            max_iterations,
            epsilon,
        } => {
            let basis_set = load_basis_set(&basis_set)?;
            let molecule = load_molecule(&molecule)?;
            let mut rng = StdRng::seed_from_u64(seed);

            let start = Instant::now();
            let hf = restricted_hartree_fock(&HartreeFockInput {
                molecule: &molecule,
                configuration: MolecularElectronConfig::ClosedShell,
                basis_set: &basis_set,
                max_iterations,
                epsilon,
            })?;
            log::info!(
                "mean field converged after {} iterations and {:0.2?}, energy {:3.6}",
                hf.iterations,
                start.elapsed(),
                hf.total_energy()
            );

            let active_electrons = hf
                .n_electrons
                .checked_sub(2 * n_core)
                .context("more core orbitals than electron pairs")?;
            let n_orbitals = hf.coefficients.ncols();
            let n_active = n_active.unwrap_or(n_orbitals - n_core);
            let space = ActiveSpace { n_core, n_active };

            // the orbital set every output file is expressed in
            let orbitals = if n_core == 0 {
                let mut localized = localize::localize_orbitals(localization.into(), &hf);
                if scramble {
                    localized = localize::scramble_atom_blocks(&localized, &hf.basis, &mut rng);
                }
                localized
            } else {
                // freezing a core only makes sense over the energy-ordered
                // canonical orbitals; the core columns stay put and only the
                // active window rotates among itself
                if scramble {
                    anyhow::bail!("--scramble mixes orbitals across the core boundary");
                }
                let window = hf.coefficients.columns(n_core, n_active).into_owned();
                let rotated = match localization {
                    LocalizationArg::PipekMezey => {
                        localize::pipek_mezey(&window, &hf.overlap, &hf.basis)
                    }
                    LocalizationArg::Boys => localize::boys(&window, &hf.basis),
                    LocalizationArg::Lowdin | LocalizationArg::PipekMezeyFromLowdin => {
                        anyhow::bail!(
                            "lowdin orbitals replace the whole set and cannot keep a \
                             frozen core; use pipek-mezey or boys together with --n-core"
                        )
                    }
                };
                let mut orbitals = hf.coefficients.clone();
                for (local, column) in (n_core..n_core + n_active).enumerate() {
                    orbitals.set_column(column, &rotated.column(local));
                }
                orbitals
            };

            // the canonical orbitals, expressed over that set
            let canonical = localize::basis_change(&hf.coefficients, &hf.overlap, &orbitals)?;
            matio::write_real_matrix(output_dir.join("hf.txt"), &canonical)?;

            let effective = effective_hamiltonian(
                &orbitals,
                &hf.core_hamiltonian,
                &hf.electron,
                hf.nuclear_repulsion,
                space,
            )?;
            let active = orbitals.columns(n_core, n_active).into_owned();
            let eri = MoEri::transform(&hf.electron, &active)?;
            fcidump::write_fcidump(
                output_dir.join("FCIDUMP"),
                &effective.h1,
                &eri,
                active_electrons,
                0,
                effective.core_energy,
            )?;
            log::info!(
                "wrote {n_active} active orbitals with {active_electrons} electrons, core energy {:3.6}",
                effective.core_energy
            );

            // pairing matrix of the geminal power, over the same orbital set
            let to_localized = orbitals.transpose() * &hf.overlap;
            let mut agp = &to_localized * pairing::agp_from_rhf(&hf) * to_localized.transpose();
            if let Some(scale) = noise {
                pairing::add_noise(&mut agp, scale, &mut rng);
            }
            matio::write_real_matrix(output_dir.join("agp.txt"), &agp)?;

            if ghf {
                let spinor = generalized_hartree_fock(
                    &HartreeFockInput {
                        molecule: &molecule,
                        configuration: MolecularElectronConfig::ClosedShell,
                        basis_set: &basis_set,
                        max_iterations,
                        epsilon,
                    },
                    &mut rng,
                )?;
                log::info!(
                    "spinor mean field converged after {} iterations, energy {:3.6}",
                    spinor.iterations,
                    spinor.total_energy()
                );

                matio::write_real_matrix(output_dir.join("ghf.txt"), &spinor.coefficients)?;

                let mut pfaffian = pairing::pfaffian_from_ghf(&spinor)?;
                if let Some(scale) = noise {
                    pairing::add_noise(&mut pfaffian, scale, &mut rng);
                }
                matio::write_real_matrix(output_dir.join("pfaffian.txt"), &pfaffian)?;
            }

            println!(
                "prepared {} orbitals ({n_core} core, {n_active} active) in {:0.2?}",
                n_orbitals,
                start.elapsed()
            );
        }
    }

    Ok(())
}
