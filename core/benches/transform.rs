use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Vector3;

use prep_core::{
    ao2mo::MoEri,
    atom::Atom,
    basis::BasisSet,
    config::ConfigBasisSet,
    hf::{restricted_hartree_fock, HartreeFockInput, MolecularElectronConfig},
    molecule::Molecule,
    periodic_table::ElementType,
};

const B_6_31G: &str = r#"{"molssi_bse_schema":{"schema_type":"complete","schema_version":"0.1"},"revision_description":"DatafromGaussian09/GAMESS","revision_date":"2018-06-19","elements":{"1":{"electron_shells":[{"function_type":"gto","region":"valence","angular_momentum":[0],"exponents":["0.1873113696E+02","0.2825394365E+01","0.6401216923E+00"],"coefficients":[["0.3349460434E-01","0.2347269535E+00","0.8137573261E+00"]]},{"function_type":"gto","region":"valence","angular_momentum":[0],"exponents":["0.1612777588E+00"],"coefficients":[["1.0000000"]]}],"references":[{"reference_description":"31GSplit-valencebasissetforH,He","reference_keys":["ditchfield1971a"]}]}},"version":"1","function_types":["gto"],"names":["6-31G"],"tags":[],"family":"pople","description":"6-31Gvalencedouble-zeta","role":"orbital","auxiliaries":{},"name":"6-31G"}"#;

fn bench_transform(c: &mut Criterion) {
    let molecule = Molecule::new(vec![
        Atom::new(ElementType::H, Vector3::new(0.0, 0.0, 0.0)),
        Atom::new(ElementType::H, Vector3::new(0.0, 0.0, 1.4)),
    ]);
    let basis_set: ConfigBasisSet = serde_json::from_str(B_6_31G).unwrap();
    let basis_set = BasisSet::try_from(basis_set).unwrap();

    let input = HartreeFockInput {
        molecule: &molecule,
        configuration: MolecularElectronConfig::ClosedShell,
        basis_set: &basis_set,
        max_iterations: 100,
        epsilon: 1e-8,
    };

    c.bench_function("RHF hydrogen 6-31G", |b| {
        b.iter(|| restricted_hartree_fock(&input).unwrap())
    });

    let hf = restricted_hartree_fock(&input).unwrap();
    c.bench_function("AO to MO transform hydrogen 6-31G", |b| {
        b.iter(|| MoEri::transform(&hf.electron, &hf.coefficients).unwrap())
    });
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
