use std::collections::HashMap;

use serde::Deserialize;
use smallvec::SmallVec;

use crate::{
    basis::{AtomicBasis, BasisSet, ContractedGaussian, ElectronShell, Gaussian},
    error::Error,
    periodic_table::ElementType,
};

/// A basis set as downloaded from the basis set exchange (MolSSI BSE schema).
#[derive(Deserialize)]
pub struct ConfigBasisSet {
    elements: HashMap<ElementType, ConfigElectronicConfiguration>,
}

#[derive(Deserialize)]
struct ConfigElectronicConfiguration {
    electron_shells: Vec<ConfigElectronShell>,
}

#[derive(Deserialize)]
#[allow(unused)]
struct ConfigElectronShell {
    function_type: String,
    angular_momentum: Vec<i32>,
    exponents: Vec<String>,
    coefficients: Vec<Vec<String>>,
}

impl TryFrom<ConfigBasisSet> for BasisSet {
    type Error = Error;

    fn try_from(value: ConfigBasisSet) -> Result<Self, Self::Error> {
        let mut atomic_mapping = HashMap::with_capacity(value.elements.len());

        for (element, configuration) in value.elements {
            let mut element_atomic_basis = AtomicBasis::empty();

            for electron_shell in &configuration.electron_shells {
                for (index, &angular_magnitude) in
                    electron_shell.angular_momentum.iter().enumerate()
                {
                    let contraction =
                        electron_shell.coefficients.get(index).ok_or_else(|| {
                            Error::BasisSet(format!(
                                "element {}: missing contraction coefficients for shell with l={angular_magnitude}",
                                element.symbol()
                            ))
                        })?;

                    let mut shell = ElectronShell::new(angular_magnitude);

                    for angular in angular_vectors(angular_magnitude) {
                        let mut primitives = SmallVec::with_capacity(electron_shell.exponents.len());

                        for (exponent, coefficient) in
                            electron_shell.exponents.iter().zip(contraction)
                        {
                            let exponent = parse_number(exponent, element)?;
                            let coefficient = parse_number(coefficient, element)?;

                            let norm = Gaussian::norm(exponent, angular);

                            primitives.push(Gaussian {
                                exponent,
                                coefficient: coefficient * norm,
                                angular,
                            });
                        }

                        shell
                            .basis_functions
                            .push(ContractedGaussian(primitives));
                    }

                    element_atomic_basis.shells.push(shell);
                }
            }

            atomic_mapping.insert(element, element_atomic_basis);
        }

        Ok(Self::new(atomic_mapping))
    }
}

fn parse_number(raw: &str, element: ElementType) -> Result<f64, Error> {
    raw.parse::<f64>().map_err(|_| {
        Error::BasisSet(format!(
            "element {}: {raw:?} is not a number",
            element.symbol()
        ))
    })
}

// generate all (i, j, k) such that i + j + k = angular
fn angular_vectors(angular_magnitude: i32) -> Vec<(i32, i32, i32)> {
    let mut angular_vectors = Vec::with_capacity(8);

    for (i, j, k) in itertools::iproduct!(
        0..=angular_magnitude,
        0..=angular_magnitude,
        0..=angular_magnitude
    ) {
        if i + j + k == angular_magnitude {
            angular_vectors.push((i, j, k));
        }
    }

    angular_vectors
}

#[cfg(test)]
mod tests {
    use super::ConfigBasisSet;
    use crate::basis::BasisSet;

    const STO_3G_H: &str = r#"{"elements":{"1":{"electron_shells":[{"function_type":"gto","region":"","angular_momentum":[0],"exponents":["0.3425250914E+01","0.6239137298E+00","0.1688554040E+00"],"coefficients":[["0.1543289673E+00","0.5353281423E+00","0.4446345422E+00"]]}]}}}"#;

    #[test]
    fn hydrogen_sto_3g_has_one_s_function() {
        let config: ConfigBasisSet = serde_json::from_str(STO_3G_H).unwrap();
        let basis_set = BasisSet::try_from(config).unwrap();

        let atom = crate::atom::Atom::new(
            crate::periodic_table::ElementType::H,
            nalgebra::Vector3::zeros(),
        );
        let atomic = basis_set.for_atom(&atom).unwrap();
        assert_eq!(atomic.basis_functions().count(), 1);
        assert_eq!(atomic.basis_functions().next().unwrap().0.len(), 3);
    }
}
