use nalgebra::DMatrix;

/// Symmetrically orthogonalized atomic orbitals: the columns of S^{-1/2}.
/// Each orbital stays as close to its parent atomic orbital as an
/// orthonormal set can, which makes this the cheapest useful local basis.
pub fn lowdin_orbitals(overlap: &DMatrix<f64>) -> DMatrix<f64> {
    crate::hf::operators::transformation_matrix(overlap)
}
