//! Hermitian eigen-decomposition helpers backed by `nalgebra`.

use nalgebra::{DMatrix, DVector};
use ndarray::Array2;
use num_complex::Complex64;

fn to_hermitian(m: &Array2<Complex64>) -> DMatrix<Complex64> {
    let (rows, cols) = m.dim();
    let dense = DMatrix::from_fn(rows, cols, |r, c| m[[r, c]]);
    // Symmetrise so rounding noise cannot push the solver off the Hermitian path.
    (&dense + dense.adjoint()) * Complex64::new(0.5, 0.0)
}

/// Eigenvalues of a Hermitian matrix, ascending.
pub fn hermitian_eigenvalues(m: &Array2<Complex64>) -> Vec<f64> {
    let mut values: Vec<f64> = to_hermitian(m).symmetric_eigenvalues().iter().copied().collect();
    values.sort_by(f64::total_cmp);
    values
}

/// Principal square root of a positive semi-definite Hermitian matrix.
///
/// Negative eigenvalues produced by rounding are clamped to zero.
pub fn psd_sqrt(m: &Array2<Complex64>) -> Array2<Complex64> {
    let eigen = to_hermitian(m).symmetric_eigen();
    let roots = DVector::from_iterator(
        eigen.eigenvalues.len(),
        eigen
            .eigenvalues
            .iter()
            .map(|&l| Complex64::new(l.max(0.0).sqrt(), 0.0)),
    );
    let v = &eigen.eigenvectors;
    let root = v * DMatrix::from_diagonal(&roots) * v.adjoint();
    Array2::from_shape_fn((root.nrows(), root.ncols()), |(r, c)| root[(r, c)])
}
