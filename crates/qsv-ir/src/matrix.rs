//! Validated unitary matrices for custom gates.

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::complex::WireComplex;
use crate::error::{IrError, IrResult};

/// Tolerance of the unitarity check, applied entry-wise to `U†U - I`.
pub const UNITARITY_TOLERANCE: f64 = 1e-10;

/// A `2^k x 2^k` unitary matrix acting on `k` qubits.
///
/// The unitarity check runs once, when the matrix is constructed; the
/// simulator trusts it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<WireComplex>>", into = "Vec<Vec<WireComplex>>")]
pub struct UnitaryMatrix {
    data: Array2<Complex64>,
    num_qubits: usize,
}

impl UnitaryMatrix {
    /// Validate `data` and wrap it.
    pub fn new(name: &str, data: Array2<Complex64>) -> IrResult<Self> {
        let (rows, cols) = data.dim();
        if rows != cols || rows < 2 || !rows.is_power_of_two() {
            return Err(IrError::InvalidMatrixShape {
                gate_name: name.to_string(),
                rows,
                cols,
            });
        }

        let deviation = if data.iter().all(|c| c.is_finite()) {
            unitarity_deviation(&data)
        } else {
            f64::INFINITY
        };
        if deviation > UNITARITY_TOLERANCE {
            return Err(IrError::NotUnitary {
                gate_name: name.to_string(),
                deviation,
            });
        }

        Ok(Self {
            num_qubits: rows.trailing_zeros() as usize,
            data,
        })
    }

    /// Build from row-major nested rows.
    pub fn from_rows(name: &str, rows: &[Vec<Complex64>]) -> IrResult<Self> {
        let dim = rows.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != dim) {
            return Err(IrError::InvalidMatrixShape {
                gate_name: name.to_string(),
                rows: dim,
                cols: bad.len(),
            });
        }
        let data = Array2::from_shape_fn((dim, dim), |(r, c)| rows[r][c]);
        Self::new(name, data)
    }

    /// Number of qubits the matrix acts on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Matrix dimension (`2^k`).
    #[inline]
    pub fn dim(&self) -> usize {
        self.data.nrows()
    }

    /// Entry `U[row][col]`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[[row, col]]
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &Array2<Complex64> {
        &self.data
    }

    /// Row-major nested rows.
    pub fn to_rows(&self) -> Vec<Vec<Complex64>> {
        self.data.rows().into_iter().map(|row| row.to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<WireComplex>>> for UnitaryMatrix {
    type Error = IrError;

    fn try_from(rows: Vec<Vec<WireComplex>>) -> IrResult<Self> {
        let rows: Vec<Vec<Complex64>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Complex64::from).collect())
            .collect();
        Self::from_rows("custom", &rows)
    }
}

impl From<UnitaryMatrix> for Vec<Vec<WireComplex>> {
    fn from(matrix: UnitaryMatrix) -> Self {
        matrix
            .data
            .rows()
            .into_iter()
            .map(|row| row.iter().copied().map(WireComplex::from).collect())
            .collect()
    }
}

/// Largest entry of `|U†U - I|`.
pub fn unitarity_deviation(u: &Array2<Complex64>) -> f64 {
    let product = u.t().mapv(|c| c.conj()).dot(u);
    product
        .indexed_iter()
        .map(|((r, c), value)| {
            let expected = if r == c { 1.0 } else { 0.0 };
            (value - Complex64::new(expected, 0.0)).norm()
        })
        .fold(0.0, f64::max)
}

/// Build a 2x2 matrix from its four entries.
pub fn mat2(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Array2<Complex64> {
    ndarray::arr2(&[[a, b], [c, d]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::{I, ONE, ZERO};
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_accepts_hadamard() {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let m = UnitaryMatrix::from_rows("h", &[vec![h, h], vec![h, -h]]).unwrap();
        assert_eq!(m.num_qubits(), 1);
        assert_eq!(m.dim(), 2);
    }

    #[test]
    fn test_accepts_two_qubit_permutation() {
        let mut rows = vec![vec![ZERO; 4]; 4];
        rows[0][0] = ONE;
        rows[1][2] = ONE;
        rows[2][1] = I;
        rows[3][3] = -ONE;
        let m = UnitaryMatrix::from_rows("perm", &rows).unwrap();
        assert_eq!(m.num_qubits(), 2);
        assert_eq!(m.get(2, 1), I);
    }

    #[test]
    fn test_rejects_non_unitary() {
        let err = UnitaryMatrix::from_rows("bad", &[vec![ONE, ONE], vec![ZERO, ONE]]).unwrap_err();
        assert!(matches!(err, IrError::NotUnitary { .. }));
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let ragged = UnitaryMatrix::from_rows("r", &[vec![ONE, ZERO], vec![ZERO]]);
        assert!(matches!(ragged, Err(IrError::InvalidMatrixShape { .. })));

        let three = vec![vec![ZERO; 3]; 3];
        assert!(matches!(
            UnitaryMatrix::from_rows("three", &three),
            Err(IrError::InvalidMatrixShape { rows: 3, .. })
        ));

        assert!(matches!(
            UnitaryMatrix::from_rows("scalar", &[vec![ONE]]),
            Err(IrError::InvalidMatrixShape { .. })
        ));
    }

    #[test]
    fn test_rejects_nan_entries() {
        let nan = Complex64::new(f64::NAN, 0.0);
        let err = UnitaryMatrix::from_rows("nan", &[vec![nan, ZERO], vec![ZERO, ONE]]);
        assert!(matches!(err, Err(IrError::NotUnitary { .. })));
    }

    #[test]
    fn test_serde_uses_nested_rows() {
        let m = UnitaryMatrix::from_rows("x", &[vec![ZERO, ONE], vec![ONE, ZERO]]).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let back: UnitaryMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);

        let bad: Result<UnitaryMatrix, _> = serde_json::from_str(r#"[["1", "1"], ["0", "1"]]"#);
        assert!(bad.is_err());
    }
}
