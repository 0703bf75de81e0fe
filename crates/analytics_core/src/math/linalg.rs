//! Dense linear algebra on row-major `Vec<Vec<f64>>` matrices.
//!
//! Every routine validates its operands and reports degenerate cases
//! (ragged rows, singular systems, zero vectors) as [`LinalgError`].
//!
//! # Example
//!
//! ```
//! use analytics_core::math::linalg::{invert, product, InversionMethod};
//!
//! let a = vec![vec![4.0, 7.0], vec![2.0, 6.0]];
//! let inv = invert(&a, InversionMethod::GaussianElimination).unwrap();
//! let id = product(&a, &inv).unwrap();
//! assert!((id[0][0] - 1.0).abs() < 1e-12 && id[0][1].abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::LinalgError;

/// Row-major dense matrix.
pub type Matrix = Vec<Vec<f64>>;

/// Entries with magnitude at or below this are treated as zero pivots.
const PIVOT_FLOOR: f64 = 1.0e-13;

fn shape(a: &[Vec<f64>]) -> Result<(usize, usize), LinalgError> {
    let rows = a.len();
    let cols = a.first().map(Vec::len).ok_or(LinalgError::NotRectangular)?;
    if cols == 0 || a.iter().any(|r| r.len() != cols) {
        return Err(LinalgError::NotRectangular);
    }
    for (i, row) in a.iter().enumerate() {
        if let Some(j) = row.iter().position(|x| !x.is_finite()) {
            return Err(LinalgError::NonFinite { row: i, col: j });
        }
    }
    Ok((rows, cols))
}

fn square_size(a: &[Vec<f64>]) -> Result<usize, LinalgError> {
    let (rows, cols) = shape(a)?;
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    Ok(rows)
}

fn check_vector(v: &[f64]) -> Result<(), LinalgError> {
    if v.is_empty() {
        return Err(LinalgError::DimensionMismatch {
            expected: 1,
            got: 0,
        });
    }
    match v.iter().position(|x| !x.is_finite()) {
        Some(j) => Err(LinalgError::NonFinite { row: 0, col: j }),
        None => Ok(()),
    }
}

fn same_length(a: &[f64], b: &[f64]) -> Result<(), LinalgError> {
    check_vector(a)?;
    check_vector(b)?;
    if a.len() != b.len() {
        return Err(LinalgError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    Ok(())
}

/// Identity matrix of the given size.
pub fn identity(size: usize) -> Matrix {
    (0..size)
        .map(|i| (0..size).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

/// Matrix times column vector.
pub fn product_matrix_vector(a: &[Vec<f64>], v: &[f64]) -> Result<Vec<f64>, LinalgError> {
    let (_, cols) = shape(a)?;
    check_vector(v)?;
    if cols != v.len() {
        return Err(LinalgError::DimensionMismatch {
            expected: cols,
            got: v.len(),
        });
    }
    Ok(a.iter()
        .map(|row| row.iter().zip(v).map(|(x, y)| x * y).sum())
        .collect())
}

/// Row vector times matrix.
pub fn product_vector_matrix(v: &[f64], a: &[Vec<f64>]) -> Result<Vec<f64>, LinalgError> {
    let (rows, cols) = shape(a)?;
    check_vector(v)?;
    if rows != v.len() {
        return Err(LinalgError::DimensionMismatch {
            expected: rows,
            got: v.len(),
        });
    }
    Ok((0..cols)
        .map(|j| v.iter().zip(a).map(|(x, row)| x * row[j]).sum())
        .collect())
}

/// Matrix product `A · B`.
pub fn product(a: &[Vec<f64>], b: &[Vec<f64>]) -> Result<Matrix, LinalgError> {
    let (_, inner) = shape(a)?;
    let (b_rows, b_cols) = shape(b)?;
    if inner != b_rows {
        return Err(LinalgError::DimensionMismatch {
            expected: inner,
            got: b_rows,
        });
    }
    Ok(a.iter()
        .map(|row| {
            (0..b_cols)
                .map(|j| row.iter().zip(b).map(|(x, b_row)| x * b_row[j]).sum())
                .collect()
        })
        .collect())
}

/// Square matrix with `diagonal` on the diagonal.
pub fn make_square_diagonal(diagonal: &[f64]) -> Result<Matrix, LinalgError> {
    check_vector(diagonal)?;
    let n = diagonal.len();
    Ok((0..n)
        .map(|i| (0..n).map(|j| if i == j { diagonal[i] } else { 0.0 }).collect())
        .collect())
}

/// True when every off-diagonal entry of a square matrix is zero.
pub fn is_diagonal(a: &[Vec<f64>]) -> Result<bool, LinalgError> {
    square_size(a)?;
    Ok(a.iter()
        .enumerate()
        .all(|(i, row)| row.iter().enumerate().all(|(j, &x)| i == j || x == 0.0)))
}

/// Transpose.
pub fn transpose(a: &[Vec<f64>]) -> Result<Matrix, LinalgError> {
    let (rows, cols) = shape(a)?;
    Ok((0..cols)
        .map(|j| (0..rows).map(|i| a[i][j]).collect())
        .collect())
}

/// Multiply every element of a vector by `factor`.
pub fn scale_1d(v: &[f64], factor: f64) -> Result<Vec<f64>, LinalgError> {
    check_vector(v)?;
    check_vector(&[factor])?;
    Ok(v.iter().map(|x| x * factor).collect())
}

/// Multiply every element of a matrix by `factor`.
pub fn scale_2d(a: &[Vec<f64>], factor: f64) -> Result<Matrix, LinalgError> {
    shape(a)?;
    check_vector(&[factor])?;
    Ok(a.iter()
        .map(|row| row.iter().map(|x| x * factor).collect())
        .collect())
}

/// Dot product.
pub fn dot_product(a: &[f64], b: &[f64]) -> Result<f64, LinalgError> {
    same_length(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Outer product `a bᵀ`.
pub fn cross_product(a: &[f64], b: &[f64]) -> Result<Matrix, LinalgError> {
    check_vector(a)?;
    check_vector(b)?;
    Ok(a.iter()
        .map(|x| b.iter().map(|y| x * y).collect())
        .collect())
}

/// Projection of `a` onto the direction of `e`.
pub fn project(a: &[f64], e: &[f64]) -> Result<Vec<f64>, LinalgError> {
    let norm_sq = dot_product(e, e)?;
    if norm_sq == 0.0 {
        return Err(LinalgError::ZeroVector);
    }
    let amplitude = dot_product(a, e)? / norm_sq;
    Ok(e.iter().map(|x| x * amplitude).collect())
}

/// Sum of the entries.
pub fn sum(v: &[f64]) -> Result<f64, LinalgError> {
    check_vector(v)?;
    Ok(v.iter().sum())
}

/// Euclidean norm.
pub fn modulus(v: &[f64]) -> Result<f64, LinalgError> {
    check_vector(v)?;
    Ok(v.iter().map(|x| x * x).sum::<f64>().sqrt())
}

/// Unit vector in the direction of `v`.
pub fn normalize(v: &[f64]) -> Result<Vec<f64>, LinalgError> {
    let norm = modulus(v)?;
    if norm == 0.0 {
        return Err(LinalgError::ZeroVector);
    }
    Ok(v.iter().map(|x| x / norm).collect())
}

/// True when no entry is negative.
pub fn positive_or_zero(v: &[f64]) -> Result<bool, LinalgError> {
    check_vector(v)?;
    Ok(v.iter().all(|&x| x >= 0.0))
}

/// True when no entry is positive.
pub fn negative_or_zero(v: &[f64]) -> Result<bool, LinalgError> {
    check_vector(v)?;
    Ok(v.iter().all(|&x| x <= 0.0))
}

/// True when the vector has entries of both signs, so no non-negative
/// multiple of it lies in a single orthant.
pub fn positive_linearly_independent(v: &[f64]) -> Result<bool, LinalgError> {
    Ok(!positive_or_zero(v)? && !negative_or_zero(v)?)
}

/// Inverse of a 2 x 2 matrix by Cramer's rule.
pub fn invert_2d_cramer(a: &[Vec<f64>]) -> Result<Matrix, LinalgError> {
    let n = square_size(a)?;
    if n != 2 {
        return Err(LinalgError::DimensionMismatch {
            expected: 2,
            got: n,
        });
    }
    let det = a[0][0] * a[1][1] - a[0][1] * a[1][0];
    if det == 0.0 {
        return Err(LinalgError::Singular);
    }
    Ok(vec![
        vec![a[1][1] / det, -a[0][1] / det],
        vec![-a[1][0] / det, a[0][0] / det],
    ])
}

/// A square source matrix paired with the accumulated row operations applied to it.
///
/// Starting from `(A, I)`, every row operation is applied to both halves, so
/// once `source` is reduced to the identity `complement` holds `A⁻¹`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplementTransform {
    /// Matrix being reduced.
    pub source: Matrix,
    /// Row operations accumulated so far.
    pub complement: Matrix,
}

impl ComplementTransform {
    /// Pair `a` with the identity.
    pub fn new(a: &[Vec<f64>]) -> Result<Self, LinalgError> {
        let n = square_size(a)?;
        Ok(Self {
            source: a.to_vec(),
            complement: identity(n),
        })
    }

    /// Matrix dimension.
    pub fn size(&self) -> usize {
        self.source.len()
    }

    fn swap_rows(&mut self, i: usize, j: usize) {
        self.source.swap(i, j);
        self.complement.swap(i, j);
    }

    fn add_row(&mut self, target: usize, from: usize, factor: f64) {
        let n = self.size();
        for col in 0..n {
            self.source[target][col] += factor * self.source[from][col];
            self.complement[target][col] += factor * self.complement[from][col];
        }
    }
}

/// Make a zero diagonal entry non-zero by adding a lower row with a non-zero
/// entry in the same column. Returns `false` when the column is entirely zero.
pub fn diagonalize_row(transform: &mut ComplementTransform, row: usize) -> bool {
    if transform.source[row][row] != 0.0 {
        return true;
    }
    let candidate = (0..transform.size())
        .rev()
        .find(|&p| p != row && transform.source[p][row] != 0.0);
    match candidate {
        Some(p) => {
            transform.add_row(row, p, 1.0);
            true
        }
        None => false,
    }
}

fn largest_in_column(
    source: &[Vec<f64>],
    col: usize,
    rows: impl Iterator<Item = usize>,
) -> Option<usize> {
    rows.filter(|&r| source[r][col] != 0.0)
        .max_by(|&x, &y| source[x][col].abs().total_cmp(&source[y][col].abs()))
}

/// Remove zero diagonal entries by swapping in the row with the largest
/// magnitude in that column.
///
/// Rows below the deficient one are tried first. An earlier row is only
/// taken when the swap leaves its own diagonal non-zero.
pub fn regularize_using_row_swap(transform: &mut ComplementTransform) -> bool {
    let n = transform.size();
    for diag in 0..n {
        if transform.source[diag][diag] != 0.0 {
            continue;
        }
        let source = &transform.source;
        let below = largest_in_column(source, diag, diag + 1..n);
        let best = below.or_else(|| {
            largest_in_column(
                source,
                diag,
                (0..diag).filter(|&r| source[diag][r] != 0.0),
            )
        });
        match best {
            Some(r) => transform.swap_rows(diag, r),
            None => return false,
        }
    }
    true
}

/// Remove zero diagonal entries by adding another row into the deficient one.
pub fn regularize_using_row_addition(transform: &mut ComplementTransform) -> bool {
    (0..transform.size()).all(|diag| diagonalize_row(transform, diag))
}

/// Copy `a` into a [`ComplementTransform`] and regularise its diagonal by row swaps.
pub fn pivot_diagonal(a: &[Vec<f64>]) -> Result<ComplementTransform, LinalgError> {
    let mut transform = ComplementTransform::new(a)?;
    if !regularize_using_row_swap(&mut transform) {
        return Err(LinalgError::Singular);
    }
    Ok(transform)
}

/// Row regularisation strategy used ahead of Gauss-Jordan elimination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InversionMethod {
    /// 2 x 2 closed form.
    Cramer,
    /// Gauss-Jordan elimination with row-swap pivoting.
    GaussianElimination,
    /// Gauss-Jordan elimination after row-addition regularisation.
    GaussianRowAddition,
}

fn gauss_jordan(mut transform: ComplementTransform) -> Result<Matrix, LinalgError> {
    let n = transform.size();
    let scale = transform
        .source
        .iter()
        .flatten()
        .fold(0.0_f64, |m, x| m.max(x.abs()));
    if scale == 0.0 {
        return Err(LinalgError::Singular);
    }
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&x, &y| {
                transform.source[x][col]
                    .abs()
                    .total_cmp(&transform.source[y][col].abs())
            })
            .unwrap_or(col);
        if transform.source[pivot_row][col].abs() <= PIVOT_FLOOR * scale {
            return Err(LinalgError::Singular);
        }
        if pivot_row != col {
            transform.swap_rows(pivot_row, col);
        }
        let pivot = transform.source[col][col];
        for j in 0..n {
            transform.source[col][j] /= pivot;
            transform.complement[col][j] /= pivot;
        }
        for row in 0..n {
            let factor = transform.source[row][col];
            if row != col && factor != 0.0 {
                transform.add_row(row, col, -factor);
            }
        }
    }
    Ok(transform.complement)
}

/// Invert a square matrix by Gauss-Jordan elimination on a row-swap
/// regularised [`ComplementTransform`].
pub fn invert_using_gaussian_elimination(a: &[Vec<f64>]) -> Result<Matrix, LinalgError> {
    gauss_jordan(pivot_diagonal(a)?)
}

/// Invert a square matrix with the chosen method.
///
/// # Errors
///
/// `LinalgError::Singular` when the matrix has no inverse.
pub fn invert(a: &[Vec<f64>], method: InversionMethod) -> Result<Matrix, LinalgError> {
    match method {
        InversionMethod::Cramer => invert_2d_cramer(a),
        InversionMethod::GaussianElimination => invert_using_gaussian_elimination(a),
        InversionMethod::GaussianRowAddition => {
            let mut transform = ComplementTransform::new(a)?;
            if !regularize_using_row_addition(&mut transform) {
                return Err(LinalgError::Singular);
            }
            gauss_jordan(transform)
        }
    }
}

/// Rank by row reduction with a relative zero floor.
pub fn rank(a: &[Vec<f64>]) -> Result<usize, LinalgError> {
    let (rows, cols) = shape(a)?;
    let mut m = a.to_vec();
    let scale = m.iter().flatten().fold(0.0_f64, |s, x| s.max(x.abs()));
    if scale == 0.0 {
        return Ok(0);
    }
    let mut rank = 0;
    for col in 0..cols {
        if rank == rows {
            break;
        }
        let pivot_row = (rank..rows)
            .max_by(|&x, &y| m[x][col].abs().total_cmp(&m[y][col].abs()))
            .unwrap_or(rank);
        if m[pivot_row][col].abs() <= PIVOT_FLOOR * scale {
            continue;
        }
        m.swap(rank, pivot_row);
        for row in rank + 1..rows {
            let factor = m[row][col] / m[rank][col];
            for j in col..cols {
                m[row][j] -= factor * m[rank][j];
            }
        }
        rank += 1;
    }
    Ok(rank)
}

/// Lower-triangular `L` with `A = L Lᵀ` (Cholesky-Banachiewicz, row by row).
pub fn cholesky_banachiewicz(a: &[Vec<f64>]) -> Result<Matrix, LinalgError> {
    let n = square_size(a)?;
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let partial: f64 = (0..j).map(|k| l[i][k] * l[j][k]).sum();
            if i == j {
                let d = a[i][i] - partial;
                if d <= 0.0 {
                    return Err(LinalgError::NotPositiveDefinite { index: i });
                }
                l[i][j] = d.sqrt();
            } else {
                l[i][j] = (a[i][j] - partial) / l[j][j];
            }
        }
    }
    Ok(l)
}

/// Orthogonalise a set of row vectors by classical Gram-Schmidt.
pub fn gram_schmidt_orthogonalize(vectors: &[Vec<f64>]) -> Result<Matrix, LinalgError> {
    shape(vectors)?;
    let mut basis: Matrix = Vec::with_capacity(vectors.len());
    for v in vectors {
        let mut u = v.clone();
        for b in &basis {
            let p = project(v, b)?;
            u.iter_mut().zip(&p).for_each(|(x, y)| *x -= y);
        }
        basis.push(u);
    }
    Ok(basis)
}

/// Orthonormalise a set of row vectors.
pub fn gram_schmidt_orthonormalize(vectors: &[Vec<f64>]) -> Result<Matrix, LinalgError> {
    gram_schmidt_orthogonalize(vectors)?
        .iter()
        .map(|v| normalize(v))
        .collect()
}

/// QR factorisation result: `A = Q R` with orthonormal columns in `q`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrDecomposition {
    /// Orthonormal factor (same shape as `A`).
    pub q: Matrix,
    /// Upper-triangular factor.
    pub r: Matrix,
}

/// QR decomposition of a full column rank matrix via Gram-Schmidt on its columns.
pub fn qr_decomposition(a: &[Vec<f64>]) -> Result<QrDecomposition, LinalgError> {
    let columns = transpose(a)?;
    let q_columns = gram_schmidt_orthonormalize(&columns)?;
    let n = columns.len();
    let mut r = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            r[i][j] = dot_product(&q_columns[i], &columns[j])?;
        }
    }
    Ok(QrDecomposition {
        q: transpose(&q_columns)?,
        r,
    })
}

/// Triangular structure of a square matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriangularType {
    /// Zero above the diagonal.
    Lower,
    /// Zero below the diagonal.
    Upper,
    /// Zero on both sides (diagonal).
    LowerAndUpper,
    /// Neither.
    NonTriangular,
}

/// Classify a square matrix, treating entries with `|x| <= floor` as zero.
pub fn triangular_type(a: &[Vec<f64>], floor: f64) -> Result<TriangularType, LinalgError> {
    let n = square_size(a)?;
    let mut zero_above = true;
    let mut zero_below = true;
    for i in 0..n {
        for j in 0..n {
            if a[i][j].abs() > floor.abs() {
                if j > i {
                    zero_above = false;
                } else if j < i {
                    zero_below = false;
                }
            }
        }
    }
    Ok(match (zero_above, zero_below) {
        (true, true) => TriangularType::LowerAndUpper,
        (true, false) => TriangularType::Lower,
        (false, true) => TriangularType::Upper,
        (false, false) => TriangularType::NonTriangular,
    })
}

/// Rayleigh quotient `vᵀ A v / vᵀ v`.
pub fn rayleigh_quotient(a: &[Vec<f64>], v: &[f64]) -> Result<f64, LinalgError> {
    let norm_sq = dot_product(v, v)?;
    if norm_sq == 0.0 {
        return Err(LinalgError::ZeroVector);
    }
    Ok(dot_product(v, &product_matrix_vector(a, v)?)? / norm_sq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn assert_identity(m: &[Vec<f64>], eps: f64) {
        for (i, row) in m.iter().enumerate() {
            for (j, &x) in row.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(x, expected, epsilon = eps);
            }
        }
    }

    #[test]
    fn test_products() {
        let a = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        assert_eq!(
            product_matrix_vector(&a, &[1.0, 0.0, -1.0]).unwrap(),
            vec![-2.0, -2.0]
        );
        assert_eq!(
            product_vector_matrix(&[1.0, 1.0], &a).unwrap(),
            vec![5.0, 7.0, 9.0]
        );
        let at = transpose(&a).unwrap();
        assert_eq!(
            product(&a, &at).unwrap(),
            vec![vec![14.0, 32.0], vec![32.0, 77.0]]
        );
        assert!(product(&a, &a).is_err());
    }

    #[test]
    fn test_ragged_matrix_rejected() {
        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        assert_eq!(transpose(&ragged), Err(LinalgError::NotRectangular));
        let nan = vec![vec![1.0, f64::NAN]];
        assert_eq!(transpose(&nan), Err(LinalgError::NonFinite { row: 0, col: 1 }));
    }

    #[test]
    fn test_cramer_and_gaussian_agree() {
        let a = vec![vec![3.0, 1.0], vec![2.0, 4.0]];
        let c = invert(&a, InversionMethod::Cramer).unwrap();
        let g = invert(&a, InversionMethod::GaussianElimination).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert_abs_diff_eq!(c[i][j], g[i][j], epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_invert_with_zero_diagonal() {
        let a = vec![
            vec![0.0, 2.0, 1.0],
            vec![1.0, 0.0, 0.0],
            vec![3.0, 0.0, 1.0],
        ];
        for method in [
            InversionMethod::GaussianElimination,
            InversionMethod::GaussianRowAddition,
        ] {
            let inv = invert(&a, method).unwrap();
            assert_identity(&product(&a, &inv).unwrap(), 1e-12);
        }
    }

    #[test]
    fn test_row_swap_keeps_fixed_diagonals() {
        let a = vec![
            vec![0.0, 2.0, 1.0],
            vec![1.0, 0.0, 0.0],
            vec![3.0, 0.0, 1.0],
        ];
        let pivoted = pivot_diagonal(&a).unwrap();
        assert!((0..3).all(|i| pivoted.source[i][i] != 0.0));

        // only an earlier row can fill the last diagonal
        let b = vec![vec![1.0, 1.0], vec![1.0, 0.0]];
        let pivoted = pivot_diagonal(&b).unwrap();
        assert!((0..2).all(|i| pivoted.source[i][i] != 0.0));
    }

    #[test]
    fn test_singular_matrix() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert_eq!(
            invert(&a, InversionMethod::GaussianElimination),
            Err(LinalgError::Singular)
        );
        assert_eq!(invert_2d_cramer(&a), Err(LinalgError::Singular));
        let zero_col = vec![vec![0.0, 1.0], vec![0.0, 2.0]];
        assert!(pivot_diagonal(&zero_col).is_err());
    }

    #[test]
    fn test_rank() {
        assert_eq!(rank(&[vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap(), 1);
        assert_eq!(rank(&identity(4)).unwrap(), 4);
        assert_eq!(
            rank(&[vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 1.0]]).unwrap(),
            2
        );
        assert_eq!(rank(&[vec![0.0, 0.0]]).unwrap(), 0);
    }

    #[test]
    fn test_cholesky_reconstructs() {
        let a = vec![
            vec![4.0, 12.0, -16.0],
            vec![12.0, 37.0, -43.0],
            vec![-16.0, -43.0, 98.0],
        ];
        let l = cholesky_banachiewicz(&a).unwrap();
        assert_eq!(l[0][0], 2.0);
        assert_abs_diff_eq!(l[2][1], 5.0, epsilon = 1e-12);
        assert_eq!(
            triangular_type(&l, 0.0).unwrap(),
            TriangularType::Lower
        );
        let back = product(&l, &transpose(&l).unwrap()).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(back[i][j], a[i][j], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_cholesky_not_positive_definite() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 1.0]];
        assert_eq!(
            cholesky_banachiewicz(&a),
            Err(LinalgError::NotPositiveDefinite { index: 1 })
        );
    }

    #[test]
    fn test_gram_schmidt_orthonormal() {
        let v = vec![vec![3.0, 1.0, 0.0], vec![2.0, 2.0, 0.0], vec![1.0, 1.0, 1.0]];
        let q = gram_schmidt_orthonormalize(&v).unwrap();
        let gram = product(&q, &transpose(&q).unwrap()).unwrap();
        assert_identity(&gram, 1e-12);
    }

    #[test]
    fn test_qr_decomposition() {
        let a = vec![vec![12.0, -51.0, 4.0], vec![6.0, 167.0, -68.0], vec![-4.0, 24.0, -41.0]];
        let qr = qr_decomposition(&a).unwrap();
        assert_eq!(
            triangular_type(&qr.r, 1e-9).unwrap(),
            TriangularType::Upper
        );
        assert_abs_diff_eq!(qr.r[0][0], 14.0, epsilon = 1e-10);
        let back = product(&qr.q, &qr.r).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(back[i][j], a[i][j], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_vector_helpers() {
        assert_eq!(dot_product(&[1.0, 2.0], &[3.0, 4.0]).unwrap(), 11.0);
        assert_eq!(
            cross_product(&[1.0, 2.0], &[3.0, 4.0, 5.0]).unwrap(),
            vec![vec![3.0, 4.0, 5.0], vec![6.0, 8.0, 10.0]]
        );
        assert_eq!(project(&[2.0, 3.0], &[1.0, 0.0]).unwrap(), vec![2.0, 0.0]);
        assert_eq!(sum(&[1.0, -2.0, 4.0]).unwrap(), 3.0);
        assert_eq!(modulus(&[3.0, 4.0]).unwrap(), 5.0);
        assert_eq!(normalize(&[0.0, 0.0]), Err(LinalgError::ZeroVector));
        assert!(positive_or_zero(&[0.0, 1.0]).unwrap());
        assert!(negative_or_zero(&[0.0, -1.0]).unwrap());
        assert!(positive_linearly_independent(&[1.0, -1.0]).unwrap());
        assert!(!positive_linearly_independent(&[1.0, 2.0]).unwrap());
        assert_eq!(scale_1d(&[1.0, 2.0], 3.0).unwrap(), vec![3.0, 6.0]);
        assert_eq!(
            scale_2d(&[vec![1.0], vec![2.0]], -1.0).unwrap(),
            vec![vec![-1.0], vec![-2.0]]
        );
    }

    #[test]
    fn test_diagonal_helpers() {
        let d = make_square_diagonal(&[1.0, 2.0, 3.0]).unwrap();
        assert!(is_diagonal(&d).unwrap());
        assert_eq!(
            triangular_type(&d, 0.0).unwrap(),
            TriangularType::LowerAndUpper
        );
        assert!(!is_diagonal(&[vec![1.0, 1e-20], vec![0.0, 1.0]]).unwrap());
        assert_eq!(rayleigh_quotient(&d, &[0.0, 1.0, 0.0]).unwrap(), 2.0);
    }

    proptest! {
        #[test]
        fn prop_inverse_of_diagonally_dominant(
            entries in proptest::collection::vec(-1.0f64..1.0, 16)
        ) {
            let mut a: Matrix = entries.chunks(4).map(|c| c.to_vec()).collect();
            for (i, row) in a.iter_mut().enumerate() {
                row[i] += 5.0;
            }
            let inv = invert(&a, InversionMethod::GaussianElimination).unwrap();
            let id = product(&a, &inv).unwrap();
            for (i, row) in id.iter().enumerate() {
                for (j, &x) in row.iter().enumerate() {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    prop_assert!((x - expected).abs() < 1e-10);
                }
            }
        }
    }
}
