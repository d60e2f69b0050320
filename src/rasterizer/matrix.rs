//! Fixed-size matrices
//!
//! A `Matrix<R, C>` is `R` row vectors of length `C`. Square matrices up to
//! 4x4 get a determinant and inverse by cofactor (Laplace) expansion along
//! the first row. That is factorial in the size, which is fine for the 2x2,
//! 3x3 and 4x4 cases the pipeline needs.
//!
//! Inversion does not check for singular input: dividing by a (near) zero
//! determinant gives `inf`/`NaN` and callers must avoid building such
//! matrices in the first place.

use std::fmt;
use std::ops::{Add, Div, Index, IndexMut, Mul, Sub};

use super::math::Vector;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<const R: usize, const C: usize> {
    rows: [Vector<C>; R],
}

pub type Mat3 = Matrix<3, 3>;
pub type Mat4 = Matrix<4, 4>;

impl<const R: usize, const C: usize> Matrix<R, C> {
    pub const fn from_rows(rows: [Vector<C>; R]) -> Self {
        Self { rows }
    }

    pub fn zero() -> Self {
        Self { rows: [Vector::ZERO; R] }
    }

    /// Ones on the main diagonal, zero elsewhere (also for non-square shapes)
    pub fn identity() -> Self {
        let mut ret = Self::zero();
        for i in 0..R.min(C) {
            ret.rows[i][i] = 1.0;
        }
        ret
    }

    pub fn row(&self, idx: usize) -> Vector<C> {
        self.rows[idx]
    }

    pub fn col(&self, idx: usize) -> Vector<R> {
        assert!(idx < C, "column {} out of range for {}x{} matrix", idx, R, C);
        let mut ret = Vector::<R>::ZERO;
        for i in 0..R {
            ret[i] = self.rows[i][idx];
        }
        ret
    }

    pub fn set_col(&mut self, idx: usize, v: Vector<R>) {
        assert!(idx < C, "column {} out of range for {}x{} matrix", idx, R, C);
        for i in 0..R {
            self.rows[i][idx] = v[i];
        }
    }

    pub fn transpose(&self) -> Matrix<C, R> {
        let mut ret = Matrix::<C, R>::zero();
        for j in 0..C {
            ret.rows[j] = self.col(j);
        }
        ret
    }
}

impl<const R: usize, const C: usize> Default for Matrix<R, C> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const R: usize, const C: usize> From<[[f64; C]; R]> for Matrix<R, C> {
    fn from(data: [[f64; C]; R]) -> Self {
        Self { rows: data.map(Vector::from_array) }
    }
}

impl Matrix<1, 1> {
    pub fn det(&self) -> f64 {
        self.rows[0][0]
    }
}

/// Cofactor expansion for an `$n`x`$n` matrix whose minors are `$m`x`$m`.
macro_rules! impl_square {
    ($n:literal, $m:literal) => {
        impl Matrix<$n, $n> {
            /// Determinant, expanded along the first row
            pub fn det(&self) -> f64 {
                let mut ret = 0.0;
                for j in 0..$n {
                    ret += self.rows[0][j] * self.cofactor(0, j);
                }
                ret
            }

            /// The matrix with `row` and `col` removed
            pub fn minor(&self, row: usize, col: usize) -> Matrix<$m, $m> {
                let mut ret = Matrix::<$m, $m>::zero();
                for i in 0..$m {
                    for j in 0..$m {
                        let src_row = if i < row { i } else { i + 1 };
                        let src_col = if j < col { j } else { j + 1 };
                        ret.rows[i][j] = self.rows[src_row][src_col];
                    }
                }
                ret
            }

            pub fn cofactor(&self, row: usize, col: usize) -> f64 {
                let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
                self.minor(row, col).det() * sign
            }

            /// Matrix of cofactors. Its transpose is the classical adjugate.
            pub fn cofactor_matrix(&self) -> Self {
                let mut ret = Self::zero();
                for i in 0..$n {
                    for j in 0..$n {
                        ret.rows[i][j] = self.cofactor(i, j);
                    }
                }
                ret
            }

            /// Transpose of the inverse.
            ///
            /// The determinant is recovered as the dot product of the first
            /// cofactor row with the first row of `self`, so no second
            /// expansion is needed.
            pub fn invert_transpose(&self) -> Self {
                let cofactors = self.cofactor_matrix();
                let det = cofactors.rows[0] * self.rows[0];
                cofactors / det
            }

            pub fn invert(&self) -> Self {
                self.invert_transpose().transpose()
            }
        }
    };
}

impl_square!(2, 1);
impl_square!(3, 2);
impl_square!(4, 3);

impl<const R: usize, const C: usize> Index<usize> for Matrix<R, C> {
    type Output = Vector<C>;
    fn index(&self, idx: usize) -> &Vector<C> {
        &self.rows[idx]
    }
}

impl<const R: usize, const C: usize> IndexMut<usize> for Matrix<R, C> {
    fn index_mut(&mut self, idx: usize) -> &mut Vector<C> {
        &mut self.rows[idx]
    }
}

impl<const R: usize, const C: usize> Mul<Vector<C>> for Matrix<R, C> {
    type Output = Vector<R>;
    fn mul(self, v: Vector<C>) -> Vector<R> {
        let mut ret = Vector::<R>::ZERO;
        for i in 0..R {
            ret[i] = self.rows[i] * v;
        }
        ret
    }
}

impl<const R: usize, const C: usize, const K: usize> Mul<Matrix<C, K>> for Matrix<R, C> {
    type Output = Matrix<R, K>;
    fn mul(self, other: Matrix<C, K>) -> Matrix<R, K> {
        let mut ret = Matrix::<R, K>::zero();
        for j in 0..K {
            let col = other.col(j);
            for i in 0..R {
                ret.rows[i][j] = self.rows[i] * col;
            }
        }
        ret
    }
}

impl<const R: usize, const C: usize> Mul<f64> for Matrix<R, C> {
    type Output = Self;
    fn mul(mut self, s: f64) -> Self {
        for row in &mut self.rows {
            *row = *row * s;
        }
        self
    }
}

impl<const R: usize, const C: usize> Div<f64> for Matrix<R, C> {
    type Output = Self;
    fn div(mut self, s: f64) -> Self {
        for row in &mut self.rows {
            *row = *row / s;
        }
        self
    }
}

impl<const R: usize, const C: usize> Add for Matrix<R, C> {
    type Output = Self;
    fn add(mut self, other: Self) -> Self {
        for i in 0..R {
            self.rows[i] = self.rows[i] + other.rows[i];
        }
        self
    }
}

impl<const R: usize, const C: usize> Sub for Matrix<R, C> {
    type Output = Self;
    fn sub(mut self, other: Self) -> Self {
        for i in 0..R {
            self.rows[i] = self.rows[i] - other.rows[i];
        }
        self
    }
}

impl<const R: usize, const C: usize> fmt::Display for Matrix<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
