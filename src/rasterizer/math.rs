//! Fixed-size vector math for the pipeline
//!
//! Vectors are plain `f64` arrays with the dimension in the type.
//! Everything is `Copy`; no operation mutates its inputs.

use std::fmt;
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

/// N-component vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<const N: usize> {
    data: [f64; N],
}

pub type Vec2 = Vector<2>;
pub type Vec3 = Vector<3>;
pub type Vec4 = Vector<4>;

impl<const N: usize> Vector<N> {
    pub const ZERO: Self = Self { data: [0.0; N] };

    pub const fn from_array(data: [f64; N]) -> Self {
        Self { data }
    }

    pub fn dot(self, other: Self) -> f64 {
        let mut ret = 0.0;
        for i in 0..N {
            ret += self.data[i] * other.data[i];
        }
        ret
    }

    /// Squared Euclidean length
    pub fn norm2(self) -> f64 {
        self.dot(self)
    }

    pub fn norm(self) -> f64 {
        self.norm2().sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// A zero vector has no direction: the result is NaN in every component.
    pub fn normalized(self) -> Self {
        self / self.norm()
    }

    /// Sum of all components
    pub fn sum(self) -> f64 {
        self.data.iter().sum()
    }
}

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> From<[f64; N]> for Vector<N> {
    fn from(data: [f64; N]) -> Self {
        Self { data }
    }
}

impl Vector<2> {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { data: [x, y] }
    }

    pub fn x(&self) -> f64 {
        self.data[0]
    }

    pub fn y(&self) -> f64 {
        self.data[1]
    }
}

impl Vector<3> {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { data: [x, y, z] }
    }

    pub fn x(&self) -> f64 {
        self.data[0]
    }

    pub fn y(&self) -> f64 {
        self.data[1]
    }

    pub fn z(&self) -> f64 {
        self.data[2]
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        cross(self, other)
    }
}

impl Vector<4> {
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { data: [x, y, z, w] }
    }

    pub fn x(&self) -> f64 {
        self.data[0]
    }

    pub fn y(&self) -> f64 {
        self.data[1]
    }

    pub fn z(&self) -> f64 {
        self.data[2]
    }

    pub fn w(&self) -> f64 {
        self.data[3]
    }
}

/// Cross product of two 3D vectors
pub fn cross(v1: Vec3, v2: Vec3) -> Vec3 {
    Vec3::new(
        v1.y() * v2.z() - v1.z() * v2.y(),
        v1.z() * v2.x() - v1.x() * v2.z(),
        v1.x() * v2.y() - v1.y() * v2.x(),
    )
}

/// Embed `v` into a larger vector, padding the extra components with `fill`.
///
/// Use `fill = 1.0` for points and `fill = 0.0` for directions. If `M < N`
/// the trailing components of `v` are dropped.
pub fn embed<const M: usize, const N: usize>(v: Vector<N>, fill: f64) -> Vector<M> {
    let mut ret = Vector::<M>::ZERO;
    for i in 0..M {
        ret.data[i] = if i < N { v.data[i] } else { fill };
    }
    ret
}

/// Keep the first `M` components of `v`. Panics if `M > N`.
pub fn proj<const M: usize, const N: usize>(v: Vector<N>) -> Vector<M> {
    let mut ret = Vector::<M>::ZERO;
    for i in 0..M {
        ret.data[i] = v[i];
    }
    ret
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        &self.data[i]
    }
}

impl<const N: usize> IndexMut<usize> for Vector<N> {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.data[i]
    }
}

impl<const N: usize> Add for Vector<N> {
    type Output = Self;
    fn add(mut self, other: Self) -> Self {
        for i in 0..N {
            self.data[i] += other.data[i];
        }
        self
    }
}

impl<const N: usize> Sub for Vector<N> {
    type Output = Self;
    fn sub(mut self, other: Self) -> Self {
        for i in 0..N {
            self.data[i] -= other.data[i];
        }
        self
    }
}

impl<const N: usize> Neg for Vector<N> {
    type Output = Self;
    fn neg(self) -> Self {
        self * -1.0
    }
}

/// Dot product
impl<const N: usize> Mul for Vector<N> {
    type Output = f64;
    fn mul(self, other: Self) -> f64 {
        self.dot(other)
    }
}

impl<const N: usize> Mul<f64> for Vector<N> {
    type Output = Self;
    fn mul(mut self, s: f64) -> Self {
        for x in &mut self.data {
            *x *= s;
        }
        self
    }
}

impl<const N: usize> Mul<Vector<N>> for f64 {
    type Output = Vector<N>;
    fn mul(self, v: Vector<N>) -> Vector<N> {
        v * self
    }
}

impl<const N: usize> Div<f64> for Vector<N> {
    type Output = Self;
    fn div(mut self, s: f64) -> Self {
        for x in &mut self.data {
            *x /= s;
        }
        self
    }
}

impl<const N: usize> fmt::Display for Vector<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", x)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_relative_eq!(a * b, 32.0);
        assert_relative_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(cross(a, b), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(b.cross(a), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);
        assert_eq!(a + b, Vec2::new(4.0, 1.0));
        assert_eq!(a - b, Vec2::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(a / 2.0, Vec2::new(0.5, 1.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
    }

    #[test]
    fn test_normalized() {
        let v = Vec3::new(3.0, 0.0, 4.0);
        assert_relative_eq!(v.norm(), 5.0);
        let n = v.normalized();
        assert_relative_eq!(n.norm(), 1.0);
        assert_relative_eq!(n.x(), 0.6);
        assert_relative_eq!(n.z(), 0.8);
    }

    #[test]
    fn test_normalize_zero_is_nan() {
        let n = Vec3::ZERO.normalized();
        assert!(n.x().is_nan());
    }

    #[test]
    fn test_embed_fill() {
        let v = Vec2::new(3.0, 4.0);
        let point: Vec4 = embed(v, 1.0);
        assert_eq!(point, Vec4::new(3.0, 4.0, 1.0, 1.0));
        let dir: Vec4 = embed(v, 0.0);
        assert_eq!(dir, Vec4::new(3.0, 4.0, 0.0, 0.0));
    }

    #[test]
    fn test_embed_proj_round_trip() {
        let v = Vector::from_array([1.5, -2.0, 7.25, 9.0, 11.0]);
        let head: Vec3 = proj(v);
        let wide: Vec4 = embed(head, 42.0);
        let back: Vec3 = proj(wide);
        assert_eq!(back, Vec3::new(1.5, -2.0, 7.25));
        assert_eq!(wide.w(), 42.0);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let _ = v[3];
    }

    #[test]
    #[should_panic]
    fn test_proj_wider_than_source() {
        let _: Vec4 = proj(Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Vec3::new(1.0, 2.5, -3.0).to_string(), "1 2.5 -3");
    }
}
