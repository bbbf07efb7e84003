use std::fmt::Display;
use std::marker::PhantomData;
use std::ops::Add;
use std::ops::AddAssign;
use std::ops::Div;
use std::ops::Mul;
use std::ops::MulAssign;
use std::ops::Neg;
use std::ops::Sub;

use rand::distributions::Distribution;
use rand::distributions::Standard;
use rand::Rng;
use serde::Deserialize;
use serde::Deserializer;

/// Zero-sized markers for what a `Vector3` means.
///
/// Points are absolute positions, directions are relative offsets and colors are
/// linear RGB radiance. Arithmetic is only defined where it makes sense, e.g. a point
/// plus a direction is a point, but two points cannot be added together.
pub mod kind {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Point;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Direction;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Color;
}

/// Three scalars tagged with a kind `K`.
#[derive(Debug)]
pub struct Vector3<K>(f64, f64, f64, PhantomData<K>);

// Implemented by hand since deriving would require `K: Copy` etc, and the kind is
// only a marker.
impl<K> Clone for Vector3<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Vector3<K> {}

impl<K> PartialEq for Vector3<K> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 == other.1 && self.2 == other.2
    }
}

pub type Point3 = Vector3<kind::Point>;
pub type Vec3 = Vector3<kind::Direction>;
pub type Color = Vector3<kind::Color>;

impl<K> Vector3<K> {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3(x, y, z, PhantomData)
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.1
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.2
    }

    /// Reinterpret these components as another kind.
    ///
    /// This is the only way to move between kinds, so every such conversion is
    /// visible at the call site.
    #[inline]
    pub fn reinterpret<L>(self) -> Vector3<L> {
        Vector3::new(self.0, self.1, self.2)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.square_length().sqrt()
    }

    #[inline]
    pub fn square_length(&self) -> f64 {
        self.0 * self.0 + self.1 * self.1 + self.2 * self.2
    }

    #[inline]
    pub fn mul_pointwise(&self, other: &Self) -> Self {
        Vector3::new(self.0 * other.0, self.1 * other.1, self.2 * other.2)
    }

    /// Dot product. The operands may be of different kinds, e.g. a ray direction
    /// against the offset of a point from the origin.
    #[inline]
    pub fn dot<L>(&self, other: &Vector3<L>) -> f64 {
        self.0 * other.0 + self.1 * other.1 + self.2 * other.2
    }

    /// Scale to unit length.
    ///
    /// The caller must guarantee the length is non-zero.
    #[inline]
    pub fn unit(&self) -> Self {
        *self / self.length()
    }

    #[inline]
    pub fn negate(&self) -> Self {
        Vector3::new(-self.0, -self.1, -self.2)
    }

    /// Whether every component is within 1e-8 of zero.
    pub fn near_zero(&self) -> bool {
        let s = 1e-8;
        self.0.abs() < s && self.1.abs() < s && self.2.abs() < s
    }

    pub fn lerp(&self, to: Self, t: f64) -> Self {
        Vector3::new(
            (1.0 - t) * self.0 + t * to.0,
            (1.0 - t) * self.1 + t * to.1,
            (1.0 - t) * self.2 + t * to.2,
        )
    }

    #[inline]
    pub fn rand_within<R: Rng, D: Distribution<f64>>(rng: &mut R, dist: D) -> Self {
        Vector3::new(dist.sample(rng), dist.sample(rng), dist.sample(rng))
    }

    #[inline]
    pub fn rel_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.0 - other.0).abs() < epsilon
            && (self.1 - other.1).abs() < epsilon
            && (self.2 - other.2).abs() < epsilon
    }
}

impl Vec3 {
    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        Vec3::new(
            self.1 * other.2 - self.2 * other.1,
            self.2 * other.0 - self.0 * other.2,
            self.0 * other.1 - self.1 * other.0,
        )
    }
}

impl<K> Default for Vector3<K> {
    fn default() -> Self {
        Vector3::new(0.0, 0.0, 0.0)
    }
}

impl<K> Display for Vector3<K> {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

impl<K> From<[f64; 3]> for Vector3<K> {
    fn from(arr: [f64; 3]) -> Self {
        Vector3::new(arr[0], arr[1], arr[2])
    }
}

impl<'de, K> Deserialize<'de> for Vector3<K> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <[f64; 3]>::deserialize(deserializer).map(Vector3::from)
    }
}

impl<K> Distribution<Vector3<K>> for Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector3<K> {
        Vector3::new(rng.gen(), rng.gen(), rng.gen())
    }
}

impl<K> Neg for Vector3<K> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        self.negate()
    }
}

impl<K> Mul<Vector3<K>> for f64 {
    type Output = Vector3<K>;

    #[inline]
    fn mul(self, v: Vector3<K>) -> Vector3<K> {
        Vector3::new(v.0 * self, v.1 * self, v.2 * self)
    }
}

impl<K> Mul<f64> for Vector3<K> {
    type Output = Self;

    #[inline]
    fn mul(self, c: f64) -> Self {
        Vector3::new(self.0 * c, self.1 * c, self.2 * c)
    }
}

impl<K> Div<f64> for Vector3<K> {
    type Output = Self;

    #[inline]
    fn div(self, c: f64) -> Self {
        Vector3::new(self.0 / c, self.1 / c, self.2 / c)
    }
}

/// Addition and subtraction within a single kind.
///
/// Deliberately not implemented for points.
macro_rules! impl_linear {
    ($kind:ty) => {
        impl Add for Vector3<$kind> {
            type Output = Self;

            #[inline]
            fn add(self, other: Self) -> Self {
                Vector3::new(self.0 + other.0, self.1 + other.1, self.2 + other.2)
            }
        }

        impl AddAssign for Vector3<$kind> {
            fn add_assign(&mut self, other: Self) {
                self.0 += other.0;
                self.1 += other.1;
                self.2 += other.2;
            }
        }

        impl Sub for Vector3<$kind> {
            type Output = Self;

            #[inline]
            fn sub(self, other: Self) -> Self {
                Vector3::new(self.0 - other.0, self.1 - other.1, self.2 - other.2)
            }
        }
    };
}

impl_linear!(kind::Direction);
impl_linear!(kind::Color);

impl Add<Vec3> for Point3 {
    type Output = Self;

    #[inline]
    fn add(self, other: Vec3) -> Self {
        Point3::new(self.0 + other.0, self.1 + other.1, self.2 + other.2)
    }
}

impl Sub for Point3 {
    type Output = Vec3;

    #[inline]
    fn sub(self, other: Self) -> Vec3 {
        Vec3::new(self.0 - other.0, self.1 - other.1, self.2 - other.2)
    }
}

impl Sub<Vec3> for Point3 {
    type Output = Point3;

    #[inline]
    fn sub(self, other: Vec3) -> Point3 {
        Point3::new(self.0 - other.0, self.1 - other.1, self.2 - other.2)
    }
}

/// Colors attenuate component-wise.
impl Mul for Color {
    type Output = Self;

    #[inline]
    fn mul(self, other: Self) -> Self {
        self.mul_pointwise(&other)
    }
}

impl MulAssign for Color {
    fn mul_assign(&mut self, other: Self) {
        *self = self.mul_pointwise(&other);
    }
}
