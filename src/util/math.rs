//! Mathematical helpers for contour descriptors and correlation.

use std::ops::{Add, Mul, Sub};

/// Complex number used to encode contour edge vectors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex {
    /// Real part (x component).
    pub re: f64,
    /// Imaginary part (y component).
    pub im: f64,
}

impl Complex {
    /// The additive identity.
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    /// Creates a complex number from its components.
    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Complex conjugate.
    #[inline]
    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// Squared magnitude.
    #[inline]
    pub fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Magnitude.
    #[inline]
    pub fn norm(self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// Argument in radians, in (-pi, pi].
    #[inline]
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    /// Scales both components by `k`.
    #[inline]
    pub fn scale(self, k: f64) -> Self {
        Self::new(self.re * k, self.im * k)
    }
}

impl Add for Complex {
    type Output = Complex;

    #[inline]
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;

    #[inline]
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;

    #[inline]
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

/// Wraps an angle in degrees to the range [-180, 180).
pub(crate) fn wrap_deg(angle_deg: f64) -> f64 {
    let mut wrapped = angle_deg % 360.0;
    if wrapped < -180.0 {
        wrapped += 360.0;
    }
    if wrapped >= 180.0 {
        wrapped -= 360.0;
    }
    wrapped
}

/// Cyclic correlation `sum_k a[k] * conj(b[(k + shift) % n])`.
///
/// Both slices must have the same non-zero length.
pub(crate) fn cyclic_dot(a: &[Complex], b: &[Complex], shift: usize) -> Complex {
    let n = b.len();
    let mut acc = Complex::ZERO;
    for (k, &va) in a.iter().enumerate() {
        acc = acc + va * b[(k + shift) % n].conj();
    }
    acc
}
