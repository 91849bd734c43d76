use num_traits::{Float as NumFloat, FromPrimitive};
use std::fmt::{Debug, Display};
use std::ops::{AddAssign, MulAssign, SubAssign};
use std::time::{Duration, Instant};

pub trait RealNumber:
    NumFloat
    + FromPrimitive
    + Debug
    + Display
    + Send
    + Sync
    + AddAssign
    + SubAssign
    + MulAssign
    + 'static
{
}

impl<T> RealNumber for T where
    T: NumFloat
        + FromPrimitive
        + Debug
        + Display
        + Send
        + Sync
        + AddAssign
        + SubAssign
        + MulAssign
        + 'static
{
}

#[cfg(not(feature = "f32"))]
pub type Scalar = f64;

#[cfg(feature = "f32")]
pub type Scalar = f32;

pub fn dot<T: RealNumber>(lhs: &[T], rhs: &[T]) -> T {
    assert_eq!(lhs.len(), rhs.len(), "dot product dimension mismatch");
    lhs.iter()
        .zip(rhs.iter())
        .fold(T::zero(), |acc, (a, b)| acc + (*a) * (*b))
}

pub fn from_count<T: RealNumber>(count: u64) -> T {
    T::from_u64(count).unwrap_or_else(T::infinity)
}

/// Removes floating-point residue from a flow value: magnitudes below
/// `tolerance` become zero and values within `tolerance` of an integer
/// become that integer.
pub fn snap<T: RealNumber>(value: T, tolerance: T) -> T {
    if value.abs() < tolerance {
        return T::zero();
    }
    let nearest = value.round();
    if (value - nearest).abs() < tolerance {
        nearest
    } else {
        value
    }
}

pub fn snap_all<T: RealNumber>(values: &mut [T], tolerance: T) {
    for value in values.iter_mut() {
        *value = snap(*value, tolerance);
    }
}

#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
    elapsed: Duration,
    running: bool,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Duration::ZERO,
            running: true,
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.elapsed += self.start.elapsed();
            self.running = false;
        }
    }

    pub fn elapsed(&self) -> Duration {
        if self.running {
            self.elapsed + self.start.elapsed()
        } else {
            self.elapsed
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::{dot, from_count, snap, Scalar, Timer};

    #[test]
    fn test_dot() {
        let v = [3.0 as Scalar, 4.0];
        assert!((dot(&v, &v) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_snap_removes_residue() {
        let tol = 1e-9 as Scalar;
        assert_eq!(snap(3e-12, tol), 0.0);
        assert_eq!(snap(-3e-12, tol), 0.0);
        assert_eq!(snap(41.999_999_999_99, tol), 42.0);
        assert_eq!(snap(2.5, tol), 2.5);
    }

    #[test]
    fn test_from_count() {
        let value: Scalar = from_count(120);
        assert_eq!(value, 120.0);
    }

    #[test]
    fn test_timer_stops() {
        let mut timer = Timer::start();
        timer.stop();
        let frozen = timer.elapsed();
        assert_eq!(frozen, timer.elapsed());
    }
}
