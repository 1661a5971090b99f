use num::{Float, NumCast, Zero};
use rand::distributions::uniform::SampleUniform;
use std::{
    fmt::{Debug, Display, LowerExp},
    iter::Sum,
    ops::{Add, AddAssign, Sub, SubAssign},
};

/// Floating-point primitive all calculations are generic over.
///
/// Implemented for [`f32`] and [`f64`]. The bounds cover everything the engine
/// needs: arithmetic, casting from integer counts, summation and weighted
/// random sampling.
pub trait Primitive:
    Add + AddAssign + Sum + Sub + SubAssign + Zero + Float + NumCast + SampleUniform
    + PartialOrd + Copy + Default + Display + Debug + Sync + Send + LowerExp + 'static
    + for<'a> AddAssign<&'a Self>
{
}
impl Primitive for f32 {}
impl Primitive for f64 {}
