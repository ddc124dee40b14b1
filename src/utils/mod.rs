use std::fmt::{Debug, Display};
use std::hash::Hash;

use num_traits::float::TotalOrder;
use num_traits::{Float, PrimInt, Unsigned};

/// Scalar type usable as a filtration value ("data" or "weight" of a simplex).
///
/// Unpaired points in a persistence diagram die at `Float::infinity()`, and
/// sorting relies on `TotalOrder` so that a filtration is a strict weak order
/// even in the presence of NaN.
pub trait FiltrationOps: Float + TotalOrder + Debug + Display + Send + Sync + 'static {}

impl<T> FiltrationOps for T where T: Float + TotalOrder + Debug + Display + Send + Sync + 'static {}

/// Integer type usable as a vertex identifier.
pub trait VertexOps: PrimInt + Unsigned + Hash + Debug + Display + Send + Sync + 'static {}

impl<T> VertexOps for T where T: PrimInt + Unsigned + Hash + Debug + Display + Send + Sync + 'static {}

pub trait ZeroVec {
    fn zero_len(&mut self, len: usize);
}

impl<T: Default + Clone> ZeroVec for Vec<T> {
    fn zero_len(&mut self, len: usize) {
        self.clear();
        self.reserve(len);
        self.extend(std::iter::repeat_n(T::default(), len));
    }
}
