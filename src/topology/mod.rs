//! Simplices, filtration orders and the filtered complex all reductions run on.

mod complex;
pub mod filtration;
mod simplex;

pub use complex::FilteredComplex;
pub use filtration::{DataFiltration, DimensionFirstFiltration, Filtration, ReverseDataFiltration};
pub use simplex::Simplex;
