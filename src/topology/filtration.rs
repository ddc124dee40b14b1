//! Orderings of a filtered complex.
//!
//! A filtration strategy is an opaque total-order predicate over simplices.
//! Only orderings that place every facet before its cofaces keep the closure
//! invariant intact; `FilteredComplex::validate` reports a violation, sorting
//! itself does not check.

use std::cmp::Ordering;

use super::Simplex;
use crate::utils::{FiltrationOps, VertexOps};

pub trait Filtration<D, V> {
    fn compare(&self, a: &Simplex<D, V>, b: &Simplex<D, V>) -> Ordering;
}

/// Filtration value ascending, then dimension ascending, then vertex sequence.
///
/// Face-respecting whenever no facet carries a larger value than one of its
/// cofaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataFiltration;

impl<D: FiltrationOps, V: VertexOps> Filtration<D, V> for DataFiltration {
    fn compare(&self, a: &Simplex<D, V>, b: &Simplex<D, V>) -> Ordering {
        a.data()
            .total_cmp(&b.data())
            .then(a.dimension().cmp(&b.dimension()))
            .then_with(|| a.vertices().cmp(b.vertices()))
    }
}

/// Filtration value descending, then dimension ascending, then vertex
/// sequence. Face-respecting when facets carry values no smaller than their
/// cofaces (superlevel set filtrations).
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseDataFiltration;

impl<D: FiltrationOps, V: VertexOps> Filtration<D, V> for ReverseDataFiltration {
    fn compare(&self, a: &Simplex<D, V>, b: &Simplex<D, V>) -> Ordering {
        b.data()
            .total_cmp(&a.data())
            .then(a.dimension().cmp(&b.dimension()))
            .then_with(|| a.vertices().cmp(b.vertices()))
    }
}

/// Dimension ascending, then filtration value (ascending or descending),
/// then vertex sequence.
///
/// Always face-respecting. Used for graphs whose vertices carry an artificial
/// weight, where every edge must follow both endpoints irrespective of the
/// weights involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionFirstFiltration {
    pub descending: bool,
}

impl DimensionFirstFiltration {
    pub fn new(descending: bool) -> Self {
        DimensionFirstFiltration { descending }
    }
}

impl<D: FiltrationOps, V: VertexOps> Filtration<D, V> for DimensionFirstFiltration {
    fn compare(&self, a: &Simplex<D, V>, b: &Simplex<D, V>) -> Ordering {
        let by_data = if self.descending {
            b.data().total_cmp(&a.data())
        } else {
            a.data().total_cmp(&b.data())
        };
        a.dimension()
            .cmp(&b.dimension())
            .then(by_data)
            .then_with(|| a.vertices().cmp(b.vertices()))
    }
}
