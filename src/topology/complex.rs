use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Index;

use log::debug;

use super::filtration::{DataFiltration, Filtration};
use super::Simplex;
use crate::error::TopologyError;
use crate::utils::{FiltrationOps, VertexOps};

/// An ordered collection of distinct simplices.
///
/// Reduction requires the closure invariant: every facet of the simplex at
/// position `i` sits at some position `j < i`. `prepare` establishes it for
/// complexes whose facet values never exceed their cofaces' values.
#[derive(Debug, Clone)]
pub struct FilteredComplex<D, V> {
    simplices: Vec<Simplex<D, V>>,
    index: HashMap<Vec<V>, usize>,
}

impl<D, V> FilteredComplex<D, V>
where
    D: FiltrationOps,
    V: VertexOps,
{
    pub fn new<I>(simplices: I) -> Self
    where
        I: IntoIterator<Item = Simplex<D, V>>,
    {
        let mut complex = FilteredComplex {
            simplices: Vec::new(),
            index: HashMap::new(),
        };
        for simplex in simplices {
            complex.push(simplex);
        }
        complex
    }

    /// Appends `simplex` unless a simplex with the same vertices is present.
    pub fn push(&mut self, simplex: Simplex<D, V>) -> bool {
        if self.index.contains_key(simplex.vertices()) {
            debug!("dropping duplicate simplex {}", simplex);
            return false;
        }
        self.index
            .insert(simplex.vertices().to_vec(), self.simplices.len());
        self.simplices.push(simplex);
        true
    }

    pub fn len(&self) -> usize {
        self.simplices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    /// Largest simplex dimension present, 0 for an empty complex.
    pub fn dimension(&self) -> usize {
        self.simplices
            .iter()
            .map(Simplex::dimension)
            .max()
            .unwrap_or(0)
    }

    pub fn get(&self, position: usize) -> Option<&Simplex<D, V>> {
        self.simplices.get(position)
    }

    /// Mutable access for updating filtration values; vertex sets stay fixed.
    pub fn get_mut(&mut self, position: usize) -> Option<&mut Simplex<D, V>> {
        self.simplices.get_mut(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Simplex<D, V>> {
        self.simplices.iter()
    }

    pub fn simplices(&self) -> &[Simplex<D, V>] {
        &self.simplices
    }

    pub fn position(&self, vertices: &[V]) -> Option<usize> {
        self.index.get(vertices).copied()
    }

    pub fn contains(&self, simplex: &Simplex<D, V>) -> bool {
        self.index.contains_key(simplex.vertices())
    }

    /// Inserts every missing face, recursively.
    ///
    /// A materialized face takes the smallest filtration value among its
    /// cofaces. New faces are appended by descending dimension, then by
    /// vertex sequence; call `sort` afterwards to restore filtration order.
    pub fn close_faces(&mut self) {
        let top = self.dimension();
        let mut pending: BTreeMap<Vec<V>, D> = BTreeMap::new();

        for d in (1..=top).rev() {
            let cofaces: Vec<(Vec<V>, D)> = self
                .simplices
                .iter()
                .filter(|s| s.dimension() == d)
                .map(|s| (s.vertices().to_vec(), s.data()))
                .chain(
                    pending
                        .iter()
                        .filter(|(vertices, _)| vertices.len() == d + 1)
                        .map(|(vertices, &data)| (vertices.clone(), data)),
                )
                .collect();

            for (vertices, data) in cofaces {
                let coface = Simplex::from_sorted(vertices, data);
                for facet in coface.facets() {
                    if self.index.contains_key(&facet) {
                        continue;
                    }
                    pending
                        .entry(facet)
                        .and_modify(|value| *value = (*value).min(data))
                        .or_insert(data);
                }
            }
        }

        if pending.is_empty() {
            return;
        }
        debug!("close_faces: materializing {} missing faces", pending.len());

        let mut faces: Vec<(Vec<V>, D)> = pending.into_iter().collect();
        faces.sort_by_key(|(vertices, _)| Reverse(vertices.len()));
        for (vertices, data) in faces {
            self.push(Simplex::from_sorted(vertices, data));
        }
    }

    /// Sorts by filtration value, dimension and vertex sequence.
    pub fn sort(&mut self) {
        self.sort_with(&DataFiltration);
    }

    /// Sorts with a filtration strategy. A strategy that places a coface
    /// before one of its facets voids the closure invariant.
    pub fn sort_with<F>(&mut self, filtration: &F)
    where
        F: Filtration<D, V>,
    {
        self.simplices.sort_by(|a, b| filtration.compare(a, b));
        self.reindex();
    }

    /// Sorts with a caller-supplied comparator. The comparator must be a total
    /// order placing facets before cofaces, otherwise reduction fails.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Simplex<D, V>, &Simplex<D, V>) -> Ordering,
    {
        self.simplices.sort_by(compare);
        self.reindex();
    }

    /// `close_faces` followed by `sort`.
    pub fn prepare(&mut self) {
        self.close_faces();
        self.sort();
    }

    /// Positions of the facets of the simplex at `position`, ascending.
    pub fn boundary(&self, position: usize) -> anyhow::Result<Vec<usize>> {
        let simplex = self
            .simplices
            .get(position)
            .ok_or_else(|| TopologyError::invalid(position, "position out of range"))?;

        let mut rows = Vec::with_capacity(simplex.len());
        for facet in simplex.facets() {
            match self.index.get(&facet) {
                Some(&row) if row < position => rows.push(row),
                Some(&row) => {
                    return Err(TopologyError::invalid(
                        position,
                        format!("facet at position {} does not precede its coface", row),
                    )
                    .into())
                }
                None => {
                    return Err(TopologyError::invalid(position, "facet missing from complex").into())
                }
            }
        }
        rows.sort_unstable();
        Ok(rows)
    }

    /// Checks the closure invariant at every position.
    pub fn validate(&self) -> anyhow::Result<()> {
        for position in 0..self.simplices.len() {
            self.boundary(position)?;
        }
        Ok(())
    }

    pub fn simplices_of_dimension(&self, dimension: usize) -> anyhow::Result<Vec<usize>> {
        let available = self.dimension();
        if dimension > available {
            return Err(TopologyError::DimensionMismatch {
                requested: dimension,
                available,
            }
            .into());
        }
        Ok(self
            .simplices
            .iter()
            .enumerate()
            .filter(|(_, s)| s.dimension() == dimension)
            .map(|(i, _)| i)
            .collect())
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (position, simplex) in self.simplices.iter().enumerate() {
            self.index.insert(simplex.vertices().to_vec(), position);
        }
    }
}

impl<D, V> Default for FilteredComplex<D, V>
where
    D: FiltrationOps,
    V: VertexOps,
{
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<D, V> FromIterator<Simplex<D, V>> for FilteredComplex<D, V>
where
    D: FiltrationOps,
    V: VertexOps,
{
    fn from_iter<I: IntoIterator<Item = Simplex<D, V>>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<D, V> Index<usize> for FilteredComplex<D, V> {
    type Output = Simplex<D, V>;

    fn index(&self, position: usize) -> &Self::Output {
        &self.simplices[position]
    }
}

impl<'a, D, V> IntoIterator for &'a FilteredComplex<D, V> {
    type Item = &'a Simplex<D, V>;
    type IntoIter = std::slice::Iter<'a, Simplex<D, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.simplices.iter()
    }
}

impl<D: fmt::Display, V: fmt::Display> fmt::Display for FilteredComplex<D, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for simplex in &self.simplices {
            writeln!(f, "{}", simplex)?;
        }
        Ok(())
    }
}
