use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::TopologyError;
use crate::utils::{FiltrationOps, VertexOps};

/// A simplex: a non-empty, sorted, duplicate-free vertex set together with a
/// filtration value.
///
/// Equality and hashing only look at the vertices. Two simplices spanning the
/// same vertices are the same simplex, whatever their filtration values.
#[derive(Debug, Clone)]
pub struct Simplex<D, V> {
    vertices: Vec<V>,
    data: D,
}

impl<D, V> Simplex<D, V>
where
    D: FiltrationOps,
    V: VertexOps,
{
    pub fn new<I>(vertices: I, data: D) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = V>,
    {
        let mut vertices: Vec<V> = vertices.into_iter().collect();
        if vertices.is_empty() {
            return Err(
                TopologyError::Format("a simplex needs at least one vertex".to_string()).into(),
            );
        }
        vertices.sort_unstable();
        vertices.dedup();
        Ok(Simplex { vertices, data })
    }

    /// 0-simplex
    pub fn vertex(v: V, data: D) -> Self {
        Simplex {
            vertices: vec![v],
            data,
        }
    }

    pub(crate) fn from_sorted(vertices: Vec<V>, data: D) -> Self {
        debug_assert!(!vertices.is_empty());
        debug_assert!(vertices.windows(2).all(|w| w[0] < w[1]));
        Simplex { vertices, data }
    }

    pub fn dimension(&self) -> usize {
        self.vertices.len() - 1
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn data(&self) -> D {
        self.data
    }

    pub fn set_data(&mut self, data: D) {
        self.data = data;
    }

    pub fn contains(&self, v: V) -> bool {
        self.vertices.binary_search(&v).is_ok()
    }

    /// Codimension-1 faces, one per omitted vertex, each still sorted.
    pub fn facets(&self) -> impl Iterator<Item = Vec<V>> + '_ {
        let n = if self.vertices.len() > 1 {
            self.vertices.len()
        } else {
            0
        };
        (0..n).map(move |skip| {
            self.vertices
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &v)| v)
                .collect()
        })
    }
}

impl<D, V: PartialEq> PartialEq for Simplex<D, V> {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

impl<D, V: Eq> Eq for Simplex<D, V> {}

impl<D, V: Hash> Hash for Simplex<D, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vertices.hash(state);
    }
}

impl<D: fmt::Display, V: fmt::Display> fmt::Display for Simplex<D, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, v) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "}} @ {}", self.data)
    }
}
