pub mod error;
pub mod network;
pub mod persistence;
pub mod topology;
mod utils;

pub use error::TopologyError;
pub use utils::FiltrationOps;
pub use utils::VertexOps;

pub use persistence::{
    reduce, reduce_all, reduce_bipartite_array, reduce_bipartite_buffer, reduce_bipartite_matrix,
    reduce_dimension, reduce_with, reduce_zero_dimensional, BipartiteOptions,
    BoundaryMatrixReducer, ConnectedComponentsTracker, PersistenceDiagram, PersistencePairing,
    Point, ReductionAlgorithm,
};
pub use topology::{FilteredComplex, Simplex};
