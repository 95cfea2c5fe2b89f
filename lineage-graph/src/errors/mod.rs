//! Error types for the lineage graph store.

mod serialize;
mod store;
mod traversal;

pub use serialize::SerializeError;
pub use store::StoreError;
pub use traversal::{BudgetKind, TraversalError};
