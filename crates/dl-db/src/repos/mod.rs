//! Repository modules implementing every DataLink store operation.
//!
//! Each module adds methods to `DataLinkService` via `impl DataLinkService` blocks.

pub mod audit;
pub mod backup;
pub mod browse;
pub mod metrics;
pub mod query;
pub mod records;
pub mod schema;
