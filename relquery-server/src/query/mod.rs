//! Query descriptors, plans and execution

pub mod descriptor;
pub mod document;
pub mod executor;
pub mod plan;
pub mod raw;
pub mod record;
pub mod value;

pub use descriptor::{JoinKind, JoinPath, Operator, Predicate, QueryDescriptor};
pub use document::{to_documents, Document};
pub use executor::QueryExecutor;
pub use plan::{Plan, PlanColumn};
pub use raw::RawStatement;
pub use record::Record;
pub use value::Value;
