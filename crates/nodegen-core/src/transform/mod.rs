pub mod context;
pub mod fields;
pub mod naming;
pub mod operation_id;
pub mod parameters;
pub mod request_body;
pub mod schema_merge;
pub mod spec_to_params;

pub use context::OperationContext;
pub use spec_to_params::{NormalizeOptions, normalize, normalize_with_options};
