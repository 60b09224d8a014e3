use crate::ir::HttpMethod;
use crate::parse::operation::{Operation, PathItem};

/// Everything a normalization step needs to know about the operation at hand.
/// Built once per (resource, operation) pair and passed down by reference.
#[derive(Debug, Clone, Copy)]
pub struct OperationContext<'a> {
    pub endpoint: &'a str,
    pub method: HttpMethod,
    pub resource: &'a str,
    pub path_item: &'a PathItem,
    pub operation: &'a Operation,
}

impl<'a> OperationContext<'a> {
    pub fn spec_operation_id(&self) -> Option<&'a str> {
        self.operation.operation_id.as_deref()
    }
}
