//! `if`/`else if` chains routing the node's resource and operation selectors.
//!
//! Whether a branch opens or continues a chain depends only on its index.

use super::Lines;
use crate::helper::operation_value;

/// `if (resource === 'widget') {` for the first resource, `} else if (...) {` after.
pub fn resource_branch(index: usize, resource: &str) -> String {
    chain(index, &format!("resource === '{resource}'"))
}

pub fn operation_branch(index: usize, operation_id: &str) -> String {
    chain(index, &format!("operation === '{}'", operation_value(operation_id)))
}

fn chain(index: usize, condition: &str) -> String {
    if index == 0 {
        format!("if ({condition}) {{")
    } else {
        format!("}} else if ({condition}) {{")
    }
}

/// Push a branch into `lines`: the first opens the chain, later ones continue it.
pub fn push_branch(lines: &mut Lines, index: usize, branch: String) {
    if index == 0 {
        lines.open(branch);
    } else {
        lines.reopen(branch);
    }
}

/// Close an operation chain, optionally throwing on unknown operations.
pub fn operation_close(lines: &mut Lines, error_branch: bool) {
    close_chain(lines, error_branch, "operation");
}

/// Close the resource chain, optionally throwing on unknown resources.
pub fn resource_close(lines: &mut Lines, error_branch: bool) {
    close_chain(lines, error_branch, "resource");
}

fn close_chain(lines: &mut Lines, error_branch: bool, selector: &str) {
    if error_branch {
        lines.reopen("} else {");
        lines.line(format!(
            "throw new NodeOperationError(this.getNode(), `Unknown {selector}: ${{{selector}}}`);"
        ));
    }
    lines.close("}");
}
