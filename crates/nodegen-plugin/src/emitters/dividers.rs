//! Comment banners separating resources and operations in generated code.

const RESOURCE_WIDTH: usize = 70;
const OPERATION_WIDTH: usize = 34;

/// Banner opening a resource branch of the router.
pub fn resource_divider(resource: &str) -> String {
    banner(resource, '*', RESOURCE_WIDTH)
}

/// Banner opening an operation branch, with a link to the API docs when known.
pub fn operation_divider(resource: &str, operation_id: &str, operation_url: Option<&str>) -> String {
    let mut out = banner(&format!("{resource}: {operation_id}"), '-', OPERATION_WIDTH);
    if let Some(url) = operation_url {
        out.push_str("\n// ");
        out.push_str(url);
    }
    out
}

/// Banner preceding the field definitions of an operation.
pub fn description_divider(resource: &str, operation_id: &str) -> String {
    banner(&format!("{resource}: {operation_id}"), '-', OPERATION_WIDTH)
}

fn banner(title: &str, fill: char, width: usize) -> String {
    let rule = fill.to_string().repeat(width);
    let pad = width.saturating_sub(title.chars().count()) / 2;
    format!("// {rule}\n// {}{title}\n// {rule}", " ".repeat(pad))
}
