use indexmap::IndexMap;

use crate::config::{DEFAULT_NODE_COLOR, NodegenConfig};
use crate::error::TransformError;
use crate::ir::{AuthType, HttpMethod, MainParams, MetaParams, NodegenParams, Operation};
use crate::parse::operation::{Operation as SpecOperation, PathItem};
use crate::parse::security::SecuritySchemeType;
use crate::parse::spec::OpenApiSpec;

use super::context::OperationContext;
use super::naming::{escape_text, path_prefix, resource_name, title_case};
use super::operation_id::{derive_operation_id, disambiguate};
use super::parameters::normalize_parameters;
use super::request_body::normalize_request_body;

/// Options controlling service metadata and resource selection.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Overrides `info.title` as the service name.
    pub service_name: Option<String>,
    pub node_color: String,
    /// Overrides the auth type derived from `components.securitySchemes`.
    pub auth_type: Option<AuthType>,
    pub excluded_tags: Vec<String>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            service_name: None,
            node_color: DEFAULT_NODE_COLOR.to_string(),
            auth_type: None,
            excluded_tags: vec!["OAuth".to_string()],
        }
    }
}

impl NormalizeOptions {
    pub fn from_config(config: &NodegenConfig) -> Self {
        Self {
            service_name: config.service_name.clone(),
            node_color: config.node_color.clone(),
            auth_type: config.auth_type,
            excluded_tags: config.excluded_tags.clone(),
        }
    }
}

/// Normalize a dereferenced OpenAPI spec into nodegen params.
pub fn normalize(spec: &OpenApiSpec) -> Result<NodegenParams, TransformError> {
    normalize_with_options(spec, &NormalizeOptions::default())
}

/// Normalize with explicit options.
pub fn normalize_with_options(
    spec: &OpenApiSpec,
    options: &NormalizeOptions,
) -> Result<NodegenParams, TransformError> {
    if spec.paths.is_empty() {
        return Err(TransformError::EmptyPaths);
    }

    // Phase 1: Group operations under their resources, document order
    let grouped = group_by_resource(spec, options)?;

    // Phase 2: Build and name the operations of each resource
    let mut main_params: MainParams = IndexMap::with_capacity(grouped.len());
    for (resource, entries) in &grouped {
        main_params.insert(resource.clone(), build_operations(resource, entries));
    }

    // Phase 3: Alphabetize resources
    main_params.sort_keys();

    Ok(NodegenParams {
        meta_params: meta_params(spec, options),
        main_params,
    })
}

/// An operation located in the spec, not yet attached to a resource.
#[derive(Clone, Copy)]
struct SpecEntry<'a> {
    endpoint: &'a str,
    method: HttpMethod,
    path_item: &'a PathItem,
    operation: &'a SpecOperation,
}

impl<'a> SpecEntry<'a> {
    fn in_resource<'r>(self, resource: &'r str) -> OperationContext<'r>
    where
        'a: 'r,
    {
        OperationContext {
            endpoint: self.endpoint,
            method: self.method,
            resource,
            path_item: self.path_item,
            operation: self.operation,
        }
    }
}

fn group_by_resource<'a>(
    spec: &'a OpenApiSpec,
    options: &NormalizeOptions,
) -> Result<IndexMap<String, Vec<SpecEntry<'a>>>, TransformError> {
    let mut grouped: IndexMap<String, Vec<SpecEntry<'a>>> = IndexMap::new();

    for (endpoint, path_item) in &spec.paths {
        let mut any = false;
        for (method, operation) in path_item.operations() {
            any = true;
            let entry = SpecEntry {
                endpoint,
                method,
                path_item,
                operation,
            };
            for resource in resources_of(endpoint, &operation.tags, options) {
                grouped.entry(resource).or_default().push(entry);
            }
        }
        if !any {
            return Err(TransformError::NoOperations(endpoint.clone()));
        }
    }
    Ok(grouped)
}

/// Resources an operation belongs to. Excluded tags are skipped; untagged
/// operations fall back to the first static path segment.
fn resources_of(endpoint: &str, tags: &[String], options: &NormalizeOptions) -> Vec<String> {
    if tags.is_empty() {
        return vec![resource_name(path_prefix(endpoint))];
    }

    let mut resources: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if options.excluded_tags.iter().any(|t| t == tag) {
            log::debug!("{endpoint}: skipping excluded tag {tag}");
            continue;
        }
        let resource = resource_name(tag);
        if !resources.contains(&resource) {
            resources.push(resource);
        }
    }
    resources
}

fn build_operations(resource: &str, entries: &[SpecEntry<'_>]) -> Vec<Operation> {
    let contexts: Vec<OperationContext<'_>> =
        entries.iter().map(|e| e.in_resource(resource)).collect();
    let spec_ids: Vec<Option<&str>> = contexts.iter().map(|c| c.spec_operation_id()).collect();

    let mut operations: Vec<Operation> = contexts
        .iter()
        .enumerate()
        .map(|(i, ctx)| {
            let siblings: Vec<&str> = spec_ids
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .filter_map(|(_, id)| *id)
                .collect();
            build_operation(ctx, &siblings)
        })
        .collect();

    disambiguate(&mut operations, &spec_ids, resource);
    operations.sort_by(|a, b| a.operation_id.cmp(&b.operation_id));
    operations
}

fn build_operation(ctx: &OperationContext<'_>, siblings: &[&str]) -> Operation {
    let operation_id = derive_operation_id(ctx, siblings);
    log::debug!(
        "{}: {} {} -> {operation_id}",
        ctx.resource,
        ctx.method,
        ctx.endpoint
    );

    let mut operation = Operation::new(ctx.endpoint, ctx.method, &operation_id);
    operation.description = ctx.operation.description.as_deref().and_then(escape_text);
    operation.summary = ctx.operation.summary.as_deref().and_then(escape_text);
    operation.parameters = normalize_parameters(ctx);
    if let Some(body) = &ctx.operation.request_body {
        operation.request_body = normalize_request_body(ctx, body);
    }
    operation
}

fn meta_params(spec: &OpenApiSpec, options: &NormalizeOptions) -> MetaParams {
    let service_name = options
        .service_name
        .as_deref()
        .unwrap_or(&spec.info.title);

    let api_url = match spec.servers.first() {
        Some(server) => server.resolved_url(),
        None => {
            log::warn!("spec declares no servers, apiUrl will be empty");
            String::new()
        }
    };

    MetaParams {
        service_name: title_case(service_name),
        auth_type: options.auth_type.unwrap_or_else(|| derive_auth_type(spec)),
        node_color: options.node_color.clone(),
        api_url,
    }
}

/// OAuth2 wins over API keys; HTTP schemes are sent like API keys.
fn derive_auth_type(spec: &OpenApiSpec) -> AuthType {
    let Some(components) = &spec.components else {
        return AuthType::None;
    };
    let types: Vec<&SecuritySchemeType> = components
        .security_schemes
        .values()
        .map(|s| &s.scheme_type)
        .collect();

    if types.contains(&&SecuritySchemeType::OAuth2) {
        AuthType::OAuth2
    } else if types
        .iter()
        .any(|t| matches!(t, SecuritySchemeType::ApiKey | SecuritySchemeType::Http))
    {
        AuthType::ApiKey
    } else {
        AuthType::None
    }
}
