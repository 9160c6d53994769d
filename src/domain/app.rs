//! Application definitions — the data that parameterizes the orchestrator.
//!
//! An [`AppSpec`] replaces per-application subclassing with explicit tables:
//! which resource kinds the app uses, which of them the launch sequence
//! creates directly, what to create immediately before/after each of those
//! (hooks), and how each kind's manifest template is substituted.

use crate::domain::error::CatalogError;
use crate::domain::resource::ResourceKind;

/// Moment at which a hook fires relative to its resource's create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPoint {
    Pre,
    Post,
}

/// Resources to create immediately before or after `kind`'s own create call.
#[derive(Debug, Clone)]
pub struct HookBinding {
    pub kind: ResourceKind,
    pub point: HookPoint,
    pub create: Vec<ResourceKind>,
}

/// Per-kind manifest substitution, applied by the resolver.
///
/// Absence of an entry means the default app-name-only substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestTransform {
    /// The resource is named by the scope key (the grouping namespace).
    ScopeKeyName,
    /// The manifest carries the base64-encoded session credential.
    CredentialSecret,
    /// The manifest carries a freshly allocated public port.
    PublishedPort,
}

/// Everything the orchestrator needs to know about one application type.
///
/// The hook table is folded into the creation order at construction time;
/// only the flattened order is kept.
#[derive(Debug, Clone)]
pub struct AppSpec {
    name: &'static str,
    template_dir: String,
    resources: Vec<ResourceKind>,
    transforms: Vec<(ResourceKind, ManifestTransform)>,
    order: Vec<ResourceKind>,
}

impl AppSpec {
    /// Build and validate an application definition.
    ///
    /// `launch_sequence` lists the kinds the orchestrator creates directly,
    /// in order; hook-created kinds are expanded around them.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidSpec`] if the launch sequence is empty,
    /// references undeclared kinds, or the hook graph contains a cycle.
    pub fn new(
        name: &'static str,
        template_dir: impl Into<String>,
        resources: Vec<ResourceKind>,
        launch_sequence: Vec<ResourceKind>,
        hooks: Vec<HookBinding>,
        transforms: Vec<(ResourceKind, ManifestTransform)>,
    ) -> Result<Self, CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidSpec {
            app: name.to_string(),
            reason,
        };

        if launch_sequence.is_empty() {
            return Err(invalid("launch sequence is empty".to_string()));
        }
        for kind in launch_sequence
            .iter()
            .chain(hooks.iter().flat_map(|h| h.create.iter().chain([&h.kind])))
            .chain(transforms.iter().map(|(kind, _)| kind))
        {
            if !resources.contains(kind) {
                return Err(invalid(format!("resource '{kind}' is not declared")));
            }
        }

        let mut order = Vec::new();
        let mut stack = Vec::new();
        for kind in &launch_sequence {
            expand(*kind, &hooks, &mut order, &mut stack).map_err(|kind| {
                invalid(format!("hook cycle detected through resource '{kind}'"))
            })?;
        }

        Ok(Self {
            name,
            template_dir: template_dir.into(),
            resources,
            transforms,
            order,
        })
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn template_dir(&self) -> &str {
        &self.template_dir
    }

    /// Kinds this application uses.
    #[must_use]
    pub fn resources(&self) -> &[ResourceKind] {
        &self.resources
    }

    /// The manifest transform for `kind`, if one is declared.
    #[must_use]
    pub fn transform_for(&self, kind: ResourceKind) -> Option<ManifestTransform> {
        self.transforms
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, t)| *t)
    }

    /// Flattened create-call order: each launched kind preceded by its
    /// pre-hook kinds and followed by its post-hook kinds, recursively.
    #[must_use]
    pub fn creation_order(&self) -> &[ResourceKind] {
        &self.order
    }
}

/// Depth-first hook expansion. The in-progress `stack` detects cycles; the
/// offending kind is returned as the error.
fn expand(
    kind: ResourceKind,
    hooks: &[HookBinding],
    order: &mut Vec<ResourceKind>,
    stack: &mut Vec<ResourceKind>,
) -> Result<(), ResourceKind> {
    if stack.contains(&kind) {
        return Err(kind);
    }
    stack.push(kind);
    for binding in hooks.iter().filter(|h| h.kind == kind) {
        if binding.point == HookPoint::Pre {
            for hooked in &binding.create {
                expand(*hooked, hooks, order, stack)?;
            }
        }
    }
    order.push(kind);
    for binding in hooks.iter().filter(|h| h.kind == kind) {
        if binding.point == HookPoint::Post {
            for hooked in &binding.create {
                expand(*hooked, hooks, order, stack)?;
            }
        }
    }
    stack.pop();
    Ok(())
}

/// Derive the namespace-scope key for an (application, session) pair.
///
/// The key is the unit of cluster-side grouping and the sole addressing key
/// the orchestrator needs; it is never persisted, callers re-derive it.
#[must_use]
pub fn scope_key(app_name: &str, session: &str) -> String {
    format!("{app_name}-{session}")
}

/// Per-session inputs to a launch.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Session identifier supplied by the external session store.
    pub session: String,
    /// Credential injected into the app's secret.
    pub credential: String,
}
