//! Cluster resource kinds and resolved manifests.

use serde::{Deserialize, Serialize};

/// Resource kinds the orchestrator knows how to manage.
///
/// Ordering among kinds is defined by an application's hook wiring, not by
/// this enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Namespace,
    Secret,
    PersistentVolumeClaim,
    Deployment,
    Service,
}

impl ResourceKind {
    /// All supported kinds.
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Namespace,
        ResourceKind::Secret,
        ResourceKind::PersistentVolumeClaim,
        ResourceKind::Deployment,
        ResourceKind::Service,
    ];

    /// File stem of the kind's manifest template (`<stem>.yaml`).
    #[must_use]
    pub fn template_stem(self) -> &'static str {
        match self {
            ResourceKind::Namespace => "namespace",
            ResourceKind::Secret => "secret",
            ResourceKind::PersistentVolumeClaim => "pvc",
            ResourceKind::Deployment => "deployment",
            ResourceKind::Service => "service",
        }
    }

    /// Whether resources of this kind live inside a namespace.
    ///
    /// The namespace itself is the grouping resource and is cluster-scoped.
    #[must_use]
    pub fn is_namespaced(self) -> bool {
        !matches!(self, ResourceKind::Namespace)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.template_stem())
    }
}

/// A fully resolved, ready-to-submit resource description.
///
/// The body is opaque to the orchestrator; only the cluster adapter
/// interprets it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceManifest {
    pub kind: ResourceKind,
    pub body: serde_json::Value,
}

/// Outcome of a create call.
///
/// The cluster's "already exists" rejection is a successful, idempotent
/// no-op, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Outcome of a read call. "Not found" is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Found,
    NotFound,
}

/// Outcome of a delete call. "Not found" is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_stems_match_manifest_filenames() {
        assert_eq!(ResourceKind::Namespace.template_stem(), "namespace");
        assert_eq!(ResourceKind::Secret.template_stem(), "secret");
        assert_eq!(ResourceKind::PersistentVolumeClaim.template_stem(), "pvc");
        assert_eq!(ResourceKind::Deployment.template_stem(), "deployment");
        assert_eq!(ResourceKind::Service.template_stem(), "service");
    }

    #[test]
    fn only_the_namespace_is_cluster_scoped() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.is_namespaced(), kind != ResourceKind::Namespace);
        }
    }

    #[test]
    fn display_uses_the_template_stem() {
        assert_eq!(
            ResourceKind::PersistentVolumeClaim.to_string(),
            "pvc".to_string()
        );
    }
}
