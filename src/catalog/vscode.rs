//! VS Code application definition.

use crate::domain::app::{AppSpec, HookBinding, HookPoint, ManifestTransform};
use crate::domain::error::CatalogError;
use crate::domain::resource::ResourceKind;

/// Password baked into the Secret when the caller does not supply one.
pub const DEFAULT_PASSWORD: &str = "admin";

/// Orchestration definition for a per-session VS Code instance.
///
/// The deployment anchors the launch sequence: its pre-hook brings up the
/// namespace, secret, and volume claim it depends on, and its post-hook
/// publishes the service once the workload exists.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidSpec`] if the wiring fails validation.
pub fn spec() -> Result<AppSpec, CatalogError> {
    AppSpec::new(
        "vscode",
        "vscode",
        ResourceKind::ALL.to_vec(),
        vec![ResourceKind::Deployment],
        vec![
            HookBinding {
                kind: ResourceKind::Deployment,
                point: HookPoint::Pre,
                create: vec![
                    ResourceKind::Namespace,
                    ResourceKind::Secret,
                    ResourceKind::PersistentVolumeClaim,
                ],
            },
            HookBinding {
                kind: ResourceKind::Deployment,
                point: HookPoint::Post,
                create: vec![ResourceKind::Service],
            },
        ],
        vec![
            (ResourceKind::Namespace, ManifestTransform::ScopeKeyName),
            (ResourceKind::Secret, ManifestTransform::CredentialSecret),
            (ResourceKind::Service, ManifestTransform::PublishedPort),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_order_is_namespace_first_service_last() {
        let spec = spec().expect("valid spec");
        assert_eq!(
            spec.creation_order(),
            [
                ResourceKind::Namespace,
                ResourceKind::Secret,
                ResourceKind::PersistentVolumeClaim,
                ResourceKind::Deployment,
                ResourceKind::Service,
            ]
        );
    }

    #[test]
    fn session_specific_kinds_carry_transforms() {
        let spec = spec().expect("valid spec");
        assert_eq!(
            spec.transform_for(ResourceKind::Namespace),
            Some(ManifestTransform::ScopeKeyName)
        );
        assert_eq!(
            spec.transform_for(ResourceKind::Secret),
            Some(ManifestTransform::CredentialSecret)
        );
        assert_eq!(
            spec.transform_for(ResourceKind::Service),
            Some(ManifestTransform::PublishedPort)
        );
        assert_eq!(spec.transform_for(ResourceKind::Deployment), None);
    }
}
