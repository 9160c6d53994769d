//! Manifest resolution: template lookup plus per-kind substitution.
//!
//! Substitution is pure except for the one sanctioned side effect: a
//! [`ManifestTransform::PublishedPort`] transform allocates exactly one port
//! from the shared pool and reports it in the result.

use anyhow::{Context, Result};
use base64::Engine as _;

use crate::application::ports::{PortStateStore, TemplateStore};
use crate::application::services::port_allocator::PortAllocator;
use crate::domain::app::{AppSpec, ManifestTransform, SessionContext, scope_key};
use crate::domain::error::ManifestError;
use crate::domain::resource::{ResourceKind, ResourceManifest};

/// A resolved manifest plus the port allocated while resolving it, if any.
#[derive(Debug)]
pub struct ResolvedManifest {
    pub manifest: ResourceManifest,
    pub allocated_port: Option<u16>,
}

/// Resolve the template for `kind` into a ready-to-submit manifest.
///
/// # Errors
///
/// Fails with [`ManifestError::NotFound`] when no template exists for the
/// kind under the app's template directory, [`ManifestError::Invalid`] when
/// the substituted template is not valid YAML, or a port-pool error when the
/// transform needs a port and none can be allocated.
pub async fn resolve<S: PortStateStore>(
    templates: &impl TemplateStore,
    ports: &PortAllocator<S>,
    app: &AppSpec,
    ctx: &SessionContext,
    kind: ResourceKind,
) -> Result<ResolvedManifest> {
    let template = templates
        .fetch(app.template_dir(), kind)
        .await
        .with_context(|| format!("fetching template for '{kind}'"))?
        .ok_or_else(|| ManifestError::NotFound {
            kind,
            dir: app.template_dir().to_string(),
        })?;

    let mut allocated_port = None;
    let substituted = match app.transform_for(kind) {
        Some(ManifestTransform::ScopeKeyName) => {
            template.replace("{name}", &scope_key(app.name(), &ctx.session))
        }
        Some(ManifestTransform::CredentialSecret) => template
            .replace("{name}", app.name())
            .replace("{password}", &base64_encode(&ctx.credential)),
        Some(ManifestTransform::PublishedPort) => {
            let port = ports.allocate().await?;
            allocated_port = Some(port);
            template
                .replace("{name}", app.name())
                .replace("{port}", &port.to_string())
        }
        None => template.replace("{name}", app.name()),
    };

    let body: serde_json::Value =
        serde_yaml::from_str(&substituted).map_err(|e| ManifestError::Invalid {
            kind,
            reason: e.to_string(),
        })?;

    Ok(ResolvedManifest {
        manifest: ResourceManifest { kind, body },
        allocated_port,
    })
}

/// Base64-encode a secret credential for embedding in a Secret manifest.
#[must_use]
pub fn base64_encode(secret: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(secret.as_bytes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;
    use std::collections::HashMap;

    use anyhow::Result;

    use super::*;
    use crate::application::ports::PortStateStore;
    use crate::domain::app::{AppSpec, HookBinding, HookPoint};
    use crate::domain::config::PortRange;

    struct MapTemplates(HashMap<&'static str, &'static str>);

    impl TemplateStore for MapTemplates {
        async fn fetch(&self, _dir: &str, kind: ResourceKind) -> Result<Option<String>> {
            Ok(self.0.get(kind.template_stem()).map(ToString::to_string))
        }
    }

    #[derive(Default)]
    struct MemoryStore(std::sync::Mutex<BTreeSet<u16>>);

    impl PortStateStore for MemoryStore {
        async fn load(&self) -> Result<BTreeSet<u16>> {
            Ok(self.0.lock().expect("lock").clone())
        }
        async fn save(&self, ports: &BTreeSet<u16>) -> Result<()> {
            *self.0.lock().expect("lock") = ports.clone();
            Ok(())
        }
    }

    fn app() -> AppSpec {
        AppSpec::new(
            "editor",
            "editor",
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
        .expect("valid spec")
    }

    fn ctx() -> SessionContext {
        SessionContext {
            session: "s1".to_string(),
            credential: "admin".to_string(),
        }
    }

    fn pool() -> PortAllocator<MemoryStore> {
        PortAllocator::new(
            MemoryStore::default(),
            PortRange {
                min: 9000,
                max: 9000,
            },
        )
    }

    #[tokio::test]
    async fn default_substitution_fills_only_the_app_name() {
        let templates = MapTemplates(HashMap::from([(
            "deployment",
            "metadata:\n  name: {name}\n",
        )]));
        let resolved = resolve(&templates, &pool(), &app(), &ctx(), ResourceKind::Deployment)
            .await
            .expect("resolve");
        assert_eq!(resolved.manifest.body["metadata"]["name"], "editor");
        assert!(resolved.allocated_port.is_none());
    }

    #[tokio::test]
    async fn namespace_is_named_by_the_scope_key() {
        let templates = MapTemplates(HashMap::from([(
            "namespace",
            "metadata:\n  name: {name}\n",
        )]));
        let resolved = resolve(&templates, &pool(), &app(), &ctx(), ResourceKind::Namespace)
            .await
            .expect("resolve");
        assert_eq!(resolved.manifest.body["metadata"]["name"], "editor-s1");
    }

    #[tokio::test]
    async fn secret_carries_the_encoded_credential() {
        let templates = MapTemplates(HashMap::from([(
            "secret",
            "metadata:\n  name: {name}\ndata:\n  password: {password}\n",
        )]));
        let resolved = resolve(&templates, &pool(), &app(), &ctx(), ResourceKind::Secret)
            .await
            .expect("resolve");
        assert_eq!(resolved.manifest.body["data"]["password"], "YWRtaW4=");
    }

    #[tokio::test]
    async fn service_resolution_allocates_exactly_one_port() {
        let templates = MapTemplates(HashMap::from([(
            "service",
            "metadata:\n  name: {name}\nspec:\n  ports:\n    - port: {port}\n",
        )]));
        let ports = pool();
        let resolved = resolve(&templates, &ports, &app(), &ctx(), ResourceKind::Service)
            .await
            .expect("resolve");
        assert_eq!(resolved.allocated_port, Some(9000));
        assert_eq!(resolved.manifest.body["spec"]["ports"][0]["port"], 9000);
        assert!(!ports.is_available(9000).await.expect("is_available"));
    }

    #[tokio::test]
    async fn missing_template_is_a_manifest_not_found_error() {
        let templates = MapTemplates(HashMap::new());
        let err = resolve(&templates, &pool(), &app(), &ctx(), ResourceKind::Secret)
            .await
            .expect_err("expected Err");
        let manifest_err = err.downcast_ref::<ManifestError>().expect("ManifestError");
        assert!(matches!(
            manifest_err,
            ManifestError::NotFound {
                kind: ResourceKind::Secret,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn unparseable_template_is_a_manifest_invalid_error() {
        let templates = MapTemplates(HashMap::from([("deployment", ": not yaml: [")]));
        let err = resolve(&templates, &pool(), &app(), &ctx(), ResourceKind::Deployment)
            .await
            .expect_err("expected Err");
        assert!(matches!(
            err.downcast_ref::<ManifestError>(),
            Some(ManifestError::Invalid { .. })
        ));
    }

    #[test]
    fn base64_encoding_matches_the_classic_vector() {
        assert_eq!(base64_encode("admin"), "YWRtaW4=");
    }
}
