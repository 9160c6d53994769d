//! Kubernetes adapter implementing the cluster port traits.
//!
//! Resources are addressed by scope key: the grouping namespace by its own
//! name, namespaced kinds as the first object of their kind inside the
//! scope's namespace.

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Namespace, PersistentVolumeClaim, Pod, Secret, Service};
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::core::ErrorResponse;
use kube::{Client, ResourceExt as _};

use crate::application::ports::{ClusterProbe, ResourceProvisioner};
use crate::domain::error::ClusterError;
use crate::domain::resource::{
    CreateOutcome, DeleteOutcome, ReadOutcome, ResourceKind, ResourceManifest,
};

/// Cluster adapter backed by the Kubernetes API.
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    /// Connect using the ambient kubeconfig or in-cluster environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ClusterError`] if no client configuration can be inferred.
    pub async fn connect() -> Result<Self, ClusterError> {
        let client = Client::try_default().await.map_err(to_cluster_error)?;
        Ok(Self { client })
    }

    /// Wrap an existing client (in-cluster callers construct their own).
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ResourceProvisioner for KubeCluster {
    async fn create(
        &self,
        manifest: &ResourceManifest,
        scope: Option<&str>,
    ) -> Result<CreateOutcome, ClusterError> {
        let kind = manifest.kind;
        let client = self.client.clone();
        match kind {
            ResourceKind::Namespace => {
                create_obj(Api::<Namespace>::all(client), kind, &manifest.body).await
            }
            ResourceKind::Secret => {
                let ns = require_scope(kind, scope)?;
                create_obj(Api::<Secret>::namespaced(client, ns), kind, &manifest.body).await
            }
            ResourceKind::PersistentVolumeClaim => {
                let ns = require_scope(kind, scope)?;
                create_obj(
                    Api::<PersistentVolumeClaim>::namespaced(client, ns),
                    kind,
                    &manifest.body,
                )
                .await
            }
            ResourceKind::Deployment => {
                let ns = require_scope(kind, scope)?;
                create_obj(
                    Api::<Deployment>::namespaced(client, ns),
                    kind,
                    &manifest.body,
                )
                .await
            }
            ResourceKind::Service => {
                let ns = require_scope(kind, scope)?;
                create_obj(Api::<Service>::namespaced(client, ns), kind, &manifest.body).await
            }
        }
    }

    async fn read(&self, kind: ResourceKind, scope: &str) -> Result<ReadOutcome, ClusterError> {
        let client = self.client.clone();
        match kind {
            ResourceKind::Namespace => {
                match Api::<Namespace>::all(client).get_opt(scope).await {
                    Ok(Some(_)) => Ok(ReadOutcome::Found),
                    Ok(None) => Ok(ReadOutcome::NotFound),
                    Err(e) => Err(to_cluster_error(e)),
                }
            }
            ResourceKind::Secret => first_present(Api::<Secret>::namespaced(client, scope)).await,
            ResourceKind::PersistentVolumeClaim => {
                first_present(Api::<PersistentVolumeClaim>::namespaced(client, scope)).await
            }
            ResourceKind::Deployment => {
                first_present(Api::<Deployment>::namespaced(client, scope)).await
            }
            ResourceKind::Service => first_present(Api::<Service>::namespaced(client, scope)).await,
        }
    }

    async fn delete(&self, kind: ResourceKind, scope: &str) -> Result<DeleteOutcome, ClusterError> {
        let client = self.client.clone();
        match kind {
            ResourceKind::Namespace => {
                match Api::<Namespace>::all(client)
                    .delete(scope, &DeleteParams::default())
                    .await
                {
                    Ok(_) => Ok(DeleteOutcome::Deleted),
                    Err(kube::Error::Api(resp)) if is_not_found(&resp) => {
                        Ok(DeleteOutcome::NotFound)
                    }
                    Err(e) => Err(to_cluster_error(e)),
                }
            }
            ResourceKind::Secret => delete_first(Api::<Secret>::namespaced(client, scope)).await,
            ResourceKind::PersistentVolumeClaim => {
                delete_first(Api::<PersistentVolumeClaim>::namespaced(client, scope)).await
            }
            ResourceKind::Deployment => {
                delete_first(Api::<Deployment>::namespaced(client, scope)).await
            }
            ResourceKind::Service => delete_first(Api::<Service>::namespaced(client, scope)).await,
        }
    }
}

impl ClusterProbe for KubeCluster {
    async fn workload_phase(&self, scope: &str) -> Result<Option<String>, ClusterError> {
        let pods = Api::<Pod>::namespaced(self.client.clone(), scope)
            .list(&ListParams::default())
            .await
            .map_err(to_cluster_error)?;
        Ok(pods
            .items
            .into_iter()
            .next()
            .and_then(|pod| pod.status.and_then(|status| status.phase)))
    }

    async fn service_url(&self, scope: &str) -> Result<Option<String>, ClusterError> {
        let services = Api::<Service>::namespaced(self.client.clone(), scope)
            .list(&ListParams::default())
            .await
            .map_err(to_cluster_error)?;
        Ok(services.items.first().and_then(public_url))
    }
}

// ── Generic helpers ───────────────────────────────────────────────────────────

fn require_scope(kind: ResourceKind, scope: Option<&str>) -> Result<&str, ClusterError> {
    scope.ok_or(ClusterError::MissingScope { kind })
}

async fn create_obj<K>(
    api: Api<K>,
    kind: ResourceKind,
    body: &serde_json::Value,
) -> Result<CreateOutcome, ClusterError>
where
    K: Clone + std::fmt::Debug + serde::Serialize + serde::de::DeserializeOwned,
{
    let obj: K = serde_json::from_value(body.clone()).map_err(|e| ClusterError::InvalidBody {
        kind,
        reason: e.to_string(),
    })?;
    match api.create(&PostParams::default(), &obj).await {
        Ok(_) => Ok(CreateOutcome::Created),
        Err(kube::Error::Api(resp)) if is_already_exists(&resp) => Ok(CreateOutcome::AlreadyExists),
        Err(e) => Err(to_cluster_error(e)),
    }
}

async fn first_present<K>(api: Api<K>) -> Result<ReadOutcome, ClusterError>
where
    K: Clone + std::fmt::Debug + serde::de::DeserializeOwned,
{
    let list = api
        .list(&ListParams::default())
        .await
        .map_err(to_cluster_error)?;
    if list.items.is_empty() {
        Ok(ReadOutcome::NotFound)
    } else {
        Ok(ReadOutcome::Found)
    }
}

async fn delete_first<K>(api: Api<K>) -> Result<DeleteOutcome, ClusterError>
where
    K: kube::Resource + Clone + std::fmt::Debug + serde::de::DeserializeOwned,
{
    let list = api
        .list(&ListParams::default())
        .await
        .map_err(to_cluster_error)?;
    let Some(first) = list.items.into_iter().next() else {
        return Ok(DeleteOutcome::NotFound);
    };
    match api.delete(&first.name_any(), &DeleteParams::default()).await {
        Ok(_) => Ok(DeleteOutcome::Deleted),
        Err(kube::Error::Api(resp)) if is_not_found(&resp) => Ok(DeleteOutcome::NotFound),
        Err(e) => Err(to_cluster_error(e)),
    }
}

// ── Error and status mapping ──────────────────────────────────────────────────

fn is_already_exists(resp: &ErrorResponse) -> bool {
    resp.reason.eq_ignore_ascii_case("alreadyexists") || resp.code == 409
}

fn is_not_found(resp: &ErrorResponse) -> bool {
    resp.reason.eq_ignore_ascii_case("notfound") || resp.code == 404
}

fn to_cluster_error(err: kube::Error) -> ClusterError {
    match err {
        kube::Error::Api(resp) => api_error(resp),
        other => ClusterError::Transport(other.to_string()),
    }
}

fn api_error(resp: ErrorResponse) -> ClusterError {
    ClusterError::Api {
        reason: resp.reason,
        message: resp.message,
    }
}

/// First load-balancer ingress IP plus the first declared port.
fn public_url(svc: &Service) -> Option<String> {
    let ip = svc
        .status
        .as_ref()?
        .load_balancer
        .as_ref()?
        .ingress
        .as_ref()?
        .first()?
        .ip
        .as_ref()?;
    let port = svc.spec.as_ref()?.ports.as_ref()?.first()?.port;
    Some(format!("http://{ip}:{port}"))
}
