//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`, or
//! `crate::application`. All error types implement `thiserror::Error` and
//! convert to `anyhow::Error` via the `?` operator.

use std::time::Duration;

use thiserror::Error;

use crate::domain::resource::ResourceKind;

// ── Manifest errors ───────────────────────────────────────────────────────────

/// Errors from manifest template lookup and resolution.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest for resource '{kind}' not found under '{dir}'")]
    NotFound { kind: ResourceKind, dir: String },

    #[error("manifest for resource '{kind}' is not valid YAML: {reason}")]
    Invalid { kind: ResourceKind, reason: String },
}

// ── Cluster errors ────────────────────────────────────────────────────────────

/// A cluster API failure other than the locally-recovered "already exists"
/// and "not found" conditions, which are outcomes, not errors.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("cluster API rejected the request ({reason}): {message}")]
    Api { reason: String, message: String },

    #[error("cluster request failed: {0}")]
    Transport(String),

    #[error("manifest body does not describe a {kind}: {reason}")]
    InvalidBody { kind: ResourceKind, reason: String },

    #[error("resource kind '{kind}' requires a namespace scope")]
    MissingScope { kind: ResourceKind },
}

// ── Wait errors ───────────────────────────────────────────────────────────────

/// Failures of bounded wait loops.
///
/// `DeadlineExceeded` is distinct from [`ClusterError`] so callers can tell
/// "the cluster is broken" from "the cluster is just slow".
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("timed out after {waited:?} waiting for {what}")]
    DeadlineExceeded { what: String, waited: Duration },

    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

// ── Port pool errors ──────────────────────────────────────────────────────────

/// Errors from the shared port pool.
#[derive(Debug, Error)]
pub enum PortPoolError {
    #[error("no free port in {min}-{max} after {attempts} attempts")]
    Exhausted { min: u16, max: u16, attempts: u32 },

    #[error("port pool store error: {0}")]
    Store(String),
}

// ── Catalog errors ────────────────────────────────────────────────────────────

/// Errors related to the application catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("the app '{name}' is not supported. Valid apps: {valid}")]
    UnknownApp { name: String, valid: String },

    #[error("invalid app definition for '{app}': {reason}")]
    InvalidSpec { app: String, reason: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to orchestrator configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid port range {min}-{max}: the range must be non-empty")]
    EmptyPortRange { min: u16, max: u16 },

    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("poll deadline must be no shorter than the poll interval")]
    DeadlineTooShort,
}
