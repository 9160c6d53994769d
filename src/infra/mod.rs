//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the Kubernetes client, the
//! filesystem template store, and the Valkey port-pool store.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod cluster;
pub mod port_store;
pub mod templates;
