//! Launchpad library — provisions short-lived, per-session application
//! instances on a Kubernetes cluster and tears them down again.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod application;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infra;
pub mod output;
