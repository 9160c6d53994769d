//! Orchestrator configuration schema and validators.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_PORT_MIN: u16 = 9000;
pub const DEFAULT_PORT_MAX: u16 = 65535;

// ── Port range ───────────────────────────────────────────────────────────────

/// Inclusive port range the allocator draws from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PortRange {
    pub min: u16,
    pub max: u16,
}

impl Default for PortRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_PORT_MIN,
            max: DEFAULT_PORT_MAX,
        }
    }
}

impl PortRange {
    /// Validates that the range contains at least one port.
    ///
    /// # Errors
    ///
    /// Returns an error if `min > max`.
    pub fn validate(self) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::EmptyPortRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Whether `port` lies within the range.
    #[must_use]
    pub fn contains(self, port: u16) -> bool {
        (self.min..=self.max).contains(&port)
    }
}

// ── Poll settings ────────────────────────────────────────────────────────────

/// Interval and deadline for one polling loop.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    /// Sleep between attempts.
    pub interval: Duration,
    /// Total budget before the loop fails with a deadline error.
    pub deadline: Duration,
}

impl PollSettings {
    /// Defaults for waiting on workload readiness and endpoint assignment.
    #[must_use]
    pub fn readiness() -> Self {
        Self {
            interval: Duration::from_millis(300),
            deadline: Duration::from_secs(300),
        }
    }

    /// Defaults for waiting on namespace termination.
    #[must_use]
    pub fn termination() -> Self {
        Self {
            interval: Duration::from_secs(1),
            deadline: Duration::from_secs(600),
        }
    }

    /// Validates interval and deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is zero or the deadline is shorter
    /// than the interval.
    pub fn validate(self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.deadline < self.interval {
            return Err(ConfigError::DeadlineTooShort);
        }
        Ok(())
    }
}

// ── Valkey connection ────────────────────────────────────────────────────────

/// Valkey connection configuration for the shared port pool.
#[derive(Debug, Clone)]
pub struct ValkeyConfig {
    /// Valkey host address.
    pub host: String,
    /// Valkey port.
    pub port: u16,
    /// Optional password for authentication.
    pub password: Option<String>,
    /// Whether to use TLS (`rediss://`).
    pub tls: bool,
}

impl Default for ValkeyConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            tls: false,
        }
    }
}

impl ValkeyConfig {
    /// Build the connection URL for this config.
    #[must_use]
    pub fn connection_url(&self) -> String {
        let scheme = if self.tls { "rediss" } else { "redis" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
