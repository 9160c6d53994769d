//! Instance details and pure helpers around the observed endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller-facing record describing one application instance.
///
/// Returned from launch and refresh calls; the API layer and scheduled
/// cleanup jobs consume this shape and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceDetails {
    /// Observed workload phase, absent while no pod exists.
    pub status: Option<String>,
    /// Public URL, absent until the endpoint is assigned.
    pub url: Option<String>,
    /// When the cluster was last observed.
    pub last_checked_at: DateTime<Utc>,
}

/// Recover the published port from an observed instance URL.
///
/// The port is not tracked against the instance; uninstall recovers it from
/// the URL (`http://10.0.0.1:9321` → `9321`) so it can be released.
#[must_use]
pub fn port_from_url(url: &str) -> Option<u16> {
    url.rsplit_once(':')
        .and_then(|(_, port)| port.parse().ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn recovers_the_port_from_a_service_url() {
        assert_eq!(port_from_url("http://10.0.0.1:9321"), Some(9321));
    }

    #[test]
    fn url_without_a_port_yields_none() {
        // rsplit lands on the scheme separator, which does not parse.
        assert_eq!(port_from_url("http://10.0.0.1"), None);
        assert_eq!(port_from_url("ten-thousand"), None);
    }

    #[test]
    fn out_of_range_port_yields_none() {
        assert_eq!(port_from_url("http://10.0.0.1:99999"), None);
    }

    proptest! {
        #[test]
        fn any_formatted_port_is_recovered(port in 1u16..=u16::MAX) {
            let url = format!("http://192.0.2.7:{port}");
            prop_assert_eq!(port_from_url(&url), Some(port));
        }
    }
}
