//! Application catalog — maps app identifiers to orchestration definitions.

pub mod vscode;

use crate::domain::app::AppSpec;
use crate::domain::error::CatalogError;

/// Applications the catalog can launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppId {
    VsCode,
}

impl AppId {
    /// All supported applications.
    pub const ALL: [AppId; 1] = [AppId::VsCode];

    /// Canonical name used in manifests, scope keys, and the CLI.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AppId::VsCode => "vscode",
        }
    }

    /// Resolve a user-supplied app name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownApp`] listing the valid names.
    pub fn from_name(name: &str) -> Result<Self, CatalogError> {
        Self::ALL
            .into_iter()
            .find(|app| app.name() == name)
            .ok_or_else(|| CatalogError::UnknownApp {
                name: name.to_string(),
                valid: valid_names().join(", "),
            })
    }
}

/// Names of all supported applications.
#[must_use]
pub fn valid_names() -> Vec<&'static str> {
    AppId::ALL.into_iter().map(AppId::name).collect()
}

/// Build the orchestration definition for an application.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidSpec`] if the definition fails validation
/// (a programming error in the catalog itself).
pub fn app_spec(id: AppId) -> Result<AppSpec, CatalogError> {
    match id {
        AppId::VsCode => vscode::spec(),
    }
}

/// Default credential for an application when the caller supplies none.
#[must_use]
pub fn default_credential(id: AppId) -> &'static str {
    match id {
        AppId::VsCode => vscode::DEFAULT_PASSWORD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vscode_resolves_by_name() {
        assert_eq!(AppId::from_name("vscode").expect("vscode"), AppId::VsCode);
    }

    #[test]
    fn unknown_app_lists_valid_names() {
        let err = AppId::from_name("emacs").expect_err("expected Err");
        let msg = err.to_string();
        assert!(msg.contains("'emacs' is not supported"), "{msg}");
        assert!(msg.contains("vscode"), "{msg}");
    }

    #[test]
    fn every_catalog_entry_builds_a_valid_spec() {
        for id in AppId::ALL {
            let spec = app_spec(id).expect("valid spec");
            assert_eq!(spec.name(), id.name());
        }
    }
}
