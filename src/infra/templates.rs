//! Filesystem template store.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::TemplateStore;
use crate::domain::resource::ResourceKind;

/// Reads manifest templates from `{root}/{template_dir}/{kind}.yaml`.
pub struct FsTemplateStore {
    root: PathBuf,
}

impl FsTemplateStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl TemplateStore for FsTemplateStore {
    async fn fetch(&self, template_dir: &str, kind: ResourceKind) -> Result<Option<String>> {
        let path = self
            .root
            .join(template_dir)
            .join(format!("{}.yaml", kind.template_stem()));
        match tokio::fs::read_to_string(&path).await {
            Ok(template) => Ok(Some(template)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("reading template {}", path.display()))
            }
        }
    }
}
