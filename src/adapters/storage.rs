use crate::core::ModelStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Model artifacts on the local filesystem, relative to `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Splits a file path into a store rooted at its directory and the file name.
    pub fn for_file(path: &str) -> (Self, String) {
        let path = Path::new(path);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (Self::new(dir), name)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl ModelStore for LocalStorage {
    async fn read_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(name);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_bytes(&self, name: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(name);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}
