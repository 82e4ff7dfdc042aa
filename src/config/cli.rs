use crate::core::Storage;
use crate::utils::error::{BillError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        fs::read(&full_path)
            .await
            .map_err(|e| BillError::unreadable(full_path.display().to_string(), e))
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        let destination = full_path.display().to_string();

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BillError::unwritable(destination.clone(), e))?;
        }

        fs::write(&full_path, data)
            .await
            .map_err(|e| BillError::unwritable(destination, e))
    }

    async fn list_files(&self, dir: &str, extension: &str) -> Result<Vec<String>> {
        let full_path = self.resolve(dir);
        let unreadable = |e: std::io::Error| BillError::unreadable(full_path.display().to_string(), e);

        let mut entries = fs::read_dir(&full_path).await.map_err(unreadable)?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
            if matches && path.is_file() {
                // 回傳相對於 base_path 的路徑，才能再交給 read_file
                files.push(Path::new(dir).join(entry.file_name()).display().to_string());
            }
        }

        files.sort();
        Ok(files)
    }

    async fn is_directory(&self, path: &str) -> bool {
        fs::metadata(self.resolve(path))
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }
}
