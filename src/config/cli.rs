use crate::core::Storage;
use crate::utils::error::Result;
use std::path::Path;

/// Storage rooted at a local directory. Paths are relative to `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read_nested_path() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_string_lossy().to_string());

        storage.write_file("runs/a.json", b"[]").await.unwrap();
        assert_eq!(storage.read_file("runs/a.json").await.unwrap(), b"[]".to_vec());
    }

    #[tokio::test]
    async fn test_absolute_path_bypasses_base() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("snapshot.json");
        std::fs::write(&file, b"{}").unwrap();

        let storage = LocalStorage::new("./does-not-matter".to_string());
        let data = storage.read_file(file.to_str().unwrap()).await.unwrap();
        assert_eq!(data, b"{}".to_vec());
    }
}
