use std::io;
use std::path::{Path, PathBuf};
use time::UtcDateTime;

/// Filesystem home for post attachments. Files land under the configured
/// directory and are served back verbatim under the `/uploads` route.
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub async fn create(dir: PathBuf) -> io::Result<Self> {
        tokio::fs::create_dir_all(&dir).await?;

        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the bytes under a generated name and returns that name for use
    /// as the post's file reference. No inspection of type, size, or content.
    pub async fn store(
        &self,
        field: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> io::Result<String> {
        let file_name = generated_file_name(field, original_name, UtcDateTime::now());
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;

        Ok(file_name)
    }
}

/// `<field>-<unix millis><original extension>`, so repeated uploads of the
/// same file name do not collide.
fn generated_file_name(field: &str, original_name: &str, now: UtcDateTime) -> String {
    let millis = now.unix_timestamp_nanos() / 1_000_000;

    match Path::new(original_name).extension() {
        Some(extension) => format!("{field}-{millis}.{}", extension.to_string_lossy()),
        None => format!("{field}-{millis}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{UploadStore, generated_file_name};
    use time::macros::utc_datetime;

    #[test]
    fn generated_name_keeps_extension() {
        let now = utc_datetime!(2023-11-14 22:13:20);

        assert_eq!(
            generated_file_name("file", "photo.png", now),
            "file-1700000000000.png"
        );
        assert_eq!(
            generated_file_name("file", "archive.tar.gz", now),
            "file-1700000000000.gz"
        );
    }

    #[test]
    fn generated_name_without_extension() {
        let now = utc_datetime!(2023-11-14 22:13:20);

        assert_eq!(generated_file_name("file", "README", now), "file-1700000000000");
        assert_eq!(generated_file_name("file", "", now), "file-1700000000000");
    }

    #[tokio::test]
    async fn stored_bytes_are_retrievable() {
        let dir = std::env::temp_dir().join(format!("pinwall-uploads-{}", std::process::id()));
        let store = UploadStore::create(dir.clone()).await.unwrap();

        let name = store.store("file", "photo.png", b"pixels").await.unwrap();
        assert!(name.starts_with("file-"));
        assert!(name.ends_with(".png"));

        let bytes = tokio::fs::read(dir.join(&name)).await.unwrap();
        assert_eq!(bytes, b"pixels");

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }
}
