use async_trait::async_trait;
use std::io;

/// Stored-file collaborator. Upload handling lives outside this service;
/// only delete-by-path is needed here, for post-delete cleanup.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn remove(&self, path: &str) -> io::Result<()>;
}

/// Local-disk file store; `path` is the value stored on the place record.
pub struct LocalFiles;

#[async_trait]
impl FileStore for LocalFiles {
    async fn remove(&self, path: &str) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }
}

/// Recording store for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingFiles {
        pub removed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FileStore for RecordingFiles {
        async fn remove(&self, path: &str) -> io::Result<()> {
            self.removed.lock().unwrap().push(path.to_string());
            Ok(())
        }
    }
}
