//! External TFTP collaborator boundary.
//!
//! `copy tftp://HOST/PATH system:/running-config` delegates the fetch to
//! this trait; the launcher wires in a real client, tests wire in
//! [`StaticTftpReader`]. The session never holds the config lock across
//! the fetch.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::TftpError;

/// Abstract TFTP file reader.
#[async_trait]
pub trait TftpReader: Send + Sync {
    /// Fetch `path` from `host` as text.
    async fn read(&self, host: &str, path: &str) -> Result<String, TftpError>;
}

/// In-memory reader serving a fixed set of files, keyed by
/// `host/path`.
#[derive(Debug, Default)]
pub struct StaticTftpReader {
    files: HashMap<String, String>,
}

impl StaticTftpReader {
    /// Create an empty reader; every fetch fails until files are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `contents` for `host`/`path`.
    pub fn with_file(
        mut self,
        host: impl Into<String>,
        path: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        self.files
            .insert(format!("{}/{}", host.into(), path.into()), contents.into());
        self
    }
}

#[async_trait]
impl TftpReader for StaticTftpReader {
    async fn read(&self, host: &str, path: &str) -> Result<String, TftpError> {
        self.files
            .get(&format!("{host}/{path}"))
            .cloned()
            .ok_or_else(|| TftpError::Unreachable {
                host: host.to_string(),
                path: path.to_string(),
                reason: "Timed out".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_reader() {
        let reader = StaticTftpReader::new().with_file("10.0.0.1", "conf/switch.cfg", "vlan 10");
        assert_eq!(
            reader.read("10.0.0.1", "conf/switch.cfg").await.unwrap(),
            "vlan 10"
        );
        assert!(reader.read("10.0.0.1", "missing.cfg").await.is_err());
    }
}
