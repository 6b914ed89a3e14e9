use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

/// Append-only JSON array of created virtual testnet ids.
///
/// Kept so that testnets can be found and deleted after a run. Failures are
/// logged and the id is dropped; they never abort a simulation.
#[derive(Debug, Clone)]
pub struct TestnetIdLog {
    path: PathBuf,
}

impl TestnetIdLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `id`, creating the file if it does not exist.
    pub fn append(&self, id: &str) {
        let mut ids: Vec<String> = match std::fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(ids) => ids,
                Err(e) => {
                    error!(
                        path = %self.path.display(),
                        error = %e,
                        event = "testnet_id_log_parse_failed"
                    );
                    return;
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                error!(
                    path = %self.path.display(),
                    error = %e,
                    event = "testnet_id_log_read_failed"
                );
                return;
            }
        };

        ids.push(id.to_string());

        let written = serde_json::to_string_pretty(&ids)
            .map_err(std::io::Error::from)
            .and_then(|json| std::fs::write(&self.path, json));
        match written {
            Ok(()) => debug!(
                path = %self.path.display(),
                testnet_id = id,
                total = ids.len(),
                event = "testnet_id_recorded"
            ),
            Err(e) => error!(
                path = %self.path.display(),
                error = %e,
                event = "testnet_id_log_write_failed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "across-actions-{name}-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn read_ids(path: &Path) -> Vec<String> {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_creates_then_appends() {
        let path = scratch_path("append");
        let log = TestnetIdLog::new(&path);

        log.append("vnet-1");
        log.append("vnet-2");

        assert_eq!(read_ids(&path), vec!["vnet-1", "vnet-2"]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_left_alone() {
        let path = scratch_path("corrupt");
        std::fs::write(&path, "not json").unwrap();

        TestnetIdLog::new(&path).append("vnet-1");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
        std::fs::remove_file(&path).unwrap();
    }
}
