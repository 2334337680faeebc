//! Upload orchestration configuration.

use serde::{Deserialize, Serialize};

/// Upload fan-out settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum uploads in flight at once (0 = launch every upload immediately).
    #[serde(default)]
    pub max_concurrency: usize,
    /// Largest blob accepted before dispatch (default 5 GB).
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 0,
            max_file_size_bytes: default_max_file_size(),
        }
    }
}

fn default_max_file_size() -> u64 {
    5_368_709_120 // 5 GB
}
