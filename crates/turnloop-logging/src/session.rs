use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use turnloop_core::{LoopEvent, StateIdentity};

/// Default directory for session logs: `<data_local_dir>/turnloop/logs`.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("turnloop")
        .join("logs")
}

/// Appends every loop event of one run as a timestamped JSON line.
pub struct SessionFile {
    file: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl SessionFile {
    /// Create a new session file in `dir`. The file name is derived from the
    /// current UTC time and a hash of the identity, so identities that are
    /// not valid file names still get a stable, safe prefix.
    pub fn create(dir: &Path, identity: &StateIdentity) -> io::Result<Self> {
        fs::create_dir_all(dir)?;

        let path = dir.join(Self::file_name(identity, Utc::now()));
        let file = File::create(&path)?;

        Ok(Self {
            file: Mutex::new(BufWriter::new(file)),
            path,
        })
    }

    /// `<timestamp>_<short hash>.jsonl`
    pub fn file_name(identity: &StateIdentity, at: DateTime<Utc>) -> String {
        let timestamp = at.format("%Y-%m-%dT%H-%M-%SZ");

        let mut hasher = Sha256::new();
        hasher.update(identity.as_bytes());
        let hash = hex::encode(hasher.finalize());

        format!("{}_{}.jsonl", timestamp, &hash[..6])
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_event(&self, event: &LoopEvent) {
        let mut value = serde_json::to_value(event).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(Utc::now().to_rfc3339()),
            );
        }

        if let Ok(mut writer) = self.file.lock() {
            let _ = writeln!(writer, "{}", value);
            let _ = writer.flush();
        }
    }
}
