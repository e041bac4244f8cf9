use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::classifier::Classifier;

const MAGIC: &[u8; 4] = b"LADL";
const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = MAGIC.len() + 4 + 32;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Corrupt model file: {0}")]
    Corrupt(String),
    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
    #[error("Failed to encode model: {0}")]
    Encode(String),
}

impl ModelError {
    /// True for every failure caused by the file contents rather than the filesystem.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt(_) | Self::HashMismatch { .. })
    }
}

#[derive(Serialize)]
struct ModelFileRef<'a> {
    classifier: &'a Classifier,
}

#[derive(Deserialize)]
struct ModelFile {
    classifier: Classifier,
}

/// Persists fitted classifiers to a single file.
///
/// Layout: `LADL` magic, format version (u32 LE), SHA-256 of the payload, then the
/// bincode-encoded classifier. Loading checks every part before handing out a model.
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates a store at the default model location
    pub fn new_default() -> Self {
        Self::new(Self::default_path())
    }

    /// Returns the default model file path
    pub fn default_path() -> PathBuf {
        Self::default_models_dir().join("model.bin")
    }

    /// Returns the default models directory path
    pub fn default_models_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("LADLE_CACHE") {
            return PathBuf::from(path).join("models");
        }

        // 2. Use platform-specific cache directory
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("ladle").join("models");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("ladle").join("models");
        }

        // 4. If all else fails, use system temp directory
        env::temp_dir().join("ladle").join("models")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Writes `classifier` to the store's path, replacing any existing file.
    ///
    /// The file is written next to the target and renamed over it, so a failed save
    /// leaves the previous model in place.
    pub fn save(&self, classifier: &Classifier) -> Result<(), ModelError> {
        let payload = bincode::serialize(&ModelFileRef { classifier })
            .map_err(|e| ModelError::Encode(e.to_string()))?;
        let hash = Sha256::digest(&payload);

        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&hash);
        bytes.extend_from_slice(&payload);

        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                log::info!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };

        log::info!("Writing {} bytes to {:?}", bytes.len(), self.path);
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        log::info!("Model saved with hash {:x}", hash);
        Ok(())
    }

    /// Reads and validates the classifier stored at the store's path.
    pub fn load(&self) -> Result<Classifier, ModelError> {
        let payload = self.read_verified()?;
        let file: ModelFile = bincode::deserialize(payload.as_slice())
            .map_err(|e| ModelError::Corrupt(format!("failed to decode model: {}", e)))?;

        file.classifier.validate().map_err(ModelError::Corrupt)?;
        log::info!(
            "Loaded model with {} features from {:?}",
            file.classifier.info().vocabulary_size,
            self.path
        );
        Ok(file.classifier)
    }

    /// Checks the header and checksum without decoding the model.
    pub fn verify(&self) -> Result<bool, ModelError> {
        match self.read_verified() {
            Ok(_) => Ok(true),
            Err(e) if e.is_corrupt() => {
                log::warn!("Model verification failed: {}", e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Deletes the model file if present.
    pub fn remove(&self) -> Result<(), ModelError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn read_verified(&self) -> Result<Vec<u8>, ModelError> {
        let bytes = fs::read(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ModelError::NotFound(self.path.clone()),
            _ => ModelError::IoError(e),
        })?;
        log::info!("Read {} bytes from {:?}", bytes.len(), self.path);

        if bytes.len() < HEADER_LEN {
            return Err(ModelError::Corrupt(format!(
                "file is {} bytes, shorter than the {} byte header",
                bytes.len(),
                HEADER_LEN
            )));
        }

        let (magic, rest) = bytes.split_at(MAGIC.len());
        if magic != MAGIC {
            return Err(ModelError::Corrupt("not a ladle model file".into()));
        }

        let (version, rest) = rest.split_at(4);
        let mut version_bytes = [0u8; 4];
        version_bytes.copy_from_slice(version);
        let version = u32::from_le_bytes(version_bytes);
        if version != FORMAT_VERSION {
            return Err(ModelError::Corrupt(format!(
                "unsupported format version {}",
                version
            )));
        }

        let (expected, payload) = rest.split_at(32);
        let actual = Sha256::digest(payload);
        if actual.as_slice() != expected {
            let expected = expected.iter().map(|b| format!("{:02x}", b)).collect::<String>();
            let actual = format!("{:x}", actual);
            log::error!("Model hash mismatch: expected {}, got {}", expected, actual);
            return Err(ModelError::HashMismatch { expected, actual });
        }

        Ok(payload.to_vec())
    }
}
