#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use bounce_classifier::config::{LABELS_FILE, VOCAB_FILE, WEIGHTS_FILE};
use bounce_classifier::{expected_weight_count, LoadError, ModelLoader, ModelSource, KNOWN_LABELS};

pub const EMBEDDING_DIM: usize = 64;
pub const HIDDEN_UNITS: usize = 64;
pub const NUM_LABELS: usize = 16;
pub const FIXED: usize = 4096 + 64 + 1024 + 16;
pub const DENSE2_KERNEL_OFFSET: usize = 4096 + 64;

pub const VOCAB: [&str; 8] = ["", "[UNK]", "mailbox", "quota", "exceeded", "user", "unknown", "the"];

/// Index of `mailbox_full` in [`KNOWN_LABELS`]
pub const MAILBOX_FULL: usize = 8;

pub fn vocab_json() -> Vec<u8> {
    serde_json::to_vec(&VOCAB).unwrap()
}

pub fn labels_json() -> Vec<u8> {
    let map: HashMap<String, &str> = KNOWN_LABELS
        .iter()
        .enumerate()
        .map(|(i, l)| (i.to_string(), *l))
        .collect();
    serde_json::to_vec(&map).unwrap()
}

/// Weights where "mailbox", "quota" and "exceeded" push hard towards
/// `mailbox_full` and every other input yields a uniform distribution.
pub fn mailbox_weights() -> Vec<f32> {
    let mut buffer = vec![0.0f32; expected_weight_count(VOCAB.len())];
    for id in 2..=4 {
        buffer[FIXED + id * EMBEDDING_DIM] = 200.0;
    }
    buffer[0] = 1.0;
    buffer[DENSE2_KERNEL_OFFSET + MAILBOX_FULL] = 3.0;
    buffer
}

pub fn to_le_bytes(floats: &[f32]) -> Vec<u8> {
    floats.iter().flat_map(|f| f.to_le_bytes()).collect()
}

pub fn bundle_files() -> HashMap<String, Vec<u8>> {
    HashMap::from([
        (VOCAB_FILE.to_string(), vocab_json()),
        (LABELS_FILE.to_string(), labels_json()),
        (WEIGHTS_FILE.to_string(), to_le_bytes(&mailbox_weights())),
    ])
}

/// Writes a bundle into a fresh directory under the system temp dir
pub fn write_bundle(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bounce-classifier-test-{}-{}", std::process::id(), name));
    std::fs::create_dir_all(&dir).unwrap();
    for (file, bytes) in bundle_files() {
        std::fs::write(dir.join(file), bytes).unwrap();
    }
    dir
}

/// In-memory loader that counts weight loads and can be told to fail
pub struct MemoryLoader {
    files: HashMap<String, Vec<u8>>,
    delay: Duration,
    pub weight_loads: AtomicUsize,
    pub fail: AtomicBool,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::with_files(bundle_files())
    }

    pub fn with_files(files: HashMap<String, Vec<u8>>) -> Self {
        Self {
            files,
            delay: Duration::from_millis(0),
            weight_loads: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn loads(&self) -> usize {
        self.weight_loads.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl ModelLoader for MemoryLoader {
    async fn load_bytes(&self, _source: &ModelSource, file: &str) -> Result<Vec<u8>, LoadError> {
        if file == WEIGHTS_FILE {
            self.weight_loads.fetch_add(1, Ordering::SeqCst);
        }
        tokio::time::sleep(self.delay).await;
        if self.fail.load(Ordering::SeqCst) {
            return Err(LoadError::from(io::Error::new(io::ErrorKind::NotFound, "offline")));
        }
        self.files
            .get(file)
            .cloned()
            .ok_or_else(|| LoadError::from(io::Error::new(io::ErrorKind::NotFound, file.to_string())))
    }
}
