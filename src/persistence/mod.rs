//! Key/value persistence
//!
//! Backends:
//! - `MemoryStore`: in-process map (tests, sessions without storage)
//! - `FileStore`: JSON file on disk with tmp → rename writes (native)
//! - `LocalStore`: browser LocalStorage (wasm)
//!
//! Every caller treats storage as best effort: read failures fall back to
//! defaults and write failures are logged, never fatal.

mod file;
mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String key/value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}
