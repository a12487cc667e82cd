use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::system::FortuneSystem;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read-only snapshot of every corpus, built once at startup and shared
/// across concurrent lookups. Two system ids sharing one source file share
/// one entry.
#[derive(Debug, Clone, Default)]
pub struct CorpusStore {
    texts: HashMap<&'static str, String>,
}

impl CorpusStore {
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, CorpusError> {
        let dir = dir.as_ref();
        let mut texts: HashMap<&'static str, String> = HashMap::new();
        for system in FortuneSystem::ALL {
            let file = system.info().data_file;
            if texts.contains_key(file) {
                continue;
            }
            let text = fs::read_to_string(dir.join(file)).map_err(|source| CorpusError::Io {
                file: file.to_string(),
                source,
            })?;
            info!("loaded corpus {file} ({} bytes)", text.len());
            texts.insert(file, text);
        }
        Ok(Self { texts })
    }

    /// Build a store from in-memory texts keyed by corpus file name.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, String)>,
    {
        Self {
            texts: entries.into_iter().collect(),
        }
    }

    pub fn text(&self, system: FortuneSystem) -> Option<&str> {
        self.texts.get(system.info().data_file).map(String::as_str)
    }
}
