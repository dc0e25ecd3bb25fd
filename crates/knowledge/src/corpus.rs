//! Corpus sources: where the documents of an index come from.
//!
//! A source lists filenames and reads each one as a single text blob.
//! Failing to read one document skips it; failing to list the collection
//! fails the load.

use crate::types::Document;
use assist_core::{AppError, AppResult};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use walkdir::WalkDir;

/// A set of named plain-text documents.
pub trait CorpusSource: Send + Sync {
    /// Short description for logs (e.g., the directory path).
    fn describe(&self) -> String;

    /// Filenames currently in the collection, sorted.
    ///
    /// An absent collection is empty, not an error.
    fn list(&self) -> AppResult<Vec<String>>;

    /// Full text of one document.
    fn read(&self, filename: &str) -> AppResult<String>;
}

/// Documents stored as files directly inside one directory.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    dir: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryCorpus {
    pub fn new(dir: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            extensions: extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn should_include(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

impl CorpusSource for DirectoryCorpus {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    fn list(&self) -> AppResult<Vec<String>> {
        if !self.dir.exists() {
            tracing::warn!("Knowledge base directory not found: {:?}", self.dir);
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(|e| {
                AppError::CorpusLoad(format!("Failed to list {:?}: {}", self.dir, e))
            })?;

            let path = entry.path();
            if entry.file_type().is_file() && self.should_include(path) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    fn read(&self, filename: &str) -> AppResult<String> {
        let path = self.dir.join(filename);
        fs::read_to_string(&path)
            .map_err(|e| AppError::CorpusLoad(format!("Failed to read {:?}: {}", path, e)))
    }
}

/// In-memory documents, for fixtures and embedding callers.
///
/// A document inserted with [`MemoryCorpus::insert_unreadable`] is listed
/// but fails to read.
#[derive(Debug, Default)]
pub struct MemoryCorpus {
    documents: RwLock<BTreeMap<String, Option<String>>>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from `(filename, text)` pairs.
    pub fn with_documents<I, K, V>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let corpus = Self::new();
        for (name, text) in documents {
            corpus.insert(name, text);
        }
        corpus
    }

    pub fn insert(&self, filename: impl Into<String>, text: impl Into<String>) {
        self.write().insert(filename.into(), Some(text.into()));
    }

    pub fn insert_unreadable(&self, filename: impl Into<String>) {
        self.write().insert(filename.into(), None);
    }

    pub fn remove(&self, filename: &str) {
        self.write().remove(filename);
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, Option<String>>> {
        self.documents.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl CorpusSource for MemoryCorpus {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn list(&self) -> AppResult<Vec<String>> {
        let documents = self.documents.read().unwrap_or_else(|e| e.into_inner());
        Ok(documents.keys().cloned().collect())
    }

    fn read(&self, filename: &str) -> AppResult<String> {
        let documents = self.documents.read().unwrap_or_else(|e| e.into_inner());
        match documents.get(filename) {
            Some(Some(text)) => Ok(text.clone()),
            Some(None) => Err(AppError::CorpusLoad(format!("{} is unreadable", filename))),
            None => Err(AppError::CorpusLoad(format!("{} not found", filename))),
        }
    }
}

const BUILTIN_TITLES: &[(&str, &str)] = &[
    ("cartilha_sei_content.txt", "Cartilha do Usuário SEI"),
    ("manual_sei_4_content.txt", "Manual do Usuário SEI 4.0"),
    ("manual_usuario_sei_content.txt", "Manual do Usuário SEI"),
    ("pdf_content.txt", "Manual de Prestação de Contas SDP - 4ª CRE"),
];

/// Maps a filename to the human-readable document title.
#[derive(Debug, Clone)]
pub struct TitleResolver {
    titles: HashMap<String, String>,
}

impl Default for TitleResolver {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl TitleResolver {
    /// Built-in titles with `overrides` taking precedence.
    pub fn new(overrides: HashMap<String, String>) -> Self {
        let mut titles: HashMap<String, String> = BUILTIN_TITLES
            .iter()
            .map(|(file, title)| (file.to_string(), title.to_string()))
            .collect();
        titles.extend(overrides);
        Self { titles }
    }

    /// Title for `filename`, falling back to the filename without extension.
    pub fn resolve(&self, filename: &str) -> String {
        if let Some(title) = self.titles.get(filename) {
            return title.clone();
        }
        Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename)
            .to_string()
    }
}

/// Documents read from a source in one pass.
#[derive(Debug, Default)]
pub struct LoadedCorpus {
    pub documents: Vec<Document>,

    /// Filenames that could not be read
    pub skipped: Vec<String>,
}

/// Read every listed document, skipping the unreadable ones.
///
/// # Errors
/// `AppError::CorpusLoad` when the collection cannot be listed, or when it
/// lists documents and none of them can be read.
pub fn load_documents(source: &dyn CorpusSource, titles: &TitleResolver) -> AppResult<LoadedCorpus> {
    let names = source.list()?;
    let mut loaded = LoadedCorpus::default();

    for name in names {
        match source.read(&name) {
            Ok(text) => loaded.documents.push(Document {
                title: titles.resolve(&name),
                filename: name,
                text,
            }),
            Err(e) => {
                tracing::warn!("Skipping document {}: {}", name, e);
                loaded.skipped.push(name);
            }
        }
    }

    if loaded.documents.is_empty() && !loaded.skipped.is_empty() {
        return Err(AppError::CorpusLoad(format!(
            "none of the {} documents in {} could be read",
            loaded.skipped.len(),
            source.describe()
        )));
    }

    Ok(loaded)
}
