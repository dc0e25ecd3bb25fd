//! Text chunking with configurable size and overlap.
//!
//! Boundaries are positional: a window of `size` characters slides forward
//! by `size - overlap` characters. Chunks may split words or sentences.

use assist_core::{AppError, AppResult};

/// Validated window parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingParams {
    size: usize,
    overlap: usize,
}

impl ChunkingParams {
    /// Validate `size` and `overlap`.
    ///
    /// # Errors
    /// `AppError::Config` when `size == 0` or `overlap >= size`.
    pub fn new(size: usize, overlap: usize) -> AppResult<Self> {
        if size == 0 {
            return Err(AppError::Config("chunk size must be positive".to_string()));
        }
        if overlap >= size {
            return Err(AppError::Config(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, size
            )));
        }
        Ok(Self { size, overlap })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    fn step(&self) -> usize {
        self.size - self.overlap
    }
}

/// Split `text` into overlapping windows.
///
/// Empty text yields no chunks; text no longer than `size` yields one chunk
/// equal to the whole text. The last chunk may be shorter than `size`.
pub fn split(text: &str, params: ChunkingParams) -> Vec<&str> {
    if text.is_empty() {
        return vec![];
    }

    // Byte offset of every char, plus the end of the text.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = bounds.len() - 1;

    let mut chunks = Vec::with_capacity(char_len / params.step() + 1);
    let mut start = 0;

    while start < char_len {
        let end = (start + params.size).min(char_len);
        chunks.push(&text[bounds[start]..bounds[end]]);
        start += params.step();
    }

    tracing::trace!(
        "Chunked {} chars into {} chunks (size: {}, overlap: {})",
        char_len,
        chunks.len(),
        params.size,
        params.overlap
    );

    chunks
}

/// Validate the parameters and split `text`.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> AppResult<Vec<&str>> {
    Ok(split(text, ChunkingParams::new(size, overlap)?))
}
