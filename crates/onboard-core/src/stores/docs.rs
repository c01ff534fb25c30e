//! Markdown document store with keyword search
//!
//! Documents are split into heading-delimited chunks at load time; search is
//! a simple keyword-count ranking over those chunks. Retrieval quality is
//! intentionally basic, the answer only needs enough context for the model
//! to ground its reply.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::Result;

/// Maximum characters per chunk; long sections are split
const MAX_CHUNK_CHARS: usize = 800;

/// Characters of chunk text shown in a search hit
const SNIPPET_CHARS: usize = 260;

#[derive(Debug, Clone)]
struct DocChunk {
    path: PathBuf,
    title: String,
    text: String,
}

/// A scored search result
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub path: String,
    pub title: String,
    pub score: usize,
    pub snippet: String,
}

/// In-memory index over the markdown documents tree
#[derive(Debug, Default)]
pub struct DocStore {
    chunks: Vec<DocChunk>,
}

impl DocStore {
    /// Load and chunk every `*.md` file under the given root
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut store = Self::default();

        for entry in WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        {
            let path = entry.path();
            match std::fs::read_to_string(path) {
                Ok(text) => store.index_document(path, &text),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable document");
                }
            }
        }

        debug!(chunks = store.chunks.len(), root = %root.display(), "document index built");
        Ok(store)
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    fn index_document(&mut self, path: &Path, text: &str) {
        let file_title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut title = file_title.clone();
        let mut buffer = String::new();

        for line in text.lines() {
            if let Some(heading) = heading_title(line) {
                self.push_chunks(path, &title, &buffer);
                title = heading.to_string();
                buffer.clear();
            } else {
                buffer.push_str(line);
                buffer.push('\n');
            }
        }
        self.push_chunks(path, &title, &buffer);
    }

    /// Append a section as one or more length-capped chunks
    fn push_chunks(&mut self, path: &Path, title: &str, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let chars: Vec<char> = text.chars().collect();
        for piece in chars.chunks(MAX_CHUNK_CHARS) {
            self.chunks.push(DocChunk {
                path: path.to_path_buf(),
                title: title.to_string(),
                text: piece.iter().collect(),
            });
        }
    }

    /// Keyword search over the chunk index
    ///
    /// The score of a chunk is the total occurrence count of the query's
    /// alphanumeric tokens in its lowercased text. A blank query returns no
    /// hits without touching the index.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        let tokens: Vec<String> = query
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, &DocChunk)> = self
            .chunks
            .iter()
            .map(|chunk| {
                let haystack = chunk.text.to_lowercase();
                let score: usize = tokens.iter().map(|t| haystack.matches(t.as_str()).count()).sum();
                (score, chunk)
            })
            .filter(|(score, _)| *score > 0)
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(top_k)
            .map(|(score, chunk)| SearchHit {
                path: chunk.path.display().to_string(),
                title: chunk.title.clone(),
                score,
                snippet: snippet(&chunk.text),
            })
            .collect()
    }
}

/// Title of a markdown heading line, if it is one
fn heading_title(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if (1..=6).contains(&hashes) {
        trimmed[hashes..].strip_prefix(' ').map(str::trim)
    } else {
        None
    }
}

fn snippet(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= SNIPPET_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(SNIPPET_CHARS).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn store_with(content: &str) -> DocStore {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.md");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        DocStore::load(dir.path()).unwrap()
    }

    #[test]
    fn splits_on_headings() {
        let store = store_with("# VPN Setup\nInstall the client.\n\n# Email\nUse webmail.\n");
        assert_eq!(store.len(), 2);

        let hits = store.search("vpn client", 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "VPN Setup");
    }

    #[test]
    fn long_sections_are_capped() {
        let body = "word ".repeat(400);
        let store = store_with(&format!("# Long\n{}\n", body));
        assert!(store.len() > 1);
    }

    #[test]
    fn blank_query_returns_nothing() {
        let store = store_with("# VPN\nInstall the client.\n");
        assert!(store.search("   ", 5).is_empty());
        assert!(store.search("", 5).is_empty());
    }

    #[test]
    fn ranking_counts_occurrences() {
        let store = store_with("# A\nvpn once here.\n\n# B\nvpn vpn vpn everywhere.\n");
        let hits = store.search("vpn", 5);
        assert_eq!(hits[0].title, "B");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn snippet_is_truncated() {
        let body = "x".repeat(500);
        let store = store_with(&format!("# S\n{}\n", body));
        let hits = store.search("x", 1);
        assert!(hits[0].snippet.ends_with("..."));
        assert!(hits[0].snippet.chars().count() <= SNIPPET_CHARS + 3);
    }
}
