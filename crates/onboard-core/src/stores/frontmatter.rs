//! YAML frontmatter block extraction
//!
//! Contact files are markdown documents carrying one or more `---` delimited
//! YAML blocks. Each block is an independent record; a block that fails to
//! parse is skipped with a warning so one bad record cannot take down the
//! whole store.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

fn block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?ms)^---\s*\n(.*?)\n---").expect("valid frontmatter regex"))
}

/// Extract every parseable YAML block from a markdown document
pub fn extract_yaml_blocks(text: &str) -> Vec<serde_yml::Value> {
    let mut blocks = Vec::new();
    for cap in block_re().captures_iter(text) {
        let raw = &cap[1];
        match serde_yml::from_str::<serde_yml::Value>(raw) {
            Ok(value) => blocks.push(value),
            Err(e) => {
                warn!(error = %e, "skipping malformed frontmatter block");
            }
        }
    }
    blocks
}
