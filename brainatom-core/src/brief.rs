use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::BrainError;

/// A named piece of role material, e.g. a markdown file describing how to behave.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Brief {
    pub name: String,
    pub content: String,
}

impl Brief {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Reads a brief from disk, named after its path.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, BrainError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| BrainError::BriefLoad {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            name: path.display().to_string(),
            content,
        })
    }
}

/// Renders briefs into a single system directive. No briefs, no directive.
pub fn cast_briefs_to_prompt(briefs: &[Brief]) -> Option<String> {
    if briefs.is_empty() {
        return None;
    }

    let sections: Vec<String> = briefs
        .iter()
        .map(|brief| format!("# {}\n\n{}", brief.name, brief.content.trim_end()))
        .collect();
    Some(sections.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_briefs_yield_no_directive() {
        assert_eq!(cast_briefs_to_prompt(&[]), None);
    }

    #[test]
    fn briefs_render_in_order_under_headings() {
        let prompt = cast_briefs_to_prompt(&[
            Brief::new("tone.md", "Be concise.\n"),
            Brief::new("format.md", "Answer in JSON."),
        ])
        .unwrap();
        assert_eq!(
            prompt,
            "# tone.md\n\nBe concise.\n\n# format.md\n\nAnswer in JSON."
        );
    }

    #[tokio::test]
    async fn load_reads_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("role.md");
        std::fs::write(&path, "You review code.").unwrap();

        let brief = Brief::load(&path).await.unwrap();
        assert_eq!(brief.content, "You review code.");
        assert!(brief.name.ends_with("role.md"));
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let err = Brief::load("/definitely/not/here.md").await.unwrap_err();
        assert!(matches!(err, BrainError::BriefLoad { .. }));
        assert!(err.to_string().contains("/definitely/not/here.md"));
    }
}
