//! Declarative compactor descriptions, as read from configuration files.

use crate::{CommentCompactor, Compactor, JsonCompactor, WhitespaceCompactor};
use pb_core::{PackError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A built-in compactor and its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompactorSpec {
    Json {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extensions: Option<Vec<String>>,
    },
    Whitespace {
        extensions: Vec<String>,
    },
    Comments {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extensions: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        marker: Option<String>,
    },
}

impl CompactorSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Json { .. } => "json",
            Self::Whitespace { .. } => "whitespace",
            Self::Comments { .. } => "comments",
        }
    }

    /// Construct a fresh compactor instance.
    pub fn build(&self) -> Result<Arc<dyn Compactor>> {
        match self {
            Self::Json { extensions: None } => Ok(Arc::new(JsonCompactor::new())),
            Self::Json { extensions: Some(exts) } => {
                require_extensions(self.kind(), exts)?;
                Ok(Arc::new(JsonCompactor::with_extensions(exts)))
            }
            Self::Whitespace { extensions } => {
                require_extensions(self.kind(), extensions)?;
                Ok(Arc::new(WhitespaceCompactor::new(extensions)))
            }
            Self::Comments { extensions, marker } => {
                if let Some(exts) = extensions {
                    require_extensions(self.kind(), exts)?;
                }
                let extensions: Vec<&str> = match extensions {
                    Some(exts) => exts.iter().map(String::as_str).collect(),
                    None => crate::comments::DEFAULT_EXTENSIONS.to_vec(),
                };
                let compactor = match marker {
                    Some(marker) => CommentCompactor::with_marker(marker, extensions),
                    None => CommentCompactor::with_extensions(extensions),
                }
                .map_err(|e| PackError::Config(format!("comments compactor: {e}")))?;
                Ok(Arc::new(compactor))
            }
        }
    }
}

fn require_extensions(kind: &str, extensions: &[String]) -> Result<()> {
    if extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
        return Err(PackError::Config(format!(
            "{kind} compactor needs at least one file extension"
        )));
    }
    Ok(())
}
