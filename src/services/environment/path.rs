//! Normalized resource paths inside an account's storage.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("path escapes its root: {0}")]
    ParentSegment(String),
    #[error("path contains a NUL byte")]
    Nul,
}

/// An absolute, normalized path such as `/photos/2015`.
///
/// Empty and `.` segments are dropped; `..` is rejected rather than resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.contains('\0') {
            return Err(PathError::Nul);
        }

        let mut segments = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(PathError::ParentSegment(raw.to_string())),
                s => segments.push(s.to_string()),
            }
        }
        Ok(Self { segments })
    }

    /// Segment-wise prefix test: `/a/bc` is not inside `/a/b`.
    pub fn starts_with(&self, base: &ResourcePath) -> bool {
        self.segments.starts_with(&base.segments)
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}
