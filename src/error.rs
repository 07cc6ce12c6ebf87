//! Error types for layout and clade resolution.

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors that can occur when laying out a tree or resolving clades by name.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The tree has no nodes (or no root), so there is nothing to lay out.
    #[error("Tree is empty - no root to lay out")]
    EmptyTree,

    /// Requested leaf names without any match in the tree.
    #[error("Not found in tree: {}", .names.join(", "))]
    NotFound {
        /// Names without a match, sorted
        names: Vec<String>,
    },

    /// A requested name matches several leaves, but a unique target is required.
    #[error("Name '{name}' is ambiguous - matches {count} leaves")]
    AmbiguousName {
        /// The duplicated name
        name: String,
        /// Number of leaves carrying it
        count: usize,
    },

    /// Clade query without any names.
    #[error("Empty clade query")]
    EmptyQuery,
}

impl LayoutError {
    /// Create a not-found error.
    pub fn not_found<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self::NotFound { names }
    }

    /// Create an ambiguous-name error.
    pub fn ambiguous(name: impl Into<String>, count: usize) -> Self {
        Self::AmbiguousName {
            name: name.into(),
            count,
        }
    }
}
