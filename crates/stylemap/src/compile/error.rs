//! Compilation errors.

use super::key::NestingState;

/// Broad category of a [`CompileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A block is empty, or is not a block at all.
    Structure,
    /// A key follows `@variants` in its block.
    Order,
    /// A key appears in a block kind that does not allow it.
    Scope,
    /// A key has no recognized shape.
    Syntax,
}

impl ErrorKind {
    /// Returns the category name used in messages, e.g. `ScopeError`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Structure => "StructureError",
            ErrorKind::Order => "OrderError",
            ErrorKind::Scope => "ScopeError",
            ErrorKind::Syntax => "SyntaxError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a description fails to compile.
///
/// Every variant is fatal: compilation stops at the first one found, in
/// authoring order. `path` names the offending block as the chain of keys
/// leading to it, e.g. `button > @media print > :hover`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A stylesheet, class block, sub-block or variant map has no keys.
    #[error("empty block at {path}: blocks need at least one key")]
    EmptyBlock { path: String },

    /// A scalar or sequence was found where a block was expected.
    #[error("expected a block at {path}, found {found}")]
    NotABlock { path: String, found: &'static str },

    /// A key follows `@variants` in the same block.
    #[error("@variants must be the last key of {path}, but is followed by {key}")]
    VariantsNotLast { path: String, key: String },

    /// `@variants` appears below the top level of a class block.
    #[error("@variants is only allowed at the top level of a class block, found in {state} block {path}")]
    VariantsNotTopLevel { path: String, state: NestingState },

    /// A pseudo-selector appears inside another pseudo-selector.
    #[error("pseudo-selector {key} cannot be nested inside pseudo-selector block {path}")]
    PseudoNested { path: String, key: String },

    /// A media query appears inside a media query or pseudo-selector.
    #[error("media query {key} is only allowed at the top level or in variants, found in {state} block {path}")]
    MediaInvalidScope {
        path: String,
        key: String,
        state: NestingState,
    },

    /// A key matches none of the recognized shapes.
    #[error("invalid key {key} in {path}")]
    InvalidKey { path: String, key: String },
}

impl CompileError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::EmptyBlock { .. } | CompileError::NotABlock { .. } => {
                ErrorKind::Structure
            }
            CompileError::VariantsNotLast { .. } => ErrorKind::Order,
            CompileError::VariantsNotTopLevel { .. }
            | CompileError::PseudoNested { .. }
            | CompileError::MediaInvalidScope { .. } => ErrorKind::Scope,
            CompileError::InvalidKey { .. } => ErrorKind::Syntax,
        }
    }

    /// A stable short code for this error, e.g. `empty-block`.
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::EmptyBlock { .. } => "empty-block",
            CompileError::NotABlock { .. } => "not-a-block",
            CompileError::VariantsNotLast { .. } => "variants-not-last",
            CompileError::VariantsNotTopLevel { .. } => "variants-not-top-level",
            CompileError::PseudoNested { .. } => "pseudo-nested",
            CompileError::MediaInvalidScope { .. } => "media-invalid-scope",
            CompileError::InvalidKey { .. } => "invalid-key",
        }
    }

    /// The path of the block where the error was found.
    pub fn path(&self) -> &str {
        match self {
            CompileError::EmptyBlock { path }
            | CompileError::NotABlock { path, .. }
            | CompileError::VariantsNotLast { path, .. }
            | CompileError::VariantsNotTopLevel { path, .. }
            | CompileError::PseudoNested { path, .. }
            | CompileError::MediaInvalidScope { path, .. }
            | CompileError::InvalidKey { path, .. } => path,
        }
    }
}
