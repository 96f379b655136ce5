//! Error type for the compile entry point.

/// Reasons a source is not compiled.
///
/// Markup problems are never errors: the parser is tolerant and always
/// produces a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The source holds no cotton tags and no verbatim block, so it is a
    /// plain template and should be used as is.
    #[error("template {name} contains no cotton syntax")]
    NotApplicable {
        /// The template identity.
        name: String,
    },
}
