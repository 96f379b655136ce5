//! The compile pipeline.

use cotton_markup::parse;

use cotton_common::DEFAULT_COTTON_DIR;
use crate::error::CompileError;
use crate::restore::restore;
use crate::shield::shield;
use crate::transform::Transformer;
use crate::unmask::unmask;
use crate::vars::wrap_vars_frame;

/// Substrings that mark a source as needing compilation.
const APPLICABLE_MARKERS: [&str; 2] = ["<c-", "{% cotton_verbatim"];

/// Compiler settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Directory component templates are resolved under, e.g. `cotton` gives
    /// `cotton/card.html` for `<c-card>`.
    pub cotton_dir: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            cotton_dir: DEFAULT_COTTON_DIR.to_string(),
        }
    }
}

/// Compiles cotton templates into host template directives.
///
/// The compiler holds only its options; every call builds its own
/// placeholder list and tree, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct CottonCompiler {
    options: CompilerOptions,
}

impl CottonCompiler {
    /// Creates a compiler with the given options.
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    /// Returns the compiler options.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Returns `true` if `source` contains a cotton tag or a verbatim block.
    pub fn is_applicable(source: &str) -> bool {
        APPLICABLE_MARKERS.iter().any(|marker| source.contains(marker))
    }

    /// Compiles `source`, identified by `template_name`.
    ///
    /// Runs shield, parse, vars frame, transform, serialize, restore and
    /// unmask in that order. Never fails: malformed markup is compiled on a
    /// best-effort basis.
    pub fn process(&self, source: &str, template_name: &str) -> String {
        let shielded = shield(source);

        let doc = parse(&shielded.text);
        let mut doc = wrap_vars_frame(doc);
        Transformer::new(&self.options.cotton_dir).transform(&mut doc, template_name);
        let html = doc.to_html();

        let restored = restore(&html, &shielded.placeholders);
        let compiled = unmask(&restored);
        tracing::debug!(
            template = template_name,
            placeholders = shielded.placeholders.len(),
            bytes = compiled.len(),
            "compiled template"
        );
        compiled
    }

    /// Compiles `source` if it contains cotton syntax.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::NotApplicable`] for plain templates.
    pub fn compile(&self, source: &str, template_name: &str) -> Result<String, CompileError> {
        if !Self::is_applicable(source) {
            return Err(CompileError::NotApplicable {
                name: template_name.to_string(),
            });
        }
        Ok(self.process(source, template_name))
    }
}
