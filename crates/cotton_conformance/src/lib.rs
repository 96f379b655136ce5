//! Conformance test helpers for cotton.
//!
//! Wraps the compiler the way a template engine drives it so integration
//! tests can assert on compiled text directly.

#![warn(missing_docs)]

use cotton_compiler::restore::restore;
use cotton_compiler::shield::shield;
use cotton_compiler::{CompileError, CompilerOptions, CottonCompiler};

/// Template identity used when a test does not name one.
pub const TEST_TEMPLATE: &str = "test.html";

/// Compiles `source` as [`TEST_TEMPLATE`], returning `None` for plain
/// templates.
pub fn get_compiled(source: &str) -> Option<String> {
    get_compiled_named(source, TEST_TEMPLATE)
}

/// Compiles `source` under the given template identity.
pub fn get_compiled_named(source: &str, name: &str) -> Option<String> {
    match CottonCompiler::default().compile(source, name) {
        Ok(compiled) => Some(compiled),
        Err(CompileError::NotApplicable { .. }) => None,
    }
}

/// Compiles `source` with component paths rooted at `cotton_dir`.
pub fn compile_with_dir(source: &str, cotton_dir: &str) -> String {
    let compiler = CottonCompiler::new(CompilerOptions {
        cotton_dir: cotton_dir.to_string(),
    });
    compiler.process(source, TEST_TEMPLATE)
}

/// Compiles `source` the way the loader serves it: plain templates come
/// back unchanged.
pub fn render_source(source: &str) -> String {
    get_compiled(source).unwrap_or_else(|| source.to_string())
}

/// Shields and immediately restores `source`.
pub fn shield_roundtrip(source: &str) -> String {
    let shielded = shield(source);
    restore(&shielded.text, &shielded.placeholders)
}
