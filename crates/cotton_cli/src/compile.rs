//! `cotton compile`: compile a single template file.

use std::path::Path;

use cotton_compiler::{CompileError, CompilerOptions, CottonCompiler};
use tracing::info;

use crate::project::load_project;
use crate::{CompileArgs, GlobalArgs};

/// Runs the `cotton compile` command.
///
/// A file without cotton syntax is emitted unchanged.
pub fn run(args: &CompileArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cotton_dir = match args.dir {
        Some(ref dir) => dir.clone(),
        None => load_project(global)?.1.compiler.dir,
    };
    let source = std::fs::read_to_string(&args.file)?;
    let name = args.name.as_deref().unwrap_or(&args.file);

    let compiled = compile_source(&source, name, cotton_dir);

    match args.output {
        Some(ref output) => {
            let path = Path::new(output);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, compiled)?;
            info!(template = name, output = %path.display(), "compiled");
        }
        None => print!("{compiled}"),
    }
    Ok(0)
}

/// Compiles `source`, passing plain templates through.
pub fn compile_source(source: &str, name: &str, cotton_dir: String) -> String {
    let compiler = CottonCompiler::new(CompilerOptions { cotton_dir });
    match compiler.compile(source, name) {
        Ok(compiled) => compiled,
        Err(CompileError::NotApplicable { .. }) => source.to_string(),
    }
}
