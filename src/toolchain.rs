//! Command lines for the external collaborators: the compiler, the static
//! analyzer and the batch-mode debugger.

use std::path::{Path, PathBuf};

use crate::{config::BuildConfig, process::Invocation};

fn display(paths: &[PathBuf]) -> impl Iterator<Item = String> + '_ {
    paths.iter().map(|p| p.to_string_lossy().into_owned())
}

#[derive(Debug, Clone)]
pub struct Toolchain {
    pub compiler: String,
    pub analyzer: String,
    pub analyzer_flags: Vec<String>,
    pub standard: String,
    pub debugger: String,
}

impl Toolchain {
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            compiler: config.compiler.clone(),
            analyzer: config.analyzer.clone(),
            analyzer_flags: config.analyzer_flags.clone(),
            standard: config.standard.clone(),
            debugger: config.debugger.clone(),
        }
    }

    /// `gcc <sources> <flags> -o<output>`
    pub fn compile(&self, sources: &[PathBuf], flags: &[String], output: &Path) -> Invocation {
        Invocation::new(&self.compiler)
            .args(display(sources))
            .args(flags.iter().cloned())
            .arg(format!("-o{}", output.display()))
    }

    /// `gcc <sources> -S <flags> -o<listing>`
    pub fn assemble(&self, sources: &[PathBuf], flags: &[String], listing: &Path) -> Invocation {
        Invocation::new(&self.compiler)
            .args(display(sources))
            .arg("-S")
            .args(flags.iter().cloned())
            .arg(format!("-o{}", listing.display()))
    }

    /// `clang --analyze ... -std=<standard> <flags> <sources>`
    ///
    /// Only warning and include options from the compile flags are passed
    /// along; code generation options mean nothing to the analyzer.
    pub fn analyze(&self, sources: &[PathBuf], flags: &[String]) -> Invocation {
        let passthrough = flags
            .iter()
            .filter(|f| f.starts_with("-W") || f.starts_with("-I") || f.starts_with("-D"))
            .cloned();
        Invocation::new(&self.analyzer)
            .args(self.analyzer_flags.iter().cloned())
            .arg(format!("-std={}", self.standard))
            .args(passthrough)
            .args(display(sources))
    }

    /// `gdb -batch -ex run -ex bt --args <binary>`
    pub fn debug(&self, binary: &Path) -> Invocation {
        Invocation::new(&self.debugger)
            .args(["-batch", "-ex", "run", "-ex", "bt", "--args"])
            .arg(binary.to_string_lossy())
    }

    /// The freshly built binary itself.
    pub fn direct(binary: &Path) -> Invocation {
        Invocation::new(runnable(binary))
    }
}

// A bare relative name would be looked up in PATH instead of the cwd.
fn runnable(binary: &Path) -> String {
    if binary.is_relative() && binary.components().count() == 1 {
        return format!("./{}", binary.display());
    }
    binary.to_string_lossy().into_owned()
}
