use std::{
    fmt::Display,
    fs::OpenOptions,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use crate::error::{Error, Result};

/// When the static analyzer runs relative to the compile step.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisPolicy {
    #[default]
    Always,
    #[serde(alias = "skip-on-failure")]
    SkipOnCompileFailure,
    Never,
}

impl FromStr for AnalysisPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "always" => Ok(Self::Always),
            "skip-on-failure" | "skip-on-compile-failure" => Ok(Self::SkipOnCompileFailure),
            "never" => Ok(Self::Never),
            _ => Err(Error::Config(format!("unknown analysis policy {:?}", s))),
        }
    }
}

impl Display for AnalysisPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::SkipOnCompileFailure => write!(f, "skip-on-failure"),
            Self::Never => write!(f, "never"),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Literal paths or wildcard patterns.
    pub sources: Vec<String>,
    pub program_name: String,
    pub output_dir: PathBuf,
    pub binary_extension: String,
    pub flags: Vec<String>,
    pub optimize: bool,
    pub debug: bool,
    pub emit_asm: bool,
    pub analysis: AnalysisPolicy,
    pub compiler: String,
    pub analyzer: String,
    pub analyzer_flags: Vec<String>,
    pub standard: String,
    pub debugger: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            sources: vec!["main.c".to_string()],
            program_name: "bytepiece".to_string(),
            output_dir: PathBuf::from("./output"),
            binary_extension: "exe".to_string(),
            flags: [
                "-mavx2",
                "-O2",
                "-ftree-vectorize",
                "-fopt-info-vec",
                "-fopt-info-missed",
                "-Wall",
            ]
            .map(String::from)
            .to_vec(),
            optimize: true,
            debug: false,
            emit_asm: false,
            analysis: AnalysisPolicy::Always,
            compiler: "gcc".to_string(),
            analyzer: "clang".to_string(),
            analyzer_flags: ["--analyze", "--analyzer-output", "text"]
                .map(String::from)
                .to_vec(),
            standard: "c11".to_string(),
            debugger: "gdb".to_string(),
        }
    }
}

impl BuildConfig {
    /// Read a JSON config file. Fields it leaves out keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|e| Error::Config(format!("{:?}: {}", path, e)))?;
        let config: Self = serde_json::from_reader(file)
            .map_err(|e| Error::Config(format!("{:?}: {}", path, e)))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(Error::Config("no source files given".to_string()));
        }
        if self.program_name.trim().is_empty() {
            return Err(Error::Config("program name is empty".to_string()));
        }
        if self.compiler.trim().is_empty() {
            return Err(Error::Config("compiler is empty".to_string()));
        }
        Ok(())
    }

    /// The flag list as handed to the compiler, after the optimization and
    /// debug toggles are applied. Configured order is kept.
    pub fn effective_flags(&self) -> Vec<String> {
        let mut flags: Vec<String> = if self.optimize {
            self.flags.clone()
        } else {
            self.flags
                .iter()
                .filter(|flag| !is_optimization_flag(flag))
                .cloned()
                .collect()
        };
        if !self.optimize {
            flags.push("-O0".to_string());
        }
        if self.debug && !flags.iter().any(|flag| flag == "-g") {
            flags.push("-g".to_string());
        }
        flags
    }

    pub fn binary_path(&self) -> PathBuf {
        self.artifact(&self.binary_extension)
    }

    pub fn asm_path(&self) -> PathBuf {
        self.artifact("asm")
    }

    fn artifact(&self, extension: &str) -> PathBuf {
        if extension.is_empty() {
            return self.output_dir.join(&self.program_name);
        }
        self.output_dir
            .join(format!("{}.{}", self.program_name, extension))
    }
}

fn is_optimization_flag(flag: &str) -> bool {
    flag.starts_with("-O")
        || flag == "-ftree-vectorize"
        || flag.starts_with("-fopt-info")
}
