//! The build/diagnose/run pipeline.
//!
//! One run walks: sources → output directory → compile → listing →
//! analysis → run or debug. The last step is gated on the compiler's exit
//! state and nothing else.

use std::{
    fmt::Display,
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{
    config::{AnalysisPolicy, BuildConfig},
    diagnostics::Summary,
    error::{Error, Result},
    helpers,
    process::{ExitState, ProcessOutput, ProcessRunner},
    sources,
    toolchain::Toolchain,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Compiled,
    Failed,
}

impl Display for BuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compiled => write!(f, "Compiled"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationResult {
    pub status: ExitState,
    pub stdout: String,
    pub stderr: String,
    pub summary: Summary,
}

impl CompilationResult {
    pub fn succeeded(&self) -> bool {
        self.status.success()
    }

    pub fn state(&self) -> BuildState {
        if self.succeeded() {
            BuildState::Compiled
        } else {
            BuildState::Failed
        }
    }
}

impl From<ProcessOutput> for CompilationResult {
    fn from(output: ProcessOutput) -> Self {
        let summary = Summary::scan(&output.stderr);
        Self {
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
            summary,
        }
    }
}

/// What the analyzer said. `status` is `None` when it could not be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub status: Option<ExitState>,
    pub stderr: String,
    pub summary: Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Direct,
    Debugger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    pub mode: ExecutionMode,
    /// `None` when the program or debugger could not be started.
    pub status: Option<ExitState>,
}

#[derive(Debug, Clone)]
pub struct BuildReport {
    pub state: BuildState,
    pub sources: Vec<PathBuf>,
    pub binary: PathBuf,
    pub compilation: CompilationResult,
    pub listing: Option<ProcessOutput>,
    pub analysis: Option<AnalysisResult>,
    pub execution: Option<Execution>,
}

/// Create `path` and its parents unless it is already a directory.
pub fn ensure_output_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(Error::Filesystem {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "exists and is not a directory"),
        });
    }
    debug!("Creating output directory {:?}", path);
    fs::create_dir_all(path).map_err(|source| Error::Filesystem {
        path: path.to_path_buf(),
        source,
    })
}

pub struct Orchestrator<R: ProcessRunner> {
    config: BuildConfig,
    toolchain: Toolchain,
    runner: R,
}

impl<R: ProcessRunner> Orchestrator<R> {
    pub fn new(config: BuildConfig, runner: R) -> Self {
        let toolchain = Toolchain::from_config(&config);
        Self {
            config,
            toolchain,
            runner,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// A nonzero compiler exit is reported through the result, only a
    /// compiler that cannot be started is an error.
    pub fn compile(
        &mut self,
        sources: &[PathBuf],
        flags: &[String],
        output_path: &Path,
    ) -> Result<CompilationResult> {
        let invocation = self.toolchain.compile(sources, flags, output_path);
        info!("Compiling {} source file(s) into {:?}", sources.len(), output_path);
        let output = self
            .runner
            .capture(&invocation)
            .map_err(|source| Error::Spawn {
                program: invocation.program.clone(),
                source,
            })?;
        let result = CompilationResult::from(output);
        info!("{}: {} ({})", self.toolchain.compiler, result.status, result.summary);
        Ok(result)
    }

    /// Write an assembly listing next to the binary. Its outcome is only
    /// logged.
    pub fn assemble(&mut self, sources: &[PathBuf], flags: &[String]) -> Option<ProcessOutput> {
        if sources.len() != 1 {
            warn!("Skipping assembly listing, it needs exactly one source file");
            return None;
        }
        let listing = self.config.asm_path();
        let invocation = self.toolchain.assemble(sources, flags, &listing);
        info!("Writing assembly listing {:?}", listing);
        match self.runner.capture(&invocation) {
            Ok(output) => {
                if !output.status.success() {
                    warn!("Assembly listing failed with {}", output.status);
                }
                Some(output)
            }
            Err(e) => {
                warn!("Failed to start {}: {}", invocation.program, e);
                None
            }
        }
    }

    /// Never fails: whatever the analyzer does is reported and dropped.
    pub fn analyze(&mut self, sources: &[PathBuf], flags: &[String]) -> AnalysisResult {
        let invocation = self.toolchain.analyze(sources, flags);
        info!("Analyzing {} source file(s)", sources.len());
        match self.runner.capture(&invocation) {
            Ok(output) => {
                let summary = Summary::scan(&output.stderr);
                info!("{}: {} ({})", self.toolchain.analyzer, output.status, summary);
                AnalysisResult {
                    status: Some(output.status),
                    stderr: output.stderr,
                    summary,
                }
            }
            Err(e) => {
                warn!("Failed to start {}: {}", invocation.program, e);
                AnalysisResult {
                    status: None,
                    stderr: String::new(),
                    summary: Summary::default(),
                }
            }
        }
    }

    pub fn execute_or_debug(&mut self, binary_path: &Path, debug: bool) -> Execution {
        let (mode, invocation) = if debug {
            (ExecutionMode::Debugger, self.toolchain.debug(binary_path))
        } else {
            (ExecutionMode::Direct, Toolchain::direct(binary_path))
        };
        info!("Running {:?} ({:?})", binary_path, mode);
        let status = match self.runner.inherit(&invocation) {
            Ok(status) => {
                info!("{} finished with {}", invocation.program, status);
                Some(status)
            }
            Err(e) => {
                warn!("Failed to start {}: {}", invocation.program, e);
                None
            }
        };
        Execution { mode, status }
    }

    pub fn run(&mut self) -> Result<BuildReport> {
        self.config.validate()?;
        let sources = sources::resolve(&self.config.sources)?;
        ensure_output_directory(&self.config.output_dir)?;

        let flags = self.config.effective_flags();
        let binary = self.config.binary_path();

        let compilation = self.compile(&sources, &flags, &binary)?;
        helpers::print_captured("stderr", &compilation.stderr);

        let listing = if self.config.emit_asm {
            self.assemble(&sources, &flags)
        } else {
            None
        };

        let state = compilation.state();
        let analysis = match (self.config.analysis, state) {
            (AnalysisPolicy::Never, _) => None,
            (AnalysisPolicy::SkipOnCompileFailure, BuildState::Failed) => {
                info!("Skipping analysis after failed compile");
                None
            }
            _ => Some(self.analyze(&sources, &flags)),
        };
        if let Some(analysis) = &analysis {
            helpers::print_captured("analyzer", &analysis.stderr);
        }

        let execution = match state {
            BuildState::Compiled => Some(self.execute_or_debug(&binary, self.config.debug)),
            BuildState::Failed => {
                helpers::compile_error(&compilation.status);
                None
            }
        };

        Ok(BuildReport {
            state,
            sources,
            binary,
            compilation,
            listing,
            analysis,
            execution,
        })
    }
}
