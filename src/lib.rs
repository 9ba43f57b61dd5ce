//! Compile a C program, run a static analyzer over it, then run the binary
//! or debug it in batch mode. Running only happens after a clean compile.

pub mod config;
pub mod diagnostics;
mod error;
pub mod helpers;
pub mod orchestrator;
pub mod process;
pub mod sources;
pub mod toolchain;

pub use config::{AnalysisPolicy, BuildConfig};
pub use error::{Error, Result};
pub use orchestrator::{
    ensure_output_directory, BuildReport, BuildState, Execution, ExecutionMode, Orchestrator,
};
pub use process::{ExitState, Invocation, ProcessOutput, ProcessRunner, SystemRunner};
