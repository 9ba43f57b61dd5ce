use std::{path::PathBuf, process::exit};

use buildrun::{
    helpers::{self, app_error, EXIT_COMPILE_FAILED},
    AnalysisPolicy, BuildConfig, BuildState, Orchestrator, SystemRunner,
};
use clap::Parser;
use log::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "buildrun", version, about = "Compile a C program, analyze it, then run or debug it")]
struct Cli {
    /// Source files or wildcard patterns such as `src/*.c`
    sources: Vec<String>,

    /// JSON file with build settings; command line options win over it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Program name, used for the binary and listing file names
    #[arg(short, long)]
    name: Option<String>,

    /// Directory receiving the build artifacts
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Compiler flag, repeatable; replaces the configured flag list
    #[arg(long = "flag", value_name = "FLAG", allow_hyphen_values = true)]
    flag: Vec<String>,

    /// Extra flags as one quoted string, appended to the flag list
    #[arg(long, value_name = "STRING", allow_hyphen_values = true)]
    flags: Option<String>,

    /// Build with -O0 and without the vectorizer options
    #[arg(long)]
    no_optimize: bool,

    /// Run the program under the debugger in batch mode
    #[arg(short = 'g', long)]
    debug: bool,

    /// Also write an assembly listing
    #[arg(long)]
    emit_asm: bool,

    /// When to run the static analyzer: always, skip-on-failure or never
    #[arg(long, value_name = "POLICY", value_parser = parse_policy)]
    analysis: Option<AnalysisPolicy>,

    #[arg(long, value_name = "PROGRAM")]
    compiler: Option<String>,

    #[arg(long, value_name = "PROGRAM")]
    analyzer: Option<String>,

    #[arg(long, value_name = "PROGRAM")]
    debugger: Option<String>,

    /// More log output, repeatable
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_policy(s: &str) -> Result<AnalysisPolicy, String> {
    s.parse().map_err(|e: buildrun::Error| e.to_string())
}

impl Cli {
    fn into_config(self) -> buildrun::Result<BuildConfig> {
        let mut config = match &self.config {
            Some(path) => BuildConfig::load(path)?,
            None => BuildConfig::default(),
        };
        if !self.sources.is_empty() {
            config.sources = self.sources;
        }
        if let Some(name) = self.name {
            config.program_name = name;
        }
        if let Some(out_dir) = self.out_dir {
            config.output_dir = out_dir;
        }
        if !self.flag.is_empty() {
            config.flags = self.flag;
        }
        if let Some(flags) = self.flags {
            config.flags.extend(helpers::split_flags(&flags));
        }
        if self.no_optimize {
            config.optimize = false;
        }
        if self.debug {
            config.debug = true;
        }
        if self.emit_asm {
            config.emit_asm = true;
        }
        if let Some(policy) = self.analysis {
            config.analysis = policy;
        }
        if let Some(compiler) = self.compiler {
            config.compiler = compiler;
        }
        if let Some(analyzer) = self.analyzer {
            config.analyzer = analyzer;
        }
        if let Some(debugger) = self.debugger {
            config.debugger = debugger;
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => app_error(&e.to_string()),
    };
    debug!("Configuration: {:?}", config);

    let mut orchestrator = Orchestrator::new(config, SystemRunner);
    let report = match orchestrator.run() {
        Ok(report) => report,
        Err(e) => app_error(&e.to_string()),
    };

    info!("Build {}", report.state);
    if let Some(status) = report.execution.and_then(|execution| execution.status) {
        info!("{:?} exited with {}", report.binary, status);
    }
    if report.state == BuildState::Failed {
        exit(EXIT_COMPILE_FAILED);
    }
}
