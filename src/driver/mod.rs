use std::{
    fmt,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use anyhow::Context;
use ariadne::{Report, Source};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{
    ast::Program,
    check::{self, FileSpan, OwnershipError, check_function},
    compile_unit_info::CompileUnitInfo,
    ir::{
        ProgramBody,
        lowering::{LoweringError, lower_function},
    },
    parser::{self, ProgramSource, error::parse_error_to_report},
};
use config::Config;

pub mod config;

#[derive(Parser, Debug)]
#[command(author, version, about = "The cerberus ownership checker", long_about = None)]
pub struct CompilerArgs {
    #[command(subcommand)]
    command: Command,

    /// Print debug logs, RUST_LOG takes precedence.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a single source file.
    Check {
        /// The input file.
        input: PathBuf,

        /// Print the parsed AST.
        #[arg(long, default_value_t = false)]
        ast: bool,

        /// Print the lowered IR.
        #[arg(long, default_value_t = false)]
        ir: bool,

        /// Write the verified IR to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check the package described by a Cerberus.toml manifest and emit its IR.
    Build {
        /// Path to the manifest.
        #[arg(long, default_value = Config::FILE_NAME)]
        manifest_path: PathBuf,

        /// The manifest profile to use, "dev" by default.
        #[arg(short, long)]
        profile: Option<String>,
    },
}

/// A failure found while checking a program.
#[derive(Debug, Clone)]
pub enum Diagnostic {
    Parse(parser::error::Error),
    Lowering(LoweringError),
    Ownership(OwnershipError),
}

impl Diagnostic {
    pub fn to_report(&self, path: &str) -> Report<'static, FileSpan> {
        match self {
            Diagnostic::Parse(error) => parse_error_to_report(path, error),
            Diagnostic::Lowering(error) => check::lowering_error_to_report(path, error),
            Diagnostic::Ownership(error) => check::ownership_error_to_report(path, error),
        }
    }

    pub fn is_internal(&self) -> bool {
        match self {
            Diagnostic::Parse(_) => false,
            Diagnostic::Lowering(error) => error.is_internal(),
            Diagnostic::Ownership(error) => error.is_internal(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Parse(error) => write!(f, "{error}"),
            Diagnostic::Lowering(error) => write!(f, "{error}"),
            Diagnostic::Ownership(error) => write!(f, "{error}"),
        }
    }
}

/// The result of checking one source file.
#[derive(Debug, Default)]
pub struct CheckOutcome {
    pub ast: Option<Program>,
    /// Every function that was lowered, verified or not.
    pub lowered: ProgramBody,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckOutcome {
    pub fn is_ok(&self) -> bool {
        self.ast.is_some() && self.diagnostics.is_empty()
    }

    /// The verified IR, only available when every function passed.
    pub fn verified(&self) -> Option<&ProgramBody> {
        self.is_ok().then_some(&self.lowered)
    }
}

/// Parses, lowers and verifies the source.
///
/// Functions are processed one at a time and independently, so a failing function
/// doesn't prevent the others from being checked.
#[tracing::instrument(level = "debug", skip_all, fields(path = %source.path.display()))]
pub fn check_source(source: &ProgramSource) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();

    let program = match parser::parse_ast(source) {
        Ok(program) => program,
        Err(error) => {
            outcome.diagnostics.push(Diagnostic::Parse(error));
            return outcome;
        }
    };

    for func in &program.functions {
        let body = match lower_function(func) {
            Ok(body) => body,
            Err(error) => {
                debug!("lowering of {:?} failed: {}", func.name.name, error);
                outcome.diagnostics.push(Diagnostic::Lowering(error));
                continue;
            }
        };

        if let Err(error) = check_function(&body) {
            debug!("ownership check of {:?} failed: {}", body.name, error);
            outcome.diagnostics.push(Diagnostic::Ownership(error));
        }
        outcome.lowered.functions.push(body);
    }

    outcome.ast = Some(program);
    outcome
}

/// Checks the compile unit, printing diagnostics and writing the IR if requested.
///
/// Returns whether the unit passed.
pub fn check_unit(info: &CompileUnitInfo) -> anyhow::Result<bool> {
    let input = std::fs::read_to_string(&info.input)
        .with_context(|| format!("failed to read {}", info.input.display()))?;
    debug!("source code:\n{}", input);

    let source = ProgramSource::new(input, &info.input);
    let outcome = check_source(&source);

    if info.emit_ast {
        if let Some(ast) = &outcome.ast {
            println!("{ast:#?}");
        }
    }

    if info.emit_ir {
        print!("{}", outcome.lowered);
    }

    let path = info.input.display().to_string();
    for diagnostic in &outcome.diagnostics {
        diagnostic
            .to_report(&path)
            .eprint((path.clone(), Source::from(source.input.as_str())))
            .context("failed to print diagnostic")?;
    }

    let Some(ir) = outcome.verified() else {
        eprintln!(
            "{} {} ({} error(s))",
            "Failed".red().bold(),
            path,
            outcome.diagnostics.len()
        );
        return Ok(false);
    };

    if let Some(output_file) = &info.output_file {
        write_ir(output_file, ir)?;
    }

    println!("{} {} (ownership ok)", "Checked".green().bold(), path);
    Ok(true)
}

pub fn write_ir(output_file: &Path, ir: &ProgramBody) -> anyhow::Result<()> {
    if let Some(parent) = output_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(output_file, ir.to_string())
        .with_context(|| format!("failed to write {}", output_file.display()))?;
    debug!("wrote IR to {}", output_file.display());
    Ok(())
}

/// Builds the compile unit described by the manifest.
pub fn unit_from_manifest(
    manifest_path: &Path,
    profile: Option<&str>,
) -> anyhow::Result<CompileUnitInfo> {
    let config = Config::load(manifest_path)?;
    let profile = config.get_profile(profile)?;
    let root = manifest_path.parent().unwrap_or_else(|| Path::new("."));

    let output_file = root
        .join(&config.package.target_dir)
        .join(&config.package.name)
        .with_extension(CompileUnitInfo::IR_EXTENSION);

    Ok(CompileUnitInfo {
        input: root.join(&config.package.entry),
        output_file: Some(output_file),
        emit_ast: profile.emit_ast,
        emit_ir: profile.emit_ir,
    })
}

pub fn main() -> anyhow::Result<ExitCode> {
    let start_time = Instant::now();
    let args = CompilerArgs::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let info = match args.command {
        Command::Check {
            input,
            ast,
            ir,
            output,
        } => CompileUnitInfo {
            output_file: output,
            emit_ast: ast,
            emit_ir: ir,
            ..CompileUnitInfo::new(input)
        },
        Command::Build {
            manifest_path,
            profile,
        } => unit_from_manifest(&manifest_path, profile.as_deref())?,
    };
    debug!("Checking with compile unit: {:#?}", info);

    let passed = check_unit(&info)?;

    let elapsed = start_time.elapsed();
    debug!("Done in {:?}", elapsed);

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
