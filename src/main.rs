//! godsl CLI - Go with exceptions, transpiled to plain Go

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use godsl::errors::{GodslError, print_parse_errors};
use godsl::project::{self, DEFAULT_JOBS, GenerateOptions};
use godsl::{CodeGenerator, GoGenerator, transpile_file};

#[derive(Parser)]
#[command(name = "godsl")]
#[command(version)]
#[command(about = "Transpile Go with try/catch/throw/finally into plain Go", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transpile every .godsl file under a project directory
    Generate {
        /// Project root
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,

        /// Output directory (defaults to <PATH>/build)
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Number of files transpiled at once
        #[arg(short, long, default_value_t = DEFAULT_JOBS)]
        jobs: usize,
    },

    /// Transpile a single file
    Transpile {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to the input with a .go extension)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Check a file for syntax errors without generating code
    Check {
        /// Input file to check
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Parse a file and print the AST
    Parse {
        /// Input file to parse
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            path,
            out_dir,
            jobs,
        } => {
            let mut options = GenerateOptions::new(path).with_jobs(jobs);
            if let Some(out_dir) = out_dir {
                options = options.with_out_dir(out_dir);
            }
            run_generate(&options)
        }
        Commands::Transpile { input, output } => run_transpile(&input, output),
        Commands::Check { input } => run_check(&input),
        Commands::Parse { input } => run_parse(&input),
        Commands::Version => {
            println!("godsl {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
    }
}

fn read_source(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            None
        }
    }
}

/// Print an error, with source context when it carries parse diagnostics
fn print_error(err: &GodslError, path: &Path) {
    let errors = err.parse_errors();
    if errors.is_empty() {
        eprintln!("Error: {}", err);
        return;
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            if let Err(e) = print_parse_errors(&source, &path.display().to_string(), errors) {
                eprintln!("Error: {}", err);
                eprintln!("Error printing diagnostics: {}", e);
            }
        }
        Err(_) => eprintln!("Error: {}", err),
    }
}

fn run_generate(options: &GenerateOptions) -> ExitCode {
    let tasks = match project::collect_sources(&options.root, &options.out_dir) {
        Ok(tasks) => tasks,
        Err(e) => {
            eprintln!("Error collecting files: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if tasks.is_empty() {
        println!("No .{} files found in the project.", project::SOURCE_EXTENSION);
        return ExitCode::SUCCESS;
    }

    println!(
        "Found {} .{} files to transpile",
        tasks.len(),
        project::SOURCE_EXTENSION
    );

    let reports = project::transpile_all(&tasks, options.jobs);
    let mut failed = 0;
    for report in &reports {
        match &report.result {
            Ok(()) => println!(
                "✓ {} -> {}",
                report.task.source.display(),
                report.task.target.display()
            ),
            Err(err) => {
                failed += 1;
                print_error(err, &report.task.source);
            }
        }
    }

    if failed > 0 {
        eprintln!("{} of {} files failed to transpile", failed, reports.len());
        eprintln!(
            "Removing {} because of errors...",
            options.out_dir.display()
        );
        if let Err(e) = project::clean_build_dir(&options.out_dir) {
            eprintln!("Error: {}", e);
        }
        return ExitCode::FAILURE;
    }

    println!("Transpilation completed successfully!");
    ExitCode::SUCCESS
}

fn run_transpile(input: &Path, output: Option<PathBuf>) -> ExitCode {
    let Some(source) = read_source(input) else {
        return ExitCode::FAILURE;
    };

    let code = match transpile_file(&source) {
        Ok(code) => code,
        Err(err) => {
            print_error(&err, input);
            return ExitCode::FAILURE;
        }
    };

    let output_path =
        output.unwrap_or_else(|| input.with_extension(GoGenerator::new().file_extension()));

    match fs::write(&output_path, &code) {
        Ok(()) => {
            println!(
                "✓ {} -> {}",
                input.display(),
                output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error writing '{}': {}", output_path.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn run_check(input: &Path) -> ExitCode {
    let Some(source) = read_source(input) else {
        return ExitCode::FAILURE;
    };

    match godsl::Parser::new(&source).parse() {
        Ok(program) => {
            println!(
                "OK: {} top-level statements parsed successfully",
                program.statements.len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            print_error(&err, input);
            ExitCode::FAILURE
        }
    }
}

fn run_parse(input: &Path) -> ExitCode {
    let Some(source) = read_source(input) else {
        return ExitCode::FAILURE;
    };

    match godsl::Parser::new(&source).parse() {
        Ok(program) => {
            print!("{}", program);
            ExitCode::SUCCESS
        }
        Err(err) => {
            print_error(&err, input);
            ExitCode::FAILURE
        }
    }
}
