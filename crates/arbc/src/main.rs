//! Arroba compiler front end
//!
//! Usage: arbc [OPTIONS] <input>

use anyhow::Context;
use arroba_compiler::common::DiagnosticReporter;
use arroba_compiler::{CompileError, CompileResult, CompilerConfig, compile};
use clap::{ArgAction, Parser as ClapParser};
use log::LevelFilter;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::{fs, process};

#[derive(ClapParser, Debug)]
#[command(name = "arbc")]
#[command(author = "Arroba Compiler Team")]
#[command(version)]
#[command(about = "Lexer, parser and semantic checker for the Arroba language", long_about = None)]
struct Args {
    /// Source file, or `-` to read standard input
    #[arg(required = true)]
    input: PathBuf,

    /// Print the token stream
    #[arg(long)]
    dump_tokens: bool,

    /// Print the syntax tree
    #[arg(long)]
    dump_tree: bool,

    /// Print the symbol table
    #[arg(long)]
    dump_symbols: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_logging(args: &Args) {
    let level = if args.quiet {
        LevelFilter::Error
    } else {
        match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

/// Returns the display name and the text
fn read_source(input: &Path) -> CompileResult<(String, String)> {
    if input.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| CompileError::input("<stdin>", e))?;
        return Ok(("<stdin>".to_string(), source));
    }
    let name = input.display().to_string();
    let source = fs::read_to_string(input).map_err(|e| CompileError::input(name.clone(), e))?;
    Ok((name, source))
}

fn run(args: &Args) -> anyhow::Result<()> {
    let (filename, source) = read_source(&args.input)?;
    log::info!("compiling {filename}");

    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(&filename, &source);

    let config = CompilerConfig {
        dump_tokens: args.dump_tokens,
        dump_tree: args.dump_tree,
        dump_symbols: args.dump_symbols,
    };
    let compilation = compile(&source);
    compilation
        .write_dumps(&config, &mut io::stdout().lock())
        .context("cannot write dumps")?;

    if compilation.has_errors() {
        reporter.report_all(file_id, &compilation.diagnostics);
        return Err(CompileError::failed(compilation.diagnostics.len()).into());
    }

    log::info!("{filename}: no errors");
    Ok(())
}
