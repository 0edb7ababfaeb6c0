//! Lumin - pseudocode to Python translator
//!
//! This is the command-line interface for the Lumin translator.

use clap::Parser;
use log::{error, info};
use std::fs;
use std::path::PathBuf;
use std::process;

use lumin::lexer::{lex, TokenKind};
use lumin::parser::Options;

/// Lumin - translate pseudocode to Python
#[derive(Parser, Debug)]
#[command(name = "lumin")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input pseudocode source file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file (default: input name with .py extension)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Only run lexer and print tokens (for debugging)
    #[arg(long)]
    tokens: bool,

    /// Print the translation instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Spaces per indentation level in the output
    #[arg(long, value_name = "N", default_value_t = 4)]
    indent_width: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Read source file
    let source = match fs::read_to_string(&args.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    if args.verbose {
        info!("Translating: {}", args.input.display());
        info!("Source length: {} bytes", source.len());
    }

    if args.tokens {
        print_tokens(&args, &source);
        return;
    }

    let options = Options {
        indent_width: args.indent_width,
    };
    let python = match lumin::translate_with(&source, &options) {
        Ok(python) => python,
        Err(diagnostic) => {
            error!("{}: {}", args.input.display(), diagnostic);
            eprintln!("{}: {}", args.input.display(), diagnostic);
            process::exit(1);
        }
    };

    if args.stdout {
        print!("{}", python);
        return;
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("py"));
    if let Err(e) = fs::write(&output, python) {
        eprintln!("Error writing '{}': {}", output.display(), e);
        process::exit(1);
    }
    if args.verbose {
        info!("Wrote {}", output.display());
    }
}

/// Prints the token stream, one token per line.
fn print_tokens(args: &Args, source: &str) {
    let tokens = match lex(source) {
        Ok(tokens) => tokens,
        Err(diagnostic) => {
            error!("{}: {}", args.input.display(), diagnostic);
            eprintln!("{}: {}", args.input.display(), diagnostic);
            process::exit(1);
        }
    };

    println!("Tokens for {}:", args.input.display());
    println!("{:-<60}", "");

    for token in tokens {
        // Skip newlines in output for readability unless verbose
        if token.kind == TokenKind::Newline && !args.verbose {
            continue;
        }

        println!(
            "{:4}:{:<4} {:20} {:?}",
            token.line,
            token.column,
            format!("{:?}", token.kind),
            token.text
        );
    }
}
