//! Command-line interface for statespec
//! This binary compiles StateSpec files and dumps the intermediate results
//! of each pipeline stage.
//!
//! Usage:
//!   statespec tokens `<path>`                      - Dump the raw token stream
//!   statespec sections `<path>`                    - Dump the per-section token groups
//!   statespec compile `<path>` [--format `<fmt>`]  - Run the full pipeline

use clap::{Arg, Command};
use statespec::pipeline::{CompilationResult, Pipeline};
use statespec::tokenizer::tokenize;

fn main() {
    let matches = Command::new("statespec")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compiler front end for StateSpec specification files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("tokens")
                .about("Dump the raw token stream of a file")
                .arg(
                    Arg::new("path")
                        .help("Path to the StateSpec file")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("sections")
                .about("Dump the tokens of each recognized section")
                .arg(
                    Arg::new("path")
                        .help("Path to the StateSpec file")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("compile")
                .about("Run the full compilation pipeline")
                .arg(
                    Arg::new("path")
                        .help("Path to the StateSpec file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('text', 'json', 'yaml')")
                        .default_value("text"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("tokens", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            handle_tokens_command(path);
        }
        Some(("sections", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            handle_sections_command(path);
        }
        Some(("compile", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            let format = sub.get_one::<String>("format").unwrap();
            handle_compile_command(path, format);
        }
        _ => unreachable!(),
    }
}

fn read_source(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    })
}

/// Handle the tokens command
fn handle_tokens_command(path: &str) {
    let source = read_source(path);
    for token in tokenize(&source) {
        println!("{}", token);
    }
}

/// Handle the sections command
fn handle_sections_command(path: &str) {
    let source = read_source(path);
    let result = Pipeline::new().run(&source);
    for diagnostic in result.errors() {
        eprintln!("{}", diagnostic);
    }
    for (section, tokens) in &result.lexical.sections {
        println!("#{}", section);
        for token in tokens {
            println!("  {}", token);
        }
    }
    if !result.lexical.success {
        std::process::exit(1);
    }
}

/// Handle the compile command
fn handle_compile_command(path: &str, format: &str) {
    let source = read_source(path);
    let result = Pipeline::new().run(&source);

    match format {
        "text" => print_text_report(&result),
        "json" => {
            let output = serde_json::to_string_pretty(&result).unwrap_or_else(|e| {
                eprintln!("Serialization error: {}", e);
                std::process::exit(1);
            });
            println!("{}", output);
        }
        "yaml" => {
            let output = serde_yaml::to_string(&result).unwrap_or_else(|e| {
                eprintln!("Serialization error: {}", e);
                std::process::exit(1);
            });
            print!("{}", output);
        }
        other => {
            eprintln!("Unknown format '{}'; expected 'text', 'json' or 'yaml'", other);
            std::process::exit(1);
        }
    }

    if !result.success() {
        std::process::exit(1);
    }
}

fn print_text_report(result: &CompilationResult) {
    for warning in result.warnings() {
        println!("{}", warning);
    }
    for error in result.errors() {
        println!("{}", error);
    }

    println!(
        "tokenizer: {} tokens in {:?}",
        result.tokens.len(),
        result.timings.tokenizer
    );
    println!(
        "lexical: {} sections in {:?}",
        result.lexical.sections.len(),
        result.timings.lexical
    );
    if let (Some(parser), Some(elapsed)) = (&result.parser, result.timings.parser) {
        let statements: usize = parser.sections.values().map(Vec::len).sum();
        println!("parser: {} statements in {:?}", statements, elapsed);
    }
    if let (Some(semantic), Some(elapsed)) = (&result.semantic, result.timings.semantic) {
        println!(
            "semantic: {} symbols in {:?}",
            semantic.symbol_table.len(),
            elapsed
        );
    }

    if let Some(table) = result.symbol_table() {
        println!("\nSymbol table:");
        print!("{}", table);
    }
}
