use std::io::Read;
use std::{fs, process};

use clap::Parser;
use common::Config;
use parser::parse_file;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize simple tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info"))
        .init();

    // Parse command line arguments
    let config = Config::parse();
    let content = read_program(&config);
    let import_roots = config.import_roots();

    match parse_file(&content, "main", &import_roots) {
        Ok(result) => {
            info!(
                "Parsed {} rules from {}",
                result.rules().len(),
                config.program()
            );
            if config.full {
                println!("file_name: {}", result.file_name());
                println!("predicates_prefix: {:?}", result.predicates_prefix());
                for imported in result.imported_predicates() {
                    println!("{imported};");
                }
            }
            print!("{result}");
        }
        Err(error) => {
            eprintln!("{}", error.context());
            eprintln!("\n[ Error ] {error}");
            process::exit(1);
        }
    }
}

fn read_program(config: &Config) -> String {
    if config.reads_stdin() {
        let mut content = String::new();
        if let Err(error) = std::io::stdin().read_to_string(&mut content) {
            eprintln!("Error reading stdin: {error}");
            process::exit(1);
        }
        return content;
    }
    match fs::read_to_string(config.program()) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("Error reading {}: {error}", config.program());
            process::exit(1);
        }
    }
}
