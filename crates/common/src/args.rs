//! Command line argument parsing for Logica tools.

use clap::{ArgAction, Parser};
use std::env;
use std::path::PathBuf;

/// Command line arguments for Logica tools.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path of the Logica program, or `-` to read from stdin
    #[arg(value_name = "PROGRAM")]
    pub program: String,

    /// Directory to search for imported files (may be given several times)
    #[arg(short = 'I', long = "import-root", value_name = "DIR")]
    pub import_root: Vec<String>,

    /// Print the whole parse result instead of just the rules
    #[arg(long, action = ArgAction::SetTrue)]
    pub full: bool,
}

impl Config {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn reads_stdin(&self) -> bool {
        self.program == "-"
    }

    pub fn program_name(&self) -> String {
        std::path::Path::new(&self.program)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown_program".into())
    }

    /// Import search roots: `--import-root` flags first, then the
    /// `:`-separated entries of `LOGICAPATH`.
    pub fn import_roots(&self) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = self.import_root.iter().map(PathBuf::from).collect();
        if let Ok(path) = env::var("LOGICAPATH") {
            roots.extend(path.split(':').filter(|p| !p.is_empty()).map(PathBuf::from));
        }
        roots
    }
}
