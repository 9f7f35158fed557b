//! Import resolution.
//!
//! `import a.b.C [as D]` names a file `a/b.l` somewhere under the
//! configured roots and one predicate inside it. Files are parsed
//! recursively; a per-invocation cache keyed by import string avoids
//! re-parsing, and an in-progress set catches import cycles.

use crate::dialect::Dialect;
use crate::error::{ErrorKind, ParseError, Result};
use crate::program::{parse_source, FileResult};
use crate::span::Span;
use crate::split::split;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// One `import` statement of a file.
#[derive(Debug, Clone)]
pub struct ImportedPredicate {
    pub(crate) file: String,
    pub(crate) predicate_name: String,
    pub(crate) synonym: Option<String>,
}

impl ImportedPredicate {
    #[must_use]
    #[inline]
    pub fn file(&self) -> &str {
        &self.file
    }

    #[must_use]
    #[inline]
    pub fn predicate_name(&self) -> &str {
        &self.predicate_name
    }

    #[must_use]
    #[inline]
    pub fn synonym(&self) -> Option<&str> {
        self.synonym.as_deref()
    }
}

impl fmt::Display for ImportedPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import {}.{}", self.file, self.predicate_name)?;
        if let Some(synonym) = &self.synonym {
            write!(f, " as {synonym}")?;
        }
        Ok(())
    }
}

/// Splits an import statement body into (file, predicate, synonym).
/// The final path segment names the predicate and must be capitalized.
pub(crate) fn split_import(s: &Span) -> Result<(String, String, Option<String>)> {
    let parts = split(s, " as ")?;
    if parts.len() > 2 {
        return Err(ParseError::new(ErrorKind::TooManyAs, s.clone()));
    }
    let synonym = parts.get(1).map(|p| p.as_str().to_string());
    let segments: Vec<&str> = parts[0].as_str().split('.').collect();
    let predicate = segments.last().copied().unwrap_or("");
    if !predicate
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase())
    {
        return Err(ParseError::new(ErrorKind::OneImportPerPredicate, s.clone()));
    }
    let file = segments[..segments.len() - 1].join(".");
    Ok((file, predicate.to_string(), synonym))
}

/// Owns the state of one top-level parse: search roots, the dialect
/// bit, the import cache, and cycle detection.
pub(crate) struct Resolver {
    roots: Vec<PathBuf>,
    dialect: Dialect,
    cache: HashMap<String, FileResult>,
    /// Import strings in discovery order; merge order depends on it.
    order: Vec<String>,
    in_progress: HashSet<String>,
}

impl Resolver {
    pub(crate) fn new(roots: &[PathBuf]) -> Self {
        let roots = if roots.is_empty() {
            vec![PathBuf::new()]
        } else {
            roots.to_vec()
        };
        Self {
            roots,
            dialect: Dialect::standard(),
            cache: HashMap::new(),
            order: Vec::new(),
            in_progress: HashSet::new(),
        }
    }

    #[inline]
    pub(crate) fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub(crate) fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
    }

    pub(crate) fn cached(&self, import: &str) -> Option<&FileResult> {
        self.cache.get(import)
    }

    pub(crate) fn registration_order(&self) -> &[String] {
        &self.order
    }

    pub(crate) fn existing_prefixes(&self) -> HashSet<String> {
        self.cache
            .values()
            .map(|parsed| parsed.predicates_prefix().to_string())
            .collect()
    }

    /// Parses the file an import string names, unless already done.
    /// `chain` is the stack of file names leading here, for cycle
    /// reporting.
    pub(crate) fn resolve(&mut self, import: &str, chain: &[String]) -> Result<()> {
        if self.cache.contains_key(import) {
            return Ok(());
        }
        if self.in_progress.contains(import) {
            let mut links: Vec<&str> = chain.iter().map(String::as_str).collect();
            links.push(import);
            return Err(ParseError::new(
                ErrorKind::CircularImport {
                    chain: links.join("->"),
                },
                Span::synthetic(import),
            ));
        }
        self.in_progress.insert(import.to_string());
        self.order.push(import.to_string());

        let relative = format!("{}.l", import.split('.').collect::<Vec<_>>().join("/"));
        let mut considered = Vec::new();
        let mut found = None;
        for root in &self.roots {
            let path = root.join(&relative);
            if path.exists() {
                found = Some(path);
                break;
            }
            considered.push(format!("- {}", path.display()));
        }
        let Some(path) = found else {
            // Point at the file part of a reconstructed import statement.
            let location = Span::synthetic(format!("import {import}.<PREDICATE>"))
                .slice(7..7 + import.len());
            return Err(ParseError::new(
                ErrorKind::ImportNotFound {
                    considered: considered.join("\n"),
                },
                location,
            ));
        };

        debug!(import, file = %path.display(), "reading imported file");
        let content = fs::read_to_string(&path).map_err(|_| {
            ParseError::new(
                ErrorKind::ImportUnreadable {
                    path: path.display().to_string(),
                },
                Span::synthetic(import),
            )
        })?;
        let parsed = parse_source(&content, import, self, chain)?;
        self.in_progress.remove(import);
        self.cache.insert(import.to_string(), parsed);
        Ok(())
    }
}
