//! Parsing a whole file: the statement loop, the rewrite pipeline,
//! predicate prefixing, and import merging.
//!
//! [`parse_file`] is the entry point. The file named `main` is the top
//! level: it keeps an empty predicate prefix and, once its own rules
//! are processed, appends the rules of every discovered import in
//! discovery order.

use crate::dialect::Dialect;
use crate::error::{ErrorKind, ParseError, Result};
use crate::import::{split_import, ImportedPredicate, Resolver};
use crate::rename::{defined_predicates, made_predicates, rename_predicate};
use crate::rewrite::{aggregation, annotation, dnf, multi_body};
use crate::span::Span;
use crate::split::split;
use crate::syntax::{parse_function_rule, parse_functor_rule, parse_rule, Rule};
use crate::traverse::remove_comments;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// The result of parsing one file.
#[derive(Debug, Clone)]
pub struct FileResult {
    rules: Vec<Rule>,
    imported_predicates: Vec<ImportedPredicate>,
    predicates_prefix: String,
    file_name: String,
}

impl FileResult {
    #[must_use]
    #[inline]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    #[inline]
    pub fn imported_predicates(&self) -> &[ImportedPredicate] {
        &self.imported_predicates
    }

    /// The per-file predicate prefix; empty for the top-level file.
    #[must_use]
    #[inline]
    pub fn predicates_prefix(&self) -> &str {
        &self.predicates_prefix
    }

    #[must_use]
    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl fmt::Display for FileResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule};")?;
        }
        Ok(())
    }
}

/// Parses Logica source text into its rule set.
///
/// `file_name == "main"` marks the top-level file; any other name
/// triggers per-file predicate prefixing. Imports are searched under
/// `import_roots` in order (an empty list behaves as the current
/// directory).
pub fn parse_file(content: &str, file_name: &str, import_roots: &[PathBuf]) -> Result<FileResult> {
    let file_name = if file_name.is_empty() {
        "main"
    } else {
        file_name
    };
    let mut resolver = Resolver::new(import_roots);
    parse_source(content, file_name, &mut resolver, &[])
}

/// Parses one file's content within an ongoing resolver session.
pub(crate) fn parse_source(
    content: &str,
    this_file_name: &str,
    resolver: &mut Resolver,
    chain: &[String],
) -> Result<FileResult> {
    if this_file_name == "main" {
        resolver.set_dialect(Dialect::from_source(content));
    }
    let dialect = resolver.dialect();

    let mut chain = chain.to_vec();
    chain.push(this_file_name.to_string());

    let cleaned = remove_comments(&Span::synthetic(content))?;
    let source = Span::synthetic(cleaned);
    let statements = split(&source, ";")?;

    let mut rules: Vec<Rule> = Vec::new();
    let mut imported_predicates: Vec<ImportedPredicate> = Vec::new();
    let mut created_by_import: HashMap<String, BTreeSet<String>> = HashMap::new();

    for statement in &statements {
        if statement.is_empty() {
            continue;
        }
        if statement.starts_with("import ") {
            let import_text = statement.slice_from("import ".len());
            let (file, predicate_name, synonym) = split_import(&import_text)?;
            resolver.resolve(&file, &chain)?;
            if !created_by_import.contains_key(&file) {
                if let Some(parsed) = resolver.cached(&file) {
                    let mut created = defined_predicates(parsed.rules());
                    created.extend(made_predicates(parsed.rules()));
                    created_by_import.insert(file.clone(), created);
                }
            }
            imported_predicates.push(ImportedPredicate {
                file,
                predicate_name,
                synonym,
            });
            continue;
        }

        if let Some((annotation_rule, rule)) = parse_function_rule(statement, dialect)? {
            rules.push(annotation_rule);
            rules.push(rule);
            continue;
        }
        if let Some(rule) = parse_functor_rule(statement, dialect)? {
            rules.push(rule);
            continue;
        }
        let mut rule = parse_rule(statement, dialect)?;
        rules.extend(annotation::annotations_from_denotations(&mut rule));
        rules.push(rule);
    }

    // Eliminate explicit disjunctions, then lift multi-body
    // aggregation, then turn the remaining aggregation slots into
    // calls.
    let rules = dnf::rewrite(rules);
    let mut rules = multi_body::rewrite(rules)?;
    aggregation::rewrite(&mut rules);

    let predicates_prefix = if this_file_name == "main" {
        String::new()
    } else {
        compute_prefix(this_file_name, &resolver.existing_prefixes())?
    };

    // Rename this file's own predicates under its prefix.
    if this_file_name != "main" {
        let mut own = defined_predicates(&rules);
        own.extend(made_predicates(&rules));
        for name in own {
            if !name.starts_with('@') && name != "++?" {
                let renamed = format!("{predicates_prefix}{name}");
                rename_predicate(&mut rules, &name, &renamed);
            }
        }
    }

    // Point references at the prefixed names of imported predicates.
    for imported in &imported_predicates {
        let import_prefix = resolver
            .cached(&imported.file)
            .map(|parsed| parsed.predicates_prefix().to_string())
            .unwrap_or_default();
        if import_prefix.is_empty() {
            return Err(ParseError::new(
                ErrorKind::EmptyImportPrefix {
                    file: imported.file.clone(),
                },
                Span::synthetic(imported.file.clone()),
            ));
        }
        let imported_as = imported
            .synonym
            .clone()
            .unwrap_or_else(|| imported.predicate_name.clone());
        let renamed = format!("{import_prefix}{}", imported.predicate_name);
        let rename_count = rename_predicate(&mut rules, &imported_as, &renamed);

        let created = created_by_import.get(&imported.file);
        let is_created = created
            .is_some_and(|c| c.contains(&renamed) || c.contains(&imported.predicate_name));
        if !is_created {
            return Err(ParseError::new(
                ErrorKind::UndefinedImport {
                    predicate: imported.predicate_name.clone(),
                    file: imported.file.clone(),
                    importer: this_file_name.to_string(),
                },
                Span::synthetic(format!("{} -> {}", imported.file, imported.predicate_name)),
            ));
        }
        if rename_count == 0 {
            return Err(ParseError::new(
                ErrorKind::UnusedImport {
                    predicate: imported.predicate_name.clone(),
                    file: imported.file.clone(),
                    importer: this_file_name.to_string(),
                },
                Span::synthetic(format!("{} -> {imported_as}", imported.file)),
            ));
        }
    }

    // The top-level file assembles all the rules together.
    if this_file_name == "main" {
        let mut defined = defined_predicates(&rules);
        for import in resolver.registration_order() {
            let Some(parsed) = resolver.cached(import) else {
                continue;
            };
            let imported_defined = defined_predicates(parsed.rules());
            let overlap: Vec<&String> = defined
                .intersection(&imported_defined)
                .filter(|name| !name.starts_with('@'))
                .collect();
            if !overlap.is_empty() {
                let names = overlap
                    .iter()
                    .map(|name| name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(ParseError::new(
                    ErrorKind::DuplicateDefinition {
                        file: parsed.file_name().to_string(),
                    },
                    Span::synthetic(names),
                ));
            }
            defined.extend(imported_defined);
            rules.extend(parsed.rules().iter().cloned());
        }
    }

    debug!(
        file = this_file_name,
        rules = rules.len(),
        imports = imported_predicates.len(),
        "parsed file"
    );
    Ok(FileResult {
        rules,
        imported_predicates,
        predicates_prefix,
        file_name: this_file_name.to_string(),
    })
}

/// Builds the unique predicate prefix of an imported file: its last
/// path segment capitalized plus `_`, extended leftward with earlier
/// segments until it collides with no registered prefix.
fn compute_prefix(file_name: &str, existing: &HashSet<String>) -> Result<String> {
    let segments: Vec<&str> = file_name.split('.').collect();
    let mut idx = segments.len() - 1;
    let mut prefix = format!("{}_", capitalize_first(segments[idx]));
    while existing.contains(&prefix) {
        if idx == 0 {
            return Err(ParseError::new(
                ErrorKind::PrefixExhausted {
                    prefix: prefix.clone(),
                },
                Span::synthetic(prefix),
            ));
        }
        idx -= 1;
        prefix = format!("{}{prefix}", segments[idx]);
    }
    Ok(prefix)
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_capitalizes_the_last_segment() {
        let existing = HashSet::new();
        assert_eq!(compute_prefix("lib.util", &existing).unwrap(), "Util_");
        assert_eq!(compute_prefix("single", &existing).unwrap(), "Single_");
    }

    #[test]
    fn prefix_extends_leftward_on_collision() {
        let mut existing = HashSet::new();
        existing.insert("Util_".to_string());
        assert_eq!(compute_prefix("lib.util", &existing).unwrap(), "libUtil_");

        existing.insert("libUtil_".to_string());
        let err = compute_prefix("lib.util", &existing).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::PrefixExhausted { .. }));
    }
}
