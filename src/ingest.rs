//! Loading year files from disk into a [`Corpus`].
//!
//! A corpus directory holds one file per year, named `<year>.xml` or
//! `<year>.txt`. For XML files the text content of every `<TEXT>` element is
//! used; the elements are joined with a single space.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use walkdir::WalkDir;

use crate::corpus::{Admission, Corpus};
use crate::error::{AnalysisError, Result};

/// Widest accepted year range, in years.
pub const MAX_YEAR_SPAN: i64 = 10_000;

/// Why a year of the requested range did not make it into the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitFailure {
    /// No file exists for the year.
    Missing,
    /// The file exists but could not be read or parsed.
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUnit {
    pub year: i32,
    pub path: Option<PathBuf>,
    pub failure: UnitFailure,
}

/// Outcome of [`load_corpus`].
#[derive(Debug)]
pub struct LoadReport {
    pub corpus: Corpus,
    pub failed_units: Vec<FailedUnit>,
    /// Year whose tokens pushed the corpus over the cap; later years were not loaded.
    pub cap_reached_at: Option<i32>,
}

/// Finds `<year>.xml` / `<year>.txt` files directly inside `dir`.
///
/// When both exist for a year, the XML file wins.
pub fn collect_year_files(dir: &Path) -> BTreeMap<i32, PathBuf> {
    let mut files: BTreeMap<i32, PathBuf> = BTreeMap::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let year = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<i32>().ok());
        match (year, ext.as_deref()) {
            (Some(year), Some("xml")) => {
                files.insert(year, path.to_path_buf());
            }
            (Some(year), Some("txt")) => {
                files.entry(year).or_insert_with(|| path.to_path_buf());
            }
            _ => {}
        }
    }
    files
}

/// Reads the text of one year file.
pub fn read_year_file(path: &Path) -> std::result::Result<String, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("Read {} failed: {e}", path.display()))?;
    let is_xml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xml"));
    if is_xml {
        extract_text_elements(&raw)
    } else {
        Ok(raw)
    }
}

/// Loads every year from `start` to `end` (ascending) from `dir` into a corpus
/// capped at `max_tokens`. Open bounds default to the earliest/latest year file.
///
/// Missing and malformed years are recorded and skipped. Loading stops after
/// the first year whose running token total exceeds the cap; that year stays in
/// the corpus.
pub fn load_corpus(
    dir: &Path,
    start: Option<i32>,
    end: Option<i32>,
    max_tokens: usize,
) -> Result<LoadReport> {
    if !dir.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("corpus directory {} does not exist", dir.display()),
        )
        .into());
    }

    let files = collect_year_files(dir);
    if files.is_empty() {
        warn!("No year files found in {}", dir.display());
    }
    let first = start.or_else(|| files.keys().next().copied());
    let last = end.or_else(|| files.keys().next_back().copied());
    let years = match (first, last) {
        (Some(first), Some(last)) => {
            let span = i64::from(last) - i64::from(first);
            if span > MAX_YEAR_SPAN {
                return Err(AnalysisError::invalid_config(format!(
                    "year range {first}..={last} spans more than {MAX_YEAR_SPAN} years"
                )));
            }
            first..=last
        }
        _ => 1..=0,
    };

    let mut corpus = Corpus::with_max_tokens(max_tokens);
    let mut failed_units = Vec::new();
    let mut cap_reached_at = None;

    for year in years {
        let Some(path) = files.get(&year) else {
            warn!("No corpus file for year {}", year);
            failed_units.push(FailedUnit {
                year,
                path: None,
                failure: UnitFailure::Missing,
            });
            continue;
        };
        let text = match read_year_file(path) {
            Ok(text) => text,
            Err(reason) => {
                warn!("Skipping year {}: {}", year, reason);
                failed_units.push(FailedUnit {
                    year,
                    path: Some(path.clone()),
                    failure: UnitFailure::Malformed(reason),
                });
                continue;
            }
        };
        if let Admission::CapReached { year, .. } = corpus.add_segment(year, text)? {
            cap_reached_at = Some(year);
            break;
        }
    }

    info!(
        "Loaded {} years, {} tokens, {} failed",
        corpus.segments().len(),
        corpus.total_tokens(),
        failed_units.len()
    );
    Ok(LoadReport {
        corpus,
        failed_units,
        cap_reached_at,
    })
}

/// Prints gaps and failed years to stderr.
pub fn print_failed_units(failed: &[FailedUnit]) {
    eprintln!("\n=== Years not loaded ===");
    for unit in failed {
        match &unit.failure {
            UnitFailure::Missing => eprintln!("{}: no corpus file", unit.year),
            UnitFailure::Malformed(reason) => eprintln!("{}: {}", unit.year, reason),
        }
    }
}

// ---- XML helpers ----

/// Text content of all `<TEXT>` elements, joined with a single space.
pub fn extract_text_elements(xml: &str) -> std::result::Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut elements: Vec<String> = Vec::new();
    let mut current = String::new();
    // nesting depth inside the outermost open <TEXT>
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if depth > 0 {
                    depth += 1;
                } else if local_name(e.name().as_ref()) == b"TEXT" {
                    depth = 1;
                    current.clear();
                }
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 && local_name(e.name().as_ref()) == b"TEXT" {
                    elements.push(String::new());
                }
            }
            Ok(Event::End(_)) => {
                if depth == 1 {
                    elements.push(std::mem::take(&mut current));
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(t)) if depth > 0 => {
                current.push_str(&String::from_utf8_lossy(&t));
            }
            Ok(Event::CData(c)) if depth > 0 => {
                current.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Ok(Event::GeneralRef(r)) if depth > 0 => {
                if let Ok(Some(ch)) = r.resolve_char_ref() {
                    current.push(ch);
                } else {
                    let name = String::from_utf8_lossy(&r).into_owned();
                    match resolve_predefined_entity(&name) {
                        Some(value) => current.push_str(value),
                        None => return Err(format!("Unknown entity &{name};")),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("Parse XML failed: {e}")),
            _ => {}
        }
        buf.clear();
    }
    if depth > 0 {
        return Err("Parse XML failed: unclosed <TEXT> element".to_string());
    }
    Ok(elements.join(" "))
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_extract_text_elements() {
        let xml = r#"<?xml version="1.0"?>
<DOC>
  <HEAD>skip me</HEAD>
  <TEXT>Banks <B>failed</B> today</TEXT>
  <TEXT>Markets &amp; crisis</TEXT>
</DOC>"#;
        let text = extract_text_elements(xml).unwrap();
        assert_eq!(text, "Banks failed today Markets & crisis");
        assert!(!text.contains("skip"));
    }

    #[test]
    fn test_extract_without_text_elements() {
        assert_eq!(extract_text_elements("<DOC><P>x</P></DOC>").unwrap(), "");
    }

    #[test]
    fn test_malformed_xml() {
        assert!(extract_text_elements("<DOC><TEXT>open").is_err());
        assert!(extract_text_elements("<DOC><TEXT>a</B></DOC>").is_err());
    }

    #[test]
    fn test_collect_prefers_xml() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("1990.txt"), "plain").unwrap();
        fs::write(dir.path().join("1990.xml"), "<D><TEXT>xml</TEXT></D>").unwrap();
        fs::write(dir.path().join("1991.txt"), "plain").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let files = collect_year_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[&1990].ends_with("1990.xml"));
        assert!(files[&1991].ends_with("1991.txt"));
    }

    #[test]
    fn test_load_tolerates_gaps_and_caps() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("2000.txt"), "one two three").unwrap();
        fs::write(dir.path().join("2002.xml"), "<D><TEXT>broken").unwrap();
        fs::write(dir.path().join("2003.txt"), "four five").unwrap();
        fs::write(dir.path().join("2004.txt"), "six").unwrap();

        let report = load_corpus(dir.path(), Some(2000), Some(2004), 4).unwrap();
        let years: Vec<i32> = report.corpus.segments().iter().map(|s| s.year).collect();
        assert_eq!(years, vec![2000, 2003]);
        assert_eq!(report.cap_reached_at, Some(2003));
        assert_eq!(report.failed_units.len(), 2);
        assert_eq!(report.failed_units[0].failure, UnitFailure::Missing);
        assert!(matches!(
            report.failed_units[1].failure,
            UnitFailure::Malformed(_)
        ));
    }

    #[test]
    fn test_load_discovers_range() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("1931.txt"), "b").unwrap();
        fs::write(dir.path().join("1929.txt"), "a").unwrap();
        let report = load_corpus(dir.path(), None, None, 100).unwrap();
        assert_eq!(report.corpus.all_text(), "a b");
        // 1930 is inside the discovered range but absent
        assert_eq!(report.failed_units.len(), 1);
        assert_eq!(report.failed_units[0].year, 1930);
    }

    #[test]
    fn test_rejects_unbounded_year_range() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("1929.txt"), "a").unwrap();
        let err = load_corpus(dir.path(), Some(-2_000_000_000), Some(2_000_000_000), 100)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfiguration(_)));

        // an empty range is fine
        let report = load_corpus(dir.path(), Some(1931), Some(1929), 100).unwrap();
        assert!(report.corpus.is_empty());
        assert!(report.failed_units.is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        assert!(load_corpus(&dir.path().join("nope"), None, None, 10).is_err());
    }
}
