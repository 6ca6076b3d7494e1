//! Spreadsheet (workbook) source parser
//!
//! Tolerates arbitrary sheet layout: every sheet is probed by reading its
//! first row as a header and fuzzy-matching column names against explicit
//! synonym lists. Sheets that do not look like technique data are skipped
//! entirely. Scan order within a sheet is top-to-bottom row order, so
//! "first non-empty name wins placeholder replacement" is reproducible.

use super::RawCandidate;
use crate::registry;
use calamine::{open_workbook_auto, Data, Range, Reader};
use rtops_common::{Error, Result};
use std::path::Path;

/// Header synonyms for the technique-id column
pub const ID_COLUMN_HEADERS: &[&str] = &["technique id", "external id", "id", "external_id"];

/// Header synonyms for the technique-name column
pub const NAME_COLUMN_HEADERS: &[&str] = &["technique name", "technique", "name"];

/// Header synonyms for the description column
pub const DESCRIPTION_COLUMN_HEADERS: &[&str] = &["description", "technique description"];

/// Header synonyms for the tactics column
pub const TACTICS_COLUMN_HEADERS: &[&str] = &["tactics", "tactic", "domain tactics"];

/// A loaded workbook: named sheets with their cell ranges
#[derive(Debug)]
pub struct WorkbookDoc {
    pub sheets: Vec<(String, Range<Data>)>,
}

/// Open a workbook file and read all sheets
pub fn load(path: &Path) -> Result<WorkbookDoc> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| Error::Parse(format!("{}: {}", path.display(), e)))?;
    Ok(WorkbookDoc {
        sheets: workbook.worksheets(),
    })
}

/// Extract raw candidates from every technique-like sheet of a workbook
pub fn candidates(doc: &WorkbookDoc) -> Vec<RawCandidate> {
    doc.sheets
        .iter()
        .flat_map(|(_, range)| parse_sheet(range))
        .collect()
}

/// Locate a logical column by fuzzy substring match against its synonyms
///
/// Synonyms are tried in priority order, so "technique name" claims its
/// column before the looser "technique" is even considered; within one
/// synonym, headers scan left to right. Matching is case-insensitive.
pub fn find_column(headers: &[String], synonyms: &[&str]) -> Option<usize> {
    find_column_excluding(headers, synonyms, &[])
}

/// `find_column`, but a column already claimed by another logical role is
/// never resolved again. Keeps an id header like "Technique ID" from also
/// serving as the name column.
fn find_column_excluding(headers: &[String], synonyms: &[&str], taken: &[usize]) -> Option<usize> {
    synonyms.iter().find_map(|&synonym| {
        headers.iter().enumerate().find_map(|(index, header)| {
            if taken.contains(&index) {
                return None;
            }
            header.to_lowercase().contains(synonym).then_some(index)
        })
    })
}

/// Split a tactics cell into registry tactic identifiers
///
/// Separators are commas, slashes, ampersands, and the word "and". A part
/// is only split on "and" when the part as a whole is not a registry
/// member, because "command and control" is itself one tactic. Tokens are
/// trimmed, lowercased, and internal spaces become hyphens; unrecognized
/// tokens are dropped, not errors.
pub fn split_tactics(raw: &str) -> Vec<String> {
    let lowered = raw.to_lowercase().replace('/', ",").replace(" & ", ",");

    let mut out = Vec::new();
    for part in lowered.split(',') {
        let token = canonical_token(part);
        if token.is_empty() {
            continue;
        }
        if registry::is_registered(&token) {
            out.push(token);
            continue;
        }
        for sub in part.split(" and ") {
            let token = canonical_token(sub);
            if registry::is_registered(&token) {
                out.push(token);
            }
        }
    }
    out
}

fn canonical_token(part: &str) -> String {
    part.trim().replace(' ', "-")
}

/// Parse one sheet into raw candidates
///
/// A sheet lacking an id, name, or tactics column is not technique data
/// and contributes nothing; the description column is optional.
pub fn parse_sheet(range: &Range<Data>) -> Vec<RawCandidate> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };

    let headers: Vec<String> = header_row.iter().map(cell_text).collect();

    let Some(col_id) = find_column(&headers, ID_COLUMN_HEADERS) else {
        return Vec::new();
    };
    let Some(col_name) = find_column_excluding(&headers, NAME_COLUMN_HEADERS, &[col_id]) else {
        return Vec::new();
    };
    let Some(col_tactics) =
        find_column_excluding(&headers, TACTICS_COLUMN_HEADERS, &[col_id, col_name])
    else {
        return Vec::new();
    };
    let col_description =
        find_column_excluding(&headers, DESCRIPTION_COLUMN_HEADERS, &[col_id, col_name, col_tactics]);

    let mut out = Vec::new();
    for row in rows {
        let technique_id = cell_text(row.get(col_id).unwrap_or(&Data::Empty));
        if !technique_id.starts_with('T') {
            continue;
        }

        let tactics_raw = cell_text(row.get(col_tactics).unwrap_or(&Data::Empty));
        if tactics_raw.is_empty() {
            continue;
        }

        let name = cell_text(row.get(col_name).unwrap_or(&Data::Empty));
        let description = col_description
            .map(|c| cell_text(row.get(c).unwrap_or(&Data::Empty)))
            .unwrap_or_default();

        for tactic in split_tactics(&tactics_raw) {
            out.push(RawCandidate {
                technique_id: technique_id.clone(),
                tactic,
                name: name.clone(),
                description: description.clone(),
            });
        }
    }
    out
}

/// Trimmed text content of a cell; non-string cells render via Display
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}
