//! Structural sanitizer for the SAVE_CONFIG auto-zone.
//!
//! Reconciles duplicate markers, recovers macros written into the auto-zone,
//! and comments out duplicate sections. The text transform is pure and
//! idempotent; the only side effect is a timestamped backup written before
//! the target is overwritten.

use crate::document::{self, AUTO_ZONE_HEADER, Document, scan_macro_blocks, scan_sections};
use chrono::Local;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Comment line placed above macros pulled out of the auto-zone.
pub const RECOVERY_COMMENT: &str = "# ---- Macros recovered from auto-generated area ----";

/// Prefix applied to every line of a commented-out duplicate section.
pub const DUPLICATE_PREFIX: &str = "# DUPLICATE REMOVED: ";

/// What the sanitizer changed, for the operator report.
#[derive(Debug, Default)]
pub struct SanitizeReport {
    /// Header lines of macros moved out of the auto-zone.
    pub recovered_macros: Vec<String>,
    /// Names of duplicate sections that were commented out.
    pub duplicate_sections: Vec<String>,
    /// Number of stale auto-zone copies discarded (marker count minus one).
    pub discarded_auto_blocks: usize,
}

impl SanitizeReport {
    pub fn is_clean(&self) -> bool {
        self.recovered_macros.is_empty()
            && self.duplicate_sections.is_empty()
            && self.discarded_auto_blocks == 0
    }
}

#[derive(Debug)]
pub struct SanitizeOutcome {
    pub text: String,
    pub report: SanitizeReport,
}

#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write backup '{path}': {source}")]
    Backup {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Pure sanitization: marker reconciliation, macro recovery, section
/// deduplication, reassembly. Running it on its own output is a no-op.
pub fn sanitize_text(text: &str) -> SanitizeOutcome {
    let mut report = SanitizeReport::default();

    // 1. Marker reconciliation. Only the content after the LAST marker is
    // authoritative; everything between the first and last marker is stale
    // output from repeated firmware saves.
    let markers = document::find_markers(text);
    let (head_raw, auto_zone) = match (markers.first(), markers.last()) {
        (Some(&first), Some(&last)) => {
            report.discarded_auto_blocks = markers.len() - 1;
            (&text[..first], Some(ensure_auto_header(&text[last..])))
        }
        _ => (text, None),
    };
    let mut head = format!("{}\n", head_raw.trim_end());

    // 2. Macro recovery. Macros embedded in the auto-zone are excised
    // back-to-front (so earlier offsets stay valid) and appended to the head
    // verbatim, in their original relative order.
    let auto_zone = auto_zone.map(|zone| {
        let macros = scan_macro_blocks(&zone, 0..zone.len());
        if macros.is_empty() {
            return zone;
        }

        let mut stripped = zone.clone();
        for block in macros.iter().rev() {
            stripped.replace_range(block.span.clone(), "");
        }

        head = format!("{}\n\n{}\n", head.trim_end(), RECOVERY_COMMENT);
        for block in &macros {
            report.recovered_macros.push(block.raw_header.clone());
            head.push_str(zone[block.span.clone()].trim_end());
            head.push_str("\n\n");
        }

        stripped
    });

    // 3. Section deduplication in the head. First occurrence of a name wins;
    // later ones are commented out line by line.
    let head = dedupe_sections(&head, &mut report);

    // 4. Reassembly with exactly one blank line between head and auto-zone.
    let mut result = match auto_zone {
        Some(zone) => format!("{}\n\n{}", head.trim_end(), zone.trim_start()),
        None => head,
    };
    if !result.ends_with('\n') {
        result.push('\n');
    }

    SanitizeOutcome {
        text: result,
        report,
    }
}

/// Make sure the canonical "do not edit" comment immediately follows the
/// marker line, synthesizing it when missing.
fn ensure_auto_header(zone: &str) -> String {
    let doc = Document::segment(zone.to_string());
    if doc.auto_zone.as_ref().is_some_and(|z| z.has_header) {
        return zone.to_string();
    }

    match zone.find('\n') {
        Some(p) => format!("{}\n{}\n{}", &zone[..p], AUTO_ZONE_HEADER, &zone[p + 1..]),
        None => format!("{}\n{}\n", zone, AUTO_ZONE_HEADER),
    }
}

fn dedupe_sections(head: &str, report: &mut SanitizeReport) -> String {
    let sections = scan_sections(head, 0..head.len());
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = String::with_capacity(head.len());
    let mut pos = 0;

    for section in &sections {
        out.push_str(&head[pos..section.span.start]);
        let block = &head[section.span.clone()];

        if seen.insert(section.name.clone()) {
            out.push_str(block);
        } else {
            for line in block.trim_end().lines() {
                out.push_str(DUPLICATE_PREFIX);
                out.push_str(line);
                out.push('\n');
            }
            report.duplicate_sections.push(section.name.clone());
        }
        pos = section.span.end;
    }
    out.push_str(&head[pos..]);

    out
}

/// Sanitize a file on disk: read, back up the pristine original, then
/// overwrite. The backup write completes before the target is touched, so an
/// interruption leaves either the original or a fully-formed backup.
pub fn sanitize_file(path: &Path) -> Result<(SanitizeOutcome, PathBuf), SanitizeError> {
    let original = fs::read_to_string(path).map_err(|e| SanitizeError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let outcome = sanitize_text(&original);

    let backup_path = backup_path_for(path);
    fs::write(&backup_path, &original).map_err(|e| SanitizeError::Backup {
        path: backup_path.clone(),
        source: e,
    })?;

    fs::write(path, &outcome.text).map_err(|e| SanitizeError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok((outcome, backup_path))
}

fn backup_path_for(path: &Path) -> PathBuf {
    let ts = Local::now().format("%Y-%m-%d_%H%M%S");
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.preclean.{}.bak", name, ts))
}
