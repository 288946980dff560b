//! Structural model of a Klipper configuration file.
//!
//! A config file is line-oriented: bracketed section headers at column 0,
//! section bodies below them, and optionally a trailing auto-generated zone
//! that Klipper rewrites on every SAVE_CONFIG. Segmentation is total (every
//! byte belongs to exactly one segment) and never mutates the text; all
//! rewriting lives in the sanitizer.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// The fixed delimiter line that begins the auto-generated zone.
pub const SAVE_CONFIG_MARKER: &str =
    "#*# <---------------------- SAVE_CONFIG ---------------------->";

/// Canonical header comment that must immediately follow the marker.
pub const AUTO_ZONE_HEADER: &str =
    "#*# DO NOT EDIT THIS BLOCK OR BELOW. The contents are auto-generated.";

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#\*#\s*<---------------------- SAVE_CONFIG ---------------------->").unwrap()
});

static AUTO_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\*#\s*DO NOT EDIT THIS BLOCK OR BELOW\.").unwrap());

static SECTION_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\[([a-zA-Z0-9_]+)(?:[ \t]+([^\]\n]+))?\]").unwrap()
});

/// Section header that marks a reusable macro definition.
const MACRO_SECTION: &str = "gcode_macro";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Plain,
    Macro,
}

/// A named block starting at a bracketed header line and running to the next
/// top-level header or the end of its region.
#[derive(Debug, Clone)]
pub struct Section {
    /// Lower-cased name used for duplicate comparison. Includes the qualifier
    /// so `[gcode_macro START]` and `[gcode_macro PARK]` stay distinct.
    pub name: String,
    /// The header line exactly as written.
    pub raw_header: String,
    pub kind: SectionKind,
    /// Byte span of the whole section (header line included).
    pub span: Range<usize>,
    /// Byte span of the body (everything after the header line).
    pub body: Range<usize>,
}

/// The auto-generated region, from the first marker occurrence to end of file.
#[derive(Debug, Clone)]
pub struct AutoZone {
    pub span: Range<usize>,
    /// Start offsets of every marker occurrence. More than one means the
    /// firmware appended repeatedly and the zone needs reconciliation.
    pub markers: Vec<usize>,
    /// Whether the canonical "do not edit" header comment is present.
    pub has_header: bool,
}

/// Segmented view of one config file. Spans index into `text`.
#[derive(Debug)]
pub struct Document {
    pub text: String,
    /// Everything before the first marker (the whole text when no marker).
    pub head: Range<usize>,
    /// Top-level sections found in the head, in document order.
    pub sections: Vec<Section>,
    pub auto_zone: Option<AutoZone>,
}

impl Document {
    /// Segment raw text into head, named sections, and the auto-zone.
    pub fn segment(text: String) -> Self {
        let markers: Vec<usize> = MARKER_RE.find_iter(&text).map(|m| m.start()).collect();

        let (head, auto_zone) = if markers.is_empty() {
            (0..text.len(), None)
        } else {
            let first = markers[0];
            let span = first..text.len();
            let has_header = AUTO_HEADER_RE.is_match(&text[span.clone()]);
            (
                0..first,
                Some(AutoZone {
                    span,
                    markers,
                    has_header,
                }),
            )
        };

        let sections = scan_sections(&text, head.clone());

        Self {
            text,
            head,
            sections,
            auto_zone,
        }
    }

    pub fn head_text(&self) -> &str {
        &self.text[self.head.clone()]
    }

    pub fn auto_zone_text(&self) -> Option<&str> {
        self.auto_zone.as_ref().map(|z| &self.text[z.span.clone()])
    }
}

/// Start offsets of every SAVE_CONFIG marker occurrence in the text.
pub fn find_markers(text: &str) -> Vec<usize> {
    MARKER_RE.find_iter(text).map(|m| m.start()).collect()
}

/// Find every top-level section inside `region`, in document order.
///
/// Section spans run from the header line to the next header or the region
/// end, so the region is tiled by sections and the gaps between them.
pub fn scan_sections(text: &str, region: Range<usize>) -> Vec<Section> {
    let slice = &text[region.clone()];
    let mut sections = Vec::new();

    let headers: Vec<_> = SECTION_HEADER_RE.captures_iter(slice).collect();
    for (i, caps) in headers.iter().enumerate() {
        let whole = caps.get(0).unwrap();
        let ident = caps.get(1).unwrap().as_str();
        let qualifier = caps.get(2).map(|m| m.as_str().trim());

        let name = match qualifier {
            Some(q) => format!("{} {}", ident.to_lowercase(), q.to_lowercase()),
            None => ident.to_lowercase(),
        };
        let kind = if ident.eq_ignore_ascii_case(MACRO_SECTION) {
            SectionKind::Macro
        } else {
            SectionKind::Plain
        };

        let start = region.start + whole.start();
        let end = match headers.get(i + 1) {
            Some(next) => region.start + next.get(0).unwrap().start(),
            None => region.end,
        };

        // Body starts after the header line's newline, or is empty when the
        // header is the last line of the region.
        let header_line_end = text[start..end]
            .find('\n')
            .map(|p| start + p + 1)
            .unwrap_or(end);

        sections.push(Section {
            name,
            raw_header: whole.as_str().to_string(),
            kind,
            span: start..end,
            body: header_line_end..end,
        });
    }

    sections
}

/// Find macro-definition sections inside `region` (used by the sanitizer to
/// spot macros accidentally written into the auto-zone).
pub fn scan_macro_blocks(text: &str, region: Range<usize>) -> Vec<Section> {
    scan_sections(text, region)
        .into_iter()
        .filter(|s| s.kind == SectionKind::Macro)
        .collect()
}
