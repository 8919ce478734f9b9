//! Static classification of collector phases.
//!
//! Every phase tag the line grammar can produce resolves to exactly one
//! [`TypeInfo`] row. Category and generation are properties of the row,
//! never of the surrounding log context.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Which kind of collector work an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Application threads stopped, partial collection work
    StwPause,
    /// Application threads stopped, whole heap collected
    StwFullPause,
    /// Collector runs alongside application threads
    ConcurrentPhase,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::StwPause,
        Category::StwFullPause,
        Category::ConcurrentPhase,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::StwPause => "stw_pause",
            Category::StwFullPause => "stw_full_pause",
            Category::ConcurrentPhase => "concurrent_phase",
        }
    }

    /// True for both stop-the-world categories.
    pub fn is_stop_the_world(&self) -> bool {
        matches!(self, Category::StwPause | Category::StwFullPause)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generation {
    All,
    Young,
    Tenured,
}

/// Symbolic tag of a single collector phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GcEventType {
    InitMark,
    FinalMark,
    InitUpdateRefs,
    FinalUpdateRefs,
    FinalEvac,
    DegeneratedGc,
    FullAllocationFailure,
    FullSystemGc,
    Full,
    ConcurrentResetBitmaps,
    ConcurrentReset,
    ConcurrentMarking,
    ConcurrentPrecleaning,
    CancelConcurrentMark,
    ConcurrentEvacuation,
    ConcurrentUpdateRefs,
    ConcurrentCleanup,
    ConcurrentUncommit,
}

impl GcEventType {
    /// The table row for this type.
    pub fn info(&self) -> &'static TypeInfo {
        // Every variant has exactly one row; checked by `table_covers_every_type`.
        &SHENANDOAH_TYPES[*self as usize]
    }

    pub fn category(&self) -> Category {
        self.info().category
    }

    pub fn generation(&self) -> Generation {
        self.info().generation
    }

    /// The tag as it appears in the log.
    pub fn as_str(&self) -> &'static str {
        self.info().tag
    }
}

impl fmt::Display for GcEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the dispatch table.
#[derive(Debug)]
pub struct TypeInfo {
    pub tag: &'static str,
    pub event_type: GcEventType,
    pub category: Category,
    pub generation: Generation,
    /// Lines of this type must report heap occupancy.
    pub requires_heap: bool,
}

const fn row(
    tag: &'static str,
    event_type: GcEventType,
    category: Category,
    generation: Generation,
    requires_heap: bool,
) -> TypeInfo {
    TypeInfo { tag, event_type, category, generation, requires_heap }
}

use Category::*;
use GcEventType as T;
use Generation::{All, Tenured};

/// Rows are in `GcEventType` declaration order so a type indexes its own row.
pub static SHENANDOAH_TYPES: [TypeInfo; 18] = [
    row("Pause Init Mark", T::InitMark, StwPause, All, false),
    row("Pause Final Mark", T::FinalMark, StwPause, All, true),
    row("Pause Init Update Refs", T::InitUpdateRefs, StwPause, All, false),
    row("Pause Final Update Refs", T::FinalUpdateRefs, StwPause, All, true),
    row("Pause Final Evac", T::FinalEvac, StwPause, All, false),
    row("Pause Degenerated GC", T::DegeneratedGc, StwFullPause, All, true),
    row("Pause Full (Allocation Failure)", T::FullAllocationFailure, StwFullPause, All, true),
    row("Pause Full (System.gc())", T::FullSystemGc, StwFullPause, All, true),
    row("Pause Full", T::Full, StwFullPause, All, true),
    row("Concurrent reset bitmaps", T::ConcurrentResetBitmaps, ConcurrentPhase, All, true),
    row("Concurrent reset", T::ConcurrentReset, ConcurrentPhase, All, false),
    row("Concurrent marking", T::ConcurrentMarking, ConcurrentPhase, Tenured, true),
    row("Concurrent precleaning", T::ConcurrentPrecleaning, ConcurrentPhase, Tenured, false),
    row("Cancel concurrent mark", T::CancelConcurrentMark, ConcurrentPhase, Tenured, false),
    row("Concurrent evacuation", T::ConcurrentEvacuation, ConcurrentPhase, All, true),
    row("Concurrent update references", T::ConcurrentUpdateRefs, ConcurrentPhase, All, true),
    row("Concurrent cleanup", T::ConcurrentCleanup, ConcurrentPhase, All, false),
    row("Concurrent uncommit", T::ConcurrentUncommit, ConcurrentPhase, All, false),
];

/// Tag text → row, built once.
#[derive(Debug)]
pub struct TypeTable {
    rows: &'static [TypeInfo],
    by_tag: HashMap<&'static str, &'static TypeInfo>,
}

impl TypeTable {
    pub fn new(rows: &'static [TypeInfo]) -> Self {
        let by_tag = rows.iter().map(|r| (r.tag, r)).collect();
        Self { rows, by_tag }
    }

    /// Resolve a tag, falling back to the tag with its trailing
    /// parenthesised cause removed.
    pub fn lookup(&self, tag: &str) -> Option<&'static TypeInfo> {
        let tag = tag.trim();
        self.by_tag
            .get(tag)
            .copied()
            .or_else(|| strip_cause(tag).and_then(|base| self.by_tag.get(base).copied()))
    }

    /// Row whose tag prefixes `text`, if any. Longest tag wins.
    pub fn lookup_prefix(&self, text: &str) -> Option<&'static TypeInfo> {
        self.rows
            .iter()
            .filter(|r| text.starts_with(r.tag))
            .max_by_key(|r| r.tag.len())
    }

    pub fn rows(&self) -> &'static [TypeInfo] {
        self.rows
    }
}

pub static SHENANDOAH_TABLE: Lazy<TypeTable> = Lazy::new(|| TypeTable::new(&SHENANDOAH_TYPES));

/// `"Pause Full (Metadata GC Threshold)"` → `"Pause Full"`
fn strip_cause(tag: &str) -> Option<&str> {
    if !tag.ends_with(')') {
        return None;
    }
    tag.find(" (").map(|idx| tag[..idx].trim_end())
}
