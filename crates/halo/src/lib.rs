//! Focus-indicator visibility analysis.
//!
//! Takes one immutable style snapshot per tested element — normal state,
//! focus state, geometry, and the ancestor backgrounds behind it — and
//! returns the ordered diagnostics for that element: definitive WCAG
//! non-text-contrast failures, plus the ambiguity warnings (gradients,
//! images, stacking contexts, translucency) that need a human eye instead
//! of a guessed number.
//!
//! Everything is pure computation. No browser, no I/O, no shared state;
//! snapshots are extracted by an out-of-process collaborator and arrive
//! over the JSON boundary below or as [`StyleSnapshot`] values directly.

#![forbid(unsafe_code)]

pub use halo_color::{Rgba, contrast_ratio, parse_css_color, relative_luminance};
pub use halo_contrast::{ComparisonTarget, MIN_NON_TEXT_CONTRAST, MechanismOutcome};
pub use halo_orchestrator::{
    MIN_BORDER_DELTA_PX, MIN_OUTLINE_OFFSET_PX, MIN_OUTLINE_WIDTH_PX, evaluate,
};
pub use halo_snapshot::{
    AncestorStyle, Condition, Diagnostic, ElementRef, FocusStyle, Measured, MechanismContext,
    Rect, Severity, SnapshotError, StateStyle, StyleSnapshot,
};

use anyhow::{Context as _, Result};

/// Deserialize one snapshot from its JSON wire form and check the input
/// contract.
///
/// # Errors
/// Fails when the JSON does not match the schema, or when the decoded
/// snapshot violates the contract (empty element reference, non-positive
/// font metrics, non-finite bounds).
pub fn snapshot_from_json(json: &str) -> Result<StyleSnapshot> {
    let snapshot: StyleSnapshot =
        serde_json::from_str(json).context("snapshot JSON does not match the schema")?;
    snapshot
        .validate()
        .context("snapshot violates the input contract")?;
    Ok(snapshot)
}

/// Evaluate one JSON snapshot and return its diagnostics as a JSON array.
///
/// # Errors
/// Fails on schema or contract violations. Malformed style *content*
/// inside a valid snapshot (unparseable colors, odd units) never errors;
/// the affected checks are skipped per the diagnostic rules.
pub fn evaluate_json(json: &str) -> Result<String> {
    let snapshot = snapshot_from_json(json)?;
    let findings = evaluate(&snapshot).context("evaluating snapshot")?;
    serde_json::to_string(&findings).context("serializing diagnostics")
}

/// Evaluate a batch of snapshots in order, one diagnostic list per input.
///
/// Evaluations are fully independent — no state crosses elements — so a
/// caller that wants parallelism can shard the slice across threads and
/// call this per shard with zero coordination.
///
/// # Errors
/// Stops at the first snapshot that violates the input contract.
pub fn evaluate_batch(snapshots: &[StyleSnapshot]) -> Result<Vec<Vec<Diagnostic>>, SnapshotError> {
    snapshots.iter().map(evaluate).collect()
}
