//! Diagnostic classification — turns one style snapshot into the final,
//! deduplicated list of findings.
//!
//! The decision logic is data, not control flow: [`RULES`] is a fixed,
//! ordered table of guard/action pairs, evaluated top to bottom. Only the
//! first rule (no visible focus at all) short-circuits; every other rule
//! runs to completion and appends to one combined list. Mechanism contrast
//! outcomes are computed once up front so later rules can read earlier
//! results without re-deriving them.

#![forbid(unsafe_code)]

use halo_background::resolve_for;
use halo_contrast::{
    ComparisonTarget, MIN_NON_TEXT_CONTRAST, MechanismOutcome, evaluate_border,
    evaluate_box_shadow, evaluate_outline,
};
use halo_indicator::{IndicatorSummary, classify};
use halo_snapshot::{
    Condition, Diagnostic, Measured, MechanismContext, SnapshotError, StyleSnapshot,
};
use log::debug;

/// Minimum border thickening that registers as a visible focus mechanism.
pub const MIN_BORDER_DELTA_PX: f64 = 1.0;
/// Minimum outline thickness for a clearly visible indicator.
pub const MIN_OUTLINE_WIDTH_PX: f64 = 2.0;
/// Minimum outline offset separating the ring from the element edge.
pub const MIN_OUTLINE_OFFSET_PX: f64 = 2.0;

/// Everything a rule may read: the snapshot, its mechanism classification,
/// and one precomputed contrast outcome per mechanism.
struct RuleContext<'snap> {
    snapshot: &'snap StyleSnapshot,
    summary: IndicatorSummary,
    border: MechanismOutcome,
    outline: MechanismOutcome,
    box_shadow: MechanismOutcome,
}

/// One row of the rule table.
struct RuleSpec {
    name: &'static str,
    /// A terminal rule stops the walk once it fires.
    terminal: bool,
    applies: fn(&RuleContext<'_>) -> bool,
    run: fn(&RuleContext<'_>, &mut Vec<Diagnostic>),
}

/// The fixed rule table. Array order is evaluation order.
const RULES: &[RuleSpec] = &[
    RuleSpec {
        name: "no-visible-focus",
        terminal: true,
        applies: |context| context.summary.no_change,
        run: rule_no_visible_focus,
    },
    RuleSpec {
        name: "color-change-only",
        terminal: false,
        applies: |context| context.summary.color_only,
        run: rule_color_change_only,
    },
    RuleSpec {
        name: "outline-none",
        terminal: false,
        applies: |context| outline_removed(context.snapshot),
        run: rule_outline_none,
    },
    RuleSpec {
        name: "mechanism-checks",
        terminal: false,
        applies: |context| {
            context.summary.border_delta_px > 0.0
                || context.summary.has_outline
                || context.summary.has_box_shadow
        },
        run: rule_mechanism_checks,
    },
    RuleSpec {
        name: "default-focus",
        terminal: false,
        applies: |context| context.summary.ua_default_outline,
        run: rule_default_focus,
    },
    RuleSpec {
        name: "outline-only",
        terminal: false,
        applies: |context| {
            context.summary.has_outline
                && context.outline.is_pass()
                && context.summary.border_delta_px < MIN_BORDER_DELTA_PX
                && !context.summary.has_box_shadow
        },
        run: rule_outline_only,
    },
];

/// Evaluate one snapshot against the full rule table.
///
/// Pure and synchronous: the same snapshot always yields the same findings,
/// and no state is shared between calls, so callers may fan snapshots out
/// across threads freely.
///
/// # Errors
/// Returns a [`SnapshotError`] when the snapshot violates the input
/// contract. Malformed style *content* (unparseable colors or lengths)
/// never errors; the affected sub-check is skipped instead.
pub fn evaluate(snapshot: &StyleSnapshot) -> Result<Vec<Diagnostic>, SnapshotError> {
    snapshot.validate()?;

    let summary = classify(snapshot);
    let parent = resolve_for(snapshot);
    debug!(
        "[RULES] {} border_delta={}px outline={}({}px/{}px offset) shadow={} parent_ambiguous={}",
        snapshot.element_ref,
        summary.border_delta_px,
        summary.has_outline,
        summary.outline_width_px,
        summary.outline_offset_px,
        summary.has_box_shadow,
        parent.is_ambiguous(),
    );

    let context = RuleContext {
        border: evaluate_border(snapshot, &parent),
        outline: evaluate_outline(snapshot, &summary, &parent),
        box_shadow: evaluate_box_shadow(snapshot, &summary, &parent),
        snapshot,
        summary,
    };

    let mut findings = Vec::new();
    for rule in RULES {
        if !(rule.applies)(&context) {
            continue;
        }
        debug!("[RULES] rule {} fired for {}", rule.name, snapshot.element_ref);
        (rule.run)(&context, &mut findings);
        if rule.terminal {
            break;
        }
    }
    Ok(dedup(findings))
}

/// The focus state removes the outline outright.
fn outline_removed(snapshot: &StyleSnapshot) -> bool {
    snapshot
        .focus_style()
        .outline_style
        .trim()
        .eq_ignore_ascii_case("none")
}

fn rule_no_visible_focus(context: &RuleContext<'_>, findings: &mut Vec<Diagnostic>) {
    findings.push(finding(
        context,
        Condition::NoVisibleFocus,
        Measured::none(),
        "focus styles are identical to the normal state; nothing marks the element as focused",
    ));
}

fn rule_color_change_only(context: &RuleContext<'_>, findings: &mut Vec<Diagnostic>) {
    findings.push(finding(
        context,
        Condition::ColorChangeOnly,
        Measured::none(),
        "focus is shown by a color change alone; color cannot be the only indicator (WCAG 1.4.1)",
    ));
}

fn rule_outline_none(context: &RuleContext<'_>, findings: &mut Vec<Diagnostic>) {
    if context.summary.has_box_shadow {
        findings.push(finding(
            context,
            Condition::OutlineNoneWithBoxShadow,
            Measured::none(),
            "outline is suppressed on focus; the box-shadow must carry the entire indicator",
        ));
    } else {
        findings.push(finding(
            context,
            Condition::OutlineNoneNoBoxShadow,
            Measured::none(),
            "outline is suppressed on focus and no box-shadow stands in for it",
        ));
    }
}

/// Width/offset/shape checks and the contrast outcome, independently per
/// present mechanism. Mechanisms never short-circuit one another.
fn rule_mechanism_checks(context: &RuleContext<'_>, findings: &mut Vec<Diagnostic>) {
    check_border(context, findings);
    check_outline(context, findings);
    check_box_shadow(context, findings);
}

fn check_border(context: &RuleContext<'_>, findings: &mut Vec<Diagnostic>) {
    let delta = context.summary.border_delta_px;
    if delta <= 0.0 {
        return;
    }
    if delta < MIN_BORDER_DELTA_PX {
        // Too thin to act as an indicator; judging its contrast would be
        // meaningless, so the numeric check is not run.
        findings.push(finding(
            context,
            Condition::BorderChangeInsufficient,
            Measured::width(delta),
            format!(
                "border thickens by only {delta}px on focus; a visible border change needs \u{2265}{MIN_BORDER_DELTA_PX}px"
            ),
        ));
        return;
    }
    push_outcome(context, "border", context.border, findings);
}

fn check_outline(context: &RuleContext<'_>, findings: &mut Vec<Diagnostic>) {
    if !context.summary.has_outline {
        return;
    }
    let width = context.summary.outline_width_px;
    let offset = context.summary.outline_offset_px;
    if width < MIN_OUTLINE_WIDTH_PX {
        findings.push(finding(
            context,
            Condition::OutlineWidthInsufficient,
            Measured::width(width),
            format!(
                "outline is only {width}px thick; a clearly visible outline needs \u{2265}{MIN_OUTLINE_WIDTH_PX}px"
            ),
        ));
    } else if offset < MIN_OUTLINE_OFFSET_PX {
        findings.push(finding(
            context,
            Condition::OutlineOffsetInsufficient,
            Measured::width_and_offset(width, offset),
            format!(
                "outline sits only {offset}px from the element edge; it needs \u{2265}{MIN_OUTLINE_OFFSET_PX}px of offset to stand out"
            ),
        ));
    }
    push_outcome(context, "outline", context.outline, findings);
}

fn check_box_shadow(context: &RuleContext<'_>, findings: &mut Vec<Diagnostic>) {
    if !context.summary.has_box_shadow {
        return;
    }
    if context.summary.single_sided {
        findings.push(finding(
            context,
            Condition::SingleSideBoxShadow,
            Measured::none(),
            "no focus shadow layer wraps all four edges; the ring shows on some sides only",
        ));
    }
    push_outcome(context, "box-shadow", context.box_shadow, findings);
}

fn rule_default_focus(context: &RuleContext<'_>, findings: &mut Vec<Diagnostic>) {
    findings.push(finding(
        context,
        Condition::DefaultFocus,
        Measured::none(),
        "element relies on the user-agent default focus ring; its visibility varies across browsers and backgrounds",
    ));
}

fn rule_outline_only(context: &RuleContext<'_>, findings: &mut Vec<Diagnostic>) {
    findings.push(finding(
        context,
        Condition::NoBorderOutline,
        Measured::none(),
        "outline is the only focus indicator; screen magnifiers cropped tight to the element may not show it",
    ));
}

/// Translate one mechanism's contrast outcome into zero or one findings.
fn push_outcome(
    context: &RuleContext<'_>,
    mechanism: &str,
    outcome: MechanismOutcome,
    findings: &mut Vec<Diagnostic>,
) {
    match outcome {
        MechanismOutcome::Pass { ratio } => {
            debug!("[RULES] {mechanism} contrast passed at {ratio:.2}:1");
        }
        MechanismOutcome::Fail { ratio, against } => {
            let rounded = round_ratio(ratio);
            let target = target_noun(against, context.snapshot.mechanism_context);
            findings.push(finding(
                context,
                Condition::ContrastFail,
                Measured::ratio(rounded),
                format!(
                    "insufficient contrast ({rounded:.2}:1) against {target}, needs \u{2265}{MIN_NON_TEXT_CONTRAST}:1"
                ),
            ));
        }
        MechanismOutcome::Gated { condition } => {
            findings.push(finding(
                context,
                condition,
                Measured::none(),
                gate_message(mechanism, condition),
            ));
        }
        MechanismOutcome::Skipped => {
            debug!("[RULES] {mechanism} contrast skipped; no parseable color pair");
        }
    }
}

fn finding(
    context: &RuleContext<'_>,
    condition: Condition,
    measured: Measured,
    message: impl Into<String>,
) -> Diagnostic {
    Diagnostic::new(
        context.snapshot.mechanism_context,
        condition,
        &context.snapshot.element_ref,
        measured,
        message,
    )
}

/// Ratios report at two decimals, like `2.94:1`.
fn round_ratio(ratio: f64) -> f64 {
    (ratio * 100.0).round() / 100.0
}

/// Human name of the pair a failing ratio was computed against.
fn target_noun(target: ComparisonTarget, context: MechanismContext) -> String {
    match target {
        ComparisonTarget::PreviousBorder => "the pre-focus border color".to_owned(),
        ComparisonTarget::OwnBackground => {
            format!("{} background", context.to_string().to_ascii_lowercase())
        }
        ComparisonTarget::ParentBackground => "the surrounding background".to_owned(),
    }
}

/// Why a mechanism could not be verified automatically, naming the
/// mechanism so deduplicated findings still say where they came from.
fn gate_message(mechanism: &str, condition: Condition) -> String {
    match condition {
        Condition::ZIndexFloating => format!(
            "element floats on its own stacking context; what renders beneath the {mechanism} cannot be read from styles"
        ),
        Condition::ParentZIndexFloating => format!(
            "an ancestor establishes a stacking context; the background behind the {mechanism} cannot be read from styles"
        ),
        Condition::OutlineExceedsParent => format!(
            "the offset {mechanism} reaches beyond the parent bounds; check its contrast against what lies outside"
        ),
        Condition::ParentGradientBackground => format!(
            "the surrounding background is a gradient; check {mechanism} contrast against every stop"
        ),
        Condition::ParentImageBackground => format!(
            "the surrounding background is an image; check {mechanism} contrast against it manually"
        ),
        Condition::GradientBackground => format!(
            "the element background is a gradient; check {mechanism} contrast against every stop"
        ),
        Condition::ImageBackground => format!(
            "the element background is an image; check {mechanism} contrast against it manually"
        ),
        Condition::TransparentFocus => format!(
            "{mechanism} color is translucent (alpha below 0.5); its rendered contrast depends on what it blends with"
        ),
        _ => format!("{mechanism} contrast cannot be verified automatically"),
    }
}

/// First finding per condition wins; emission order is otherwise kept.
fn dedup(findings: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut seen = Vec::new();
    let mut unique = Vec::with_capacity(findings.len());
    for entry in findings {
        if seen.contains(&entry.condition) {
            continue;
        }
        seen.push(entry.condition);
        unique.push(entry);
    }
    unique
}
