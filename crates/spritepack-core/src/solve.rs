//! Integer output-width solving.
//!
//! A floating-point scale factor applied naively drifts the guide span by a
//! pixel across a batch of sprites. The solver searches a bounded integer
//! neighborhood around the nominal output width for the width whose scaled
//! guide span rounds exactly to the rounded target span, falling back to the
//! closest achievable span when no width in range lands exactly.

/// Neighborhood searched around the nominal output width.
const SEARCH_RADIUS: i64 = 128;

/// Round half away from zero. `f64::round` already has these semantics
/// (unlike banker's rounding); the alias documents the intent at call sites.
#[inline]
pub(crate) fn round_half_away(value: f64) -> i64 {
    value.round() as i64
}

/// Solve the output width `sw` that best reproduces `target_span` when the
/// measured guide span is scaled by `sw / source_width`.
///
/// The score is dominated by the integer-pixel mismatch of the rounded
/// spans, tie-broken by the fractional distance; candidates are tried in
/// ascending `dsw` order and the first minimum wins, short-circuiting on an
/// exact integer match.
pub fn solve_output_width(source_width: u32, measured_span: f64, target_span: f64) -> u32 {
    let source_width = source_width.max(1) as f64;
    let measured_span = measured_span.max(1e-6);
    let target_span_i = round_half_away(target_span);

    let nominal_sw = round_half_away(source_width * target_span / measured_span).max(1);

    let mut best_sw = nominal_sw;
    let mut best_err = f64::INFINITY;
    for dsw in -SEARCH_RADIUS..=SEARCH_RADIUS {
        let cand_sw = (nominal_sw + dsw).max(1);
        let cand_scale = cand_sw as f64 / source_width;
        let cand_span = measured_span * cand_scale;
        let cand_span_i = round_half_away(cand_span);
        let err = (cand_span_i - target_span_i).abs() as f64 * 1000.0
            + (cand_span - target_span).abs();
        if err < best_err {
            best_err = err;
            best_sw = cand_sw;
            if cand_span_i == target_span_i {
                break;
            }
        }
    }
    best_sw.max(1) as u32
}


// ============================================================================
// Property-Based Tests
// ============================================================================
