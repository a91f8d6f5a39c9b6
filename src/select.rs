//! Candidate disambiguation.
//!
//! Nominatim returns several plausible matches for a free-text query; this
//! picks exactly one, deterministically, and records why.

use crate::error::SelectError;
use crate::models::Candidate;

/// Justification attached to every selection.
pub const SELECTION_REASON: &str = "Prefer boundary+administrative, then higher place_rank";

/// The winning candidate plus its position in the provider's ordering.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub candidate: &'a Candidate,
    /// Index into the original candidate list, used to pull the matching
    /// raw record into the artifact's audit trail.
    pub index: usize,
    pub reason: &'static str,
}

/// Pick one candidate from an ordered geocoder result list.
///
/// Ranking key, descending: boundary+administrative first, then the numeric
/// `place_rank` hint (absent treated as 0). The sort is stable, so ties
/// fall back to provider order and the first-listed entry wins. Total and
/// deterministic: the same list always yields the same selection.
pub fn select_candidate(candidates: &[Candidate]) -> Result<Selection<'_>, SelectError> {
    if candidates.is_empty() {
        return Err(SelectError::NoCandidates);
    }

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by_key(|&i| {
        let c = &candidates[i];
        let admin = if c.is_admin_boundary() { 1 } else { 0 };
        // Negated for descending order under a stable ascending sort
        (-admin, -c.place_rank.unwrap_or(0))
    });

    let index = order[0];
    Ok(Selection {
        candidate: &candidates[index],
        index,
        reason: SELECTION_REASON,
    })
}
