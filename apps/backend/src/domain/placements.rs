//! Placement and winner derivation from recorded scores.
//!
//! Standard competition ranking: scores sort descending, tied scores share a
//! placement, and the next distinct score gets `1 + number of players ahead`
//! (1, 1, 3 rather than 1, 1, 2). Rows without a score get no placement and
//! never win. The function is deterministic in its input, which is what makes
//! the bulk recompute idempotent.

/// One scored row going into ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredEntry {
    pub row_id: i64,
    pub score: Option<i32>,
}

/// Ranking result for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedEntry {
    pub row_id: i64,
    pub placement: Option<i32>,
    pub is_winner: bool,
}

/// Rank entries by descending score. Output order matches input order.
pub fn rank_by_score(entries: &[ScoredEntry]) -> Vec<RankedEntry> {
    // Scored rows only, sorted descending
    let mut scored: Vec<(i64, i32)> = entries
        .iter()
        .filter_map(|e| e.score.map(|s| (e.row_id, s)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let mut placements: Vec<(i64, i32)> = Vec::with_capacity(scored.len());
    let mut prev_score: Option<i32> = None;
    let mut prev_placement = 0i32;
    for (index, (row_id, score)) in scored.iter().enumerate() {
        let placement = match prev_score {
            Some(prev) if prev == *score => prev_placement,
            _ => index as i32 + 1,
        };
        prev_score = Some(*score);
        prev_placement = placement;
        placements.push((*row_id, placement));
    }

    entries
        .iter()
        .map(|e| {
            let placement = placements
                .iter()
                .find(|(row_id, _)| *row_id == e.row_id)
                .map(|(_, p)| *p);
            RankedEntry {
                row_id: e.row_id,
                placement,
                is_winner: placement == Some(1),
            }
        })
        .collect()
}
