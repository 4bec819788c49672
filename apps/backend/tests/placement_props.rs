//! Property tests for the placement ranking.

use backend::domain::placements::{rank_by_score, ScoredEntry};
use proptest::prelude::*;

proptest! {
    #[test]
    fn ranking_respects_score_order(
        scores in prop::collection::vec(prop::option::of(-1000i32..1000), 0..12)
    ) {
        let entries: Vec<ScoredEntry> = scores
            .iter()
            .enumerate()
            .map(|(i, score)| ScoredEntry { row_id: i as i64, score: *score })
            .collect();

        let ranked = rank_by_score(&entries);
        prop_assert_eq!(ranked.len(), entries.len());

        for (entry, rank) in entries.iter().zip(ranked.iter()) {
            prop_assert_eq!(entry.row_id, rank.row_id);
            // Unscored rows get no placement and never win
            if entry.score.is_none() {
                prop_assert_eq!(rank.placement, None);
                prop_assert!(!rank.is_winner);
            } else {
                prop_assert!(rank.placement.is_some());
            }
            // Winner iff first place
            prop_assert_eq!(rank.is_winner, rank.placement == Some(1));
        }

        // Pairwise: higher score => strictly better placement; ties share one
        for (a, ra) in entries.iter().zip(ranked.iter()) {
            for (b, rb) in entries.iter().zip(ranked.iter()) {
                if let (Some(sa), Some(sb)) = (a.score, b.score) {
                    let (pa, pb) = (ra.placement.unwrap(), rb.placement.unwrap());
                    if sa > sb {
                        prop_assert!(pa < pb, "score {} placed {} vs score {} placed {}", sa, pa, sb, pb);
                    } else if sa == sb {
                        prop_assert_eq!(pa, pb);
                    }
                }
            }
        }

        // Placements follow standard competition ranking: a placement p is
        // exactly 1 + number of scored rows strictly better
        for (a, ra) in entries.iter().zip(ranked.iter()) {
            if let (Some(sa), Some(pa)) = (a.score, ra.placement) {
                let better = entries
                    .iter()
                    .filter(|other| other.score.is_some_and(|s| s > sa))
                    .count() as i32;
                prop_assert_eq!(pa, better + 1);
            }
        }
    }

    #[test]
    fn ranking_is_deterministic(
        scores in prop::collection::vec(prop::option::of(-50i32..50), 0..8)
    ) {
        let entries: Vec<ScoredEntry> = scores
            .iter()
            .enumerate()
            .map(|(i, score)| ScoredEntry { row_id: i as i64, score: *score })
            .collect();
        prop_assert_eq!(rank_by_score(&entries), rank_by_score(&entries));
    }
}
