use crate::{
    models::SimilarityScore,
    services::{correlation::pearson, matching::PeerMatches},
};

/// Scores every peer and keeps the `limit` most similar.
///
/// Returns `None` when no peer shares a single rated game with the target
/// (including an empty cohort). Once any peer overlaps, peers without overlap
/// stay in the ranking at 0.0. Ordering is by correlation, highest first;
/// equal scores keep cohort order.
pub fn rank(matches: &[PeerMatches], limit: usize) -> Option<Vec<SimilarityScore>> {
    if matches.iter().all(|peer| peer.pairs.is_empty()) {
        return None;
    }

    let mut scores: Vec<SimilarityScore> = matches
        .iter()
        .map(|peer| SimilarityScore {
            user_id: peer.user_id,
            correlation: pearson(&peer.pairs),
        })
        .collect();

    // sort_by is stable
    scores.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));
    scores.truncate(limit);

    Some(scores)
}
