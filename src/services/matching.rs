use std::collections::HashMap;

use crate::models::{GameId, RatedGame, ScorePair, UserId};

/// Score pairs for every game a peer and the target both rated
#[derive(Debug, Clone, PartialEq)]
pub struct PeerMatches {
    pub user_id: UserId,
    pub pairs: Vec<ScorePair>,
}

/// Pairs the target's scores with each cohort member's scores on shared games.
///
/// One entry per cohort member, in cohort order. Members with no games in
/// common (or no ratings at all) are kept with an empty pair list.
pub fn build_matches(
    target_ratings: &HashMap<GameId, i32>,
    cohort: &[UserId],
    ratings_by_user: &HashMap<UserId, Vec<RatedGame>>,
) -> Vec<PeerMatches> {
    cohort
        .iter()
        .map(|&user_id| {
            let pairs: Vec<ScorePair> = ratings_by_user
                .get(&user_id)
                .map(|ratings| {
                    ratings
                        .iter()
                        .filter_map(|rating| {
                            target_ratings
                                .get(&rating.game_id)
                                .map(|&target| ScorePair::new(target, rating.score))
                        })
                        .collect()
                })
                .unwrap_or_default();

            PeerMatches { user_id, pairs }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(values: &[(i32, i32)]) -> Vec<RatedGame> {
        values
            .iter()
            .map(|&(game, score)| RatedGame::new(GameId(game), score))
            .collect()
    }

    fn target() -> HashMap<GameId, i32> {
        HashMap::from([(GameId(1), 90), (GameId(2), 70), (GameId(3), 50)])
    }

    #[test]
    fn test_pairs_only_shared_games_in_peer_order() {
        let ratings_by_user = HashMap::from([(UserId(2), rated(&[(3, 55), (9, 100), (1, 85)]))]);

        let matches = build_matches(&target(), &[UserId(2)], &ratings_by_user);

        assert_eq!(
            matches,
            vec![PeerMatches {
                user_id: UserId(2),
                pairs: vec![ScorePair::new(50, 55), ScorePair::new(90, 85)],
            }]
        );
    }

    #[test]
    fn test_peer_without_overlap_is_kept_empty() {
        let ratings_by_user = HashMap::from([
            (UserId(2), rated(&[(1, 90)])),
            (UserId(3), rated(&[(7, 40), (8, 60)])),
        ]);

        let matches = build_matches(&target(), &[UserId(3), UserId(2), UserId(4)], &ratings_by_user);

        let ids: Vec<UserId> = matches.iter().map(|m| m.user_id).collect();
        assert_eq!(ids, vec![UserId(3), UserId(2), UserId(4)]);
        assert!(matches[0].pairs.is_empty());
        assert_eq!(matches[1].pairs.len(), 1);
        assert!(matches[2].pairs.is_empty());
    }

    #[test]
    fn test_empty_cohort_gives_no_matches() {
        let matches = build_matches(&target(), &[], &HashMap::new());
        assert!(matches.is_empty());
    }
}
