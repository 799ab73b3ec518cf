use std::collections::HashSet;

use crate::{
    db::RatingStore,
    error::AppResult,
    models::{Gender, UserId, UserProfile},
};

const AGE_BUCKET_WIDTH: u32 = 10;

/// Age range a peer must fall in, inclusive on both ends
///
/// The window starts at the target's decade and ends at the next decade
/// boundary, so it spans 11 ages (34 → [30, 40]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeWindow {
    pub floor: u32,
    pub ceiling: u32,
}

impl AgeWindow {
    pub fn for_age(age: u32) -> Self {
        let floor = (age / AGE_BUCKET_WIDTH) * AGE_BUCKET_WIDTH;
        Self {
            floor,
            ceiling: floor.saturating_add(AGE_BUCKET_WIDTH),
        }
    }

    pub fn contains(&self, age: u32) -> bool {
        self.floor <= age && age <= self.ceiling
    }
}

/// Filter handed to the rating store when looking up cohort candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CohortQuery {
    pub gender: Gender,
    pub window: AgeWindow,
    pub excluding: UserId,
}

impl CohortQuery {
    pub fn for_target(target: &UserProfile) -> Self {
        Self {
            gender: target.gender,
            window: AgeWindow::for_age(target.age),
            excluding: target.user_id,
        }
    }

    /// Whether `candidate` belongs to the cohort described by this query
    pub fn matches(&self, candidate: &UserProfile) -> bool {
        candidate.user_id != self.excluding
            && candidate.gender == self.gender
            && self.window.contains(candidate.age)
    }
}

/// Candidate peers for `target`: same gender, same age window, never the target.
///
/// Ids come back in the order the store returned them, each at most once.
#[tracing::instrument(skip(store, target), fields(user_id = %target.user_id))]
pub async fn select_cohort(store: &dyn RatingStore, target: &UserProfile) -> AppResult<Vec<UserId>> {
    let query = CohortQuery::for_target(target);
    let candidates = store.get_cohort_candidates(&query).await?;

    let mut seen = HashSet::new();
    let cohort: Vec<UserId> = candidates
        .iter()
        .filter(|candidate| query.matches(candidate))
        .map(|candidate| candidate.user_id)
        .filter(|user_id| seen.insert(*user_id))
        .collect();

    tracing::debug!(
        gender = %query.gender,
        age_floor = query.window.floor,
        age_ceiling = query.window.ceiling,
        cohort_size = cohort.len(),
        "Cohort selected"
    );

    Ok(cohort)
}
