//! Deterministic winner selection among an event's photo submissions.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::domain::{EventId, PhotoSubmission};
use crate::error::SweepError;
use crate::persistence::SweepStore;

/// Total preference order over submissions, most preferred first.
///
/// 1. more likes
/// 2. verified capture over unverified
/// 3. earlier capture time; unknown capture time sorts last
/// 4. smaller submission id
#[must_use]
pub fn compare_candidates(a: &PhotoSubmission, b: &PhotoSubmission) -> Ordering {
    b.like_count
        .cmp(&a.like_count)
        .then_with(|| b.capture_verified.cmp(&a.capture_verified))
        .then_with(|| match (a.captured_at, b.captured_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Drops ineligible submissions and sorts the rest by [`compare_candidates`].
#[must_use]
pub fn rank_candidates(submissions: Vec<PhotoSubmission>) -> Vec<PhotoSubmission> {
    let mut ranked: Vec<PhotoSubmission> = submissions
        .into_iter()
        .filter(PhotoSubmission::is_eligible)
        .collect();
    ranked.sort_by(compare_candidates);
    ranked
}

/// Picks the winning submission for an event. Read-only.
#[derive(Debug, Clone)]
pub struct CandidateSelector {
    store: Arc<dyn SweepStore>,
}

impl CandidateSelector {
    /// Creates a selector over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn SweepStore>) -> Self {
        Self { store }
    }

    /// Returns the most preferred eligible submission, or `None` when the
    /// event has no submission with a photo that is not hidden.
    ///
    /// # Errors
    ///
    /// Returns a [`SweepError`] if the submissions cannot be read.
    pub async fn select_winner(
        &self,
        event_id: EventId,
    ) -> Result<Option<PhotoSubmission>, SweepError> {
        let submissions = self.store.eligible_submissions(event_id).await?;
        let candidates = submissions.len();
        let winner = rank_candidates(submissions).into_iter().next();

        tracing::debug!(
            %event_id,
            candidates,
            winner = ?winner.as_ref().map(|w| w.id),
            "candidates ranked"
        );
        Ok(winner)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{SubmissionId, UserId, Visibility};
    use crate::persistence::MemoryStore;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32) -> DateTime<Utc> {
        let Some(t) = Utc.with_ymd_and_hms(2024, 5, 10, hour, 0, 0).single() else {
            panic!("valid timestamp");
        };
        t
    }

    fn submission(
        event_id: EventId,
        likes: u32,
        verified: bool,
        captured_at: Option<DateTime<Utc>>,
    ) -> PhotoSubmission {
        let mut sub = PhotoSubmission::new(UserId::new(), event_id, "https://img/x.jpg");
        sub.like_count = likes;
        sub.capture_verified = verified;
        sub.captured_at = captured_at;
        sub
    }

    fn winner_of(subs: Vec<PhotoSubmission>) -> Option<SubmissionId> {
        rank_candidates(subs).first().map(|s| s.id)
    }

    #[test]
    fn more_likes_win() {
        let event = EventId::new();
        let low = submission(event, 3, true, Some(at(8)));
        let high = submission(event, 4, false, None);
        let expected = high.id;
        assert_eq!(winner_of(vec![low, high]), Some(expected));
    }

    #[test]
    fn verified_breaks_like_tie() {
        let event = EventId::new();
        let a = submission(event, 5, false, Some(at(10)));
        let b = submission(event, 5, true, Some(at(11)));
        let expected = b.id;
        assert_eq!(winner_of(vec![a, b]), Some(expected));
    }

    #[test]
    fn earlier_capture_breaks_verified_tie() {
        let event = EventId::new();
        let b = submission(event, 5, true, Some(at(11)));
        let c = submission(event, 5, true, Some(at(9)));
        let expected = c.id;
        assert_eq!(winner_of(vec![b, c]), Some(expected));
    }

    #[test]
    fn missing_capture_time_sorts_last() {
        let event = EventId::new();
        let unknown = submission(event, 5, true, None);
        let late = submission(event, 5, true, Some(at(23)));
        let expected = late.id;
        assert_eq!(winner_of(vec![unknown, late]), Some(expected));
    }

    #[test]
    fn id_breaks_full_tie_regardless_of_input_order() {
        let event = EventId::new();
        let mut first = submission(event, 2, false, None);
        let mut second = submission(event, 2, false, None);
        first.id = SubmissionId::from_uuid(uuid::Uuid::from_u128(1));
        second.id = SubmissionId::from_uuid(uuid::Uuid::from_u128(2));

        let forward = winner_of(vec![first.clone(), second.clone()]);
        let backward = winner_of(vec![second, first]);
        assert_eq!(forward, Some(SubmissionId::from_uuid(uuid::Uuid::from_u128(1))));
        assert_eq!(forward, backward);
    }

    #[test]
    fn ineligible_submissions_are_dropped() {
        let event = EventId::new();
        let mut hidden = submission(event, 100, true, Some(at(1)));
        hidden.visibility = Visibility::Hidden;
        let mut no_photo = submission(event, 50, true, Some(at(1)));
        no_photo.photo_url = None;
        assert!(rank_candidates(vec![hidden, no_photo]).is_empty());
    }

    #[tokio::test]
    async fn select_winner_is_repeatable() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let event = EventId::new();
        let mut expected = None;
        for (likes, verified) in [(3, false), (7, false), (7, true)] {
            let sub = submission(event, likes, verified, Some(at(12)));
            if likes == 7 && verified {
                expected = Some(sub.id);
            }
            store.insert_submission(sub).await;
        }

        let selector = CandidateSelector::new(store.handle());
        let Ok(first) = selector.select_winner(event).await else {
            panic!("selection failed");
        };
        let Ok(second) = selector.select_winner(event).await else {
            panic!("selection failed");
        };
        assert_eq!(first.as_ref().map(|s| s.id), expected);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn no_eligible_candidates_yields_none() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let event = EventId::new();
        let mut hidden = submission(event, 9, true, None);
        hidden.visibility = Visibility::Hidden;
        store.insert_submission(hidden).await;

        let selector = CandidateSelector::new(store.handle());
        assert!(matches!(selector.select_winner(event).await, Ok(None)));
    }
}
