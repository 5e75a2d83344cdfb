//! Repository for the `passes` collection.
//!
//! Mutations load the snapshot, apply a lifecycle rule from
//! `gatepass_core::pass`, and save the snapshot back under the pool's write
//! lock.

use gatepass_core::error::CoreError;
use gatepass_core::ids::generate_pass_id;
use gatepass_core::pass::{Decision, DecisionRequest, LocationReport, NewPass, Pass};
use gatepass_core::query::PassFilter;
use gatepass_core::types::Timestamp;

use crate::error::{RepoError, StoreError};
use crate::{DbPool, Mutation};

/// Provides lifecycle operations and listings for passes.
pub struct PassRepo;

impl PassRepo {
    /// Append a new pending pass with a fresh unique id.
    pub async fn create(
        pool: &DbPool,
        input: NewPass,
        now: Timestamp,
    ) -> Result<Pass, StoreError> {
        pool.mutate(|snapshot| {
            let id = generate_pass_id(|candidate| snapshot.contains_pass(candidate));
            let pass = Pass::new(id, input, now);
            snapshot.passes.push(pass.clone());
            Ok(Mutation::Commit(pass))
        })
        .await
    }

    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<Pass>, StoreError> {
        let snapshot = pool.read().await?;
        Ok(snapshot.find_pass(id).cloned())
    }

    /// All passes matching `filter`, in insertion order.
    pub async fn list(pool: &DbPool, filter: &PassFilter) -> Result<Vec<Pass>, StoreError> {
        let snapshot = pool.read().await?;
        Ok(filter.apply(snapshot.passes))
    }

    /// Record a moderator decision.
    ///
    /// The pass is looked up before the requested status is checked, so an
    /// unknown id is always `NotFound`.
    pub async fn decide(
        pool: &DbPool,
        id: &str,
        request: DecisionRequest,
        now: Timestamp,
    ) -> Result<Pass, RepoError> {
        let (_, pass) = Self::update(pool, id, |pass| {
            pass.decide(Decision::try_from(request)?, now);
            Ok(true)
        })
        .await?;
        Ok(pass)
    }

    /// Record the exit scan.
    pub async fn record_exit(pool: &DbPool, id: &str, now: Timestamp) -> Result<Pass, RepoError> {
        let (_, pass) = Self::update(pool, id, |pass| pass.record_exit(now).map(|()| true)).await?;
        Ok(pass)
    }

    /// Record the entry scan.
    pub async fn record_entry(pool: &DbPool, id: &str, now: Timestamp) -> Result<Pass, RepoError> {
        let (_, pass) =
            Self::update(pool, id, |pass| pass.record_entry(now).map(|()| true)).await?;
        Ok(pass)
    }

    /// Store a location ping if the student is late.
    ///
    /// Returns whether the ping was recorded along with the current pass.
    /// Nothing is written when it was not.
    pub async fn report_location(
        pool: &DbPool,
        id: &str,
        report: LocationReport,
        now: Timestamp,
    ) -> Result<(bool, Pass), RepoError> {
        Self::update(pool, id, |pass| Ok(pass.report_location(report, now))).await
    }

    /// Apply `f` to the pass with `id`, saving only if it reports a change.
    async fn update<F>(pool: &DbPool, id: &str, f: F) -> Result<(bool, Pass), RepoError>
    where
        F: FnOnce(&mut Pass) -> Result<bool, CoreError>,
    {
        pool.mutate(|snapshot| {
            let pass = snapshot
                .find_pass_mut(id)
                .ok_or_else(|| CoreError::NotFound {
                    entity: "Pass",
                    id: id.to_string(),
                })?;

            let changed = f(pass)?;
            let result = (changed, pass.clone());

            Ok(if changed {
                Mutation::Commit(result)
            } else {
                Mutation::Discard(result)
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};
    use gatepass_core::pass::{PassStatus, MSG_NOT_APPROVED, MSG_NOT_EXITED};

    use super::*;
    use crate::{memory_pool, Snapshot};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
    }

    fn request(student: &str) -> NewPass {
        NewPass {
            student_id: student.into(),
            student_name: "Student".into(),
            reason: "Family visit".into(),
            destination: "Home".into(),
            expected_return: t0() + Duration::hours(1),
        }
    }

    fn decision(status: &str) -> DecisionRequest {
        DecisionRequest {
            status: status.into(),
            remarks: Some("ok".into()),
            moderator_name: "Mod".into(),
        }
    }

    fn approval() -> DecisionRequest {
        decision("approved")
    }

    fn ping() -> LocationReport {
        LocationReport {
            latitude: 1.0,
            longitude: 2.0,
            timestamp: t0(),
        }
    }

    #[tokio::test]
    async fn create_persists_pending_pass() {
        let pool = memory_pool(Snapshot::default());
        let pass = PassRepo::create(&pool, request("s1"), t0()).await.unwrap();

        assert_eq!(pass.status, PassStatus::Pending);
        let stored = PassRepo::find_by_id(&pool, &pass.id).await.unwrap();
        assert_eq!(stored, Some(pass));
    }

    #[tokio::test]
    async fn created_ids_are_unique() {
        let pool = memory_pool(Snapshot::default());
        let a = PassRepo::create(&pool, request("s1"), t0()).await.unwrap();
        let b = PassRepo::create(&pool, request("s1"), t0()).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn decide_unknown_pass_is_not_found() {
        let pool = memory_pool(Snapshot::default());
        let result = PassRepo::decide(&pool, "missing", approval(), t0()).await;
        assert_matches!(
            result,
            Err(RepoError::Core(CoreError::NotFound { entity: "Pass", .. }))
        );
    }

    #[tokio::test]
    async fn decide_unknown_pass_with_bad_status_is_not_found() {
        let pool = memory_pool(Snapshot::default());
        let result = PassRepo::decide(&pool, "missing", decision("closed"), t0()).await;
        assert_matches!(
            result,
            Err(RepoError::Core(CoreError::NotFound { entity: "Pass", .. }))
        );
    }

    #[tokio::test]
    async fn decide_with_bad_status_leaves_pass_untouched() {
        let pool = memory_pool(Snapshot::default());
        let pass = PassRepo::create(&pool, request("s1"), t0()).await.unwrap();

        let result = PassRepo::decide(&pool, &pass.id, decision("closed"), t0()).await;
        assert_matches!(result, Err(RepoError::Core(CoreError::Validation(_))));

        let stored = PassRepo::find_by_id(&pool, &pass.id).await.unwrap().unwrap();
        assert_eq!(stored, pass);
    }

    #[tokio::test]
    async fn exit_on_pending_pass_is_rejected_and_not_saved() {
        let pool = memory_pool(Snapshot::default());
        let pass = PassRepo::create(&pool, request("s1"), t0()).await.unwrap();

        let result = PassRepo::record_exit(&pool, &pass.id, t0()).await;
        assert_matches!(result, Err(RepoError::Core(CoreError::InvalidState(m))) if m == MSG_NOT_APPROVED);

        let stored = PassRepo::find_by_id(&pool, &pass.id).await.unwrap().unwrap();
        assert!(stored.exit_time.is_none());
    }

    #[tokio::test]
    async fn entry_before_exit_is_rejected() {
        let pool = memory_pool(Snapshot::default());
        let pass = PassRepo::create(&pool, request("s1"), t0()).await.unwrap();
        PassRepo::decide(&pool, &pass.id, approval(), t0()).await.unwrap();

        let result = PassRepo::record_entry(&pool, &pass.id, t0()).await;
        assert_matches!(result, Err(RepoError::Core(CoreError::InvalidState(m))) if m == MSG_NOT_EXITED);
    }

    #[tokio::test]
    async fn full_lifecycle_round_trip() {
        let pool = memory_pool(Snapshot::default());
        let pass = PassRepo::create(&pool, request("s1"), t0()).await.unwrap();

        PassRepo::decide(&pool, &pass.id, approval(), t0() + Duration::minutes(1))
            .await
            .unwrap();
        PassRepo::record_exit(&pool, &pass.id, t0() + Duration::minutes(2))
            .await
            .unwrap();
        let done = PassRepo::record_entry(&pool, &pass.id, t0() + Duration::minutes(50))
            .await
            .unwrap();

        assert_eq!(done.approved_at, Some(t0() + Duration::minutes(1)));
        assert_eq!(done.exit_time, Some(t0() + Duration::minutes(2)));
        assert_eq!(done.entry_time, Some(t0() + Duration::minutes(50)));
        assert!(PassRepo::list(&pool, &PassFilter::Active).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn location_only_recorded_when_late() {
        let pool = memory_pool(Snapshot::default());
        let pass = PassRepo::create(&pool, request("s1"), t0()).await.unwrap();
        PassRepo::decide(&pool, &pass.id, approval(), t0()).await.unwrap();
        PassRepo::record_exit(&pool, &pass.id, t0()).await.unwrap();

        let (recorded, current) =
            PassRepo::report_location(&pool, &pass.id, ping(), t0() + Duration::minutes(10))
                .await
                .unwrap();
        assert!(!recorded);
        assert!(current.location.is_none());

        let (recorded, current) =
            PassRepo::report_location(&pool, &pass.id, ping(), t0() + Duration::hours(2))
                .await
                .unwrap();
        assert!(recorded);
        assert!(current.location.as_ref().unwrap().is_late);

        let stored = PassRepo::find_by_id(&pool, &pass.id).await.unwrap().unwrap();
        assert_eq!(stored.location, current.location);
    }

    #[tokio::test]
    async fn rejected_after_exit_is_neither_late_nor_tracked() {
        let pool = memory_pool(Snapshot::default());
        let pass = PassRepo::create(&pool, request("s1"), t0()).await.unwrap();
        PassRepo::decide(&pool, &pass.id, approval(), t0()).await.unwrap();
        PassRepo::record_exit(&pool, &pass.id, t0()).await.unwrap();
        PassRepo::decide(&pool, &pass.id, decision("rejected"), t0()).await.unwrap();

        let overdue = t0() + Duration::hours(2);
        let (recorded, current) = PassRepo::report_location(&pool, &pass.id, ping(), overdue)
            .await
            .unwrap();
        assert!(!recorded);
        assert!(current.location.is_none());
        assert!(PassRepo::list(&pool, &PassFilter::Late(overdue))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn list_filters_preserve_insertion_order() {
        let pool = memory_pool(Snapshot::default());
        let a = PassRepo::create(&pool, request("s1"), t0()).await.unwrap();
        let b = PassRepo::create(&pool, request("s2"), t0()).await.unwrap();
        let c = PassRepo::create(&pool, request("s1"), t0()).await.unwrap();
        PassRepo::decide(&pool, &b.id, approval(), t0()).await.unwrap();

        let mine: Vec<_> = PassRepo::list(&pool, &PassFilter::ByStudent("s1".into()))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(mine, [a.id.clone(), c.id.clone()]);

        let pending: Vec<_> = PassRepo::list(&pool, &PassFilter::Pending)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(pending, [a.id, c.id]);
    }

    #[tokio::test]
    async fn concurrent_creates_all_land() {
        let pool = memory_pool(Snapshot::default());
        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let pool = Arc::clone(&pool);
                tokio::spawn(async move {
                    PassRepo::create(&pool, request(&format!("s{i}")), t0()).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(PassRepo::list(&pool, &PassFilter::All).await.unwrap().len(), 20);
    }
}
