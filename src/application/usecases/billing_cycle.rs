use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    repositories::{
        meal_activations::MealActivationRepository, memberships::MembershipRepository,
    },
    value_objects::{enums::notification_types::NotificationType, notifications},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub lapsed: usize,
    pub marked_overdue: usize,
    pub skipped_stale: usize,
    pub failed: usize,
    pub codes_expired: usize,
    pub overdue_ids: Vec<Uuid>,
}

/// Periodic billing maintenance: flags lapsed paid memberships as overdue
/// with a reminder, and expires activation codes past their deadline.
pub struct BillingCycleUseCase<Ms, A>
where
    Ms: MembershipRepository + Send + Sync + 'static,
    A: MealActivationRepository + Send + Sync + 'static,
{
    membership_repository: Arc<Ms>,
    activation_repository: Arc<A>,
}

impl<Ms, A> BillingCycleUseCase<Ms, A>
where
    Ms: MembershipRepository + Send + Sync + 'static,
    A: MealActivationRepository + Send + Sync + 'static,
{
    pub fn new(membership_repository: Arc<Ms>, activation_repository: Arc<A>) -> Self {
        Self {
            membership_repository,
            activation_repository,
        }
    }

    pub async fn run_sweep(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let lapsed = self.membership_repository.list_lapsed_paid(now).await?;

        let mut report = SweepReport {
            lapsed: lapsed.len(),
            ..Default::default()
        };

        for membership in lapsed {
            let membership_id = membership.id;
            let ended = membership
                .subscription_end
                .map(|end| end.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            let reminder = notifications::notice(
                membership.user_id,
                Some(membership.mess_id),
                NotificationType::BillingReminder,
                "Subscription expired",
                format!("Your subscription ended on {}. Renew to keep your meals.", ended),
                json!({ "membership_id": membership_id, "subscription_end": membership.subscription_end }),
            );

            match self
                .membership_repository
                .mark_overdue(membership_id, membership.version, reminder)
                .await
            {
                Ok(true) => {
                    report.marked_overdue += 1;
                    report.overdue_ids.push(membership_id);
                }
                Ok(false) => {
                    report.skipped_stale += 1;
                    warn!(%membership_id, "billing: membership changed before it was flagged");
                }
                Err(err) => {
                    report.failed += 1;
                    error!(%membership_id, db_error = ?err, "billing: failed to flag membership overdue");
                }
            }
        }

        match self.activation_repository.expire_overdue(now).await {
            Ok(expired) => report.codes_expired = expired,
            Err(err) => error!(db_error = ?err, "billing: failed to expire activation codes"),
        }

        info!(
            lapsed = report.lapsed,
            marked_overdue = report.marked_overdue,
            skipped_stale = report.skipped_stale,
            failed = report.failed,
            codes_expired = report.codes_expired,
            "billing: sweep finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usecases::fixtures,
        domain::repositories::{
            meal_activations::MockMealActivationRepository, memberships::MockMembershipRepository,
        },
    };
    use chrono::Duration;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn sweep_flags_lapsed_members_and_expires_codes() {
        let now = Utc::now();
        let mut lapsed = fixtures::paid_membership(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        lapsed.subscription_end = Some(now - Duration::days(1));
        let mut stale = lapsed.clone();
        stale.id = Uuid::new_v4();
        let lapsed_id = lapsed.id;
        let lapsed_user = lapsed.user_id;
        let stale_id = stale.id;

        let mut memberships = MockMembershipRepository::new();
        memberships
            .expect_list_lapsed_paid()
            .with(eq(now))
            .returning(move |_| Ok(vec![lapsed.clone(), stale.clone()]));
        memberships
            .expect_mark_overdue()
            .withf(move |id, version, reminder| {
                *id == lapsed_id
                    && *version == 7
                    && reminder.user_id == lapsed_user
                    && reminder.notification_type == "billing_reminder"
            })
            .times(1)
            .returning(|_, _, _| Ok(true));
        memberships
            .expect_mark_overdue()
            .withf(move |id, _, _| *id == stale_id)
            .times(1)
            .returning(|_, _, _| Ok(false));

        let mut activations = MockMealActivationRepository::new();
        activations
            .expect_expire_overdue()
            .with(eq(now))
            .returning(|_| Ok(4));

        let usecase = BillingCycleUseCase::new(Arc::new(memberships), Arc::new(activations));
        let report = usecase.run_sweep(now).await.unwrap();

        assert_eq!(report.lapsed, 2);
        assert_eq!(report.marked_overdue, 1);
        assert_eq!(report.skipped_stale, 1);
        assert_eq!(report.codes_expired, 4);
        assert_eq!(report.overdue_ids, vec![lapsed_id]);
    }

    #[tokio::test]
    async fn failing_membership_does_not_stop_sweep() {
        let now = Utc::now();
        let membership = fixtures::paid_membership(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let mut memberships = MockMembershipRepository::new();
        memberships
            .expect_list_lapsed_paid()
            .returning(move |_| Ok(vec![membership.clone()]));
        memberships
            .expect_mark_overdue()
            .returning(|_, _, _| Err(anyhow::anyhow!("connection reset")));
        let mut activations = MockMealActivationRepository::new();
        activations
            .expect_expire_overdue()
            .times(1)
            .returning(|_| Ok(0));

        let usecase = BillingCycleUseCase::new(Arc::new(memberships), Arc::new(activations));
        let report = usecase.run_sweep(now).await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.marked_overdue, 0);
    }
}
