use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    entities::{membership_payments::MembershipPaymentEntity, memberships::MembershipEntity},
    value_objects::enums::{
        membership_statuses::MembershipStatus, payment_request_statuses::PaymentRequestStatus,
        payment_statuses::PaymentStatus,
    },
};

/// Subscription window granted on admission: `[now, now + duration_days)`.
pub fn admission_period(now: DateTime<Utc>, duration_days: i32) -> (DateTime<Utc>, DateTime<Utc>) {
    (now, now + Duration::days(i64::from(duration_days)))
}

/// A paid renewal stacks on top of time the member still has left.
pub fn renewal_period(
    current_end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    duration_days: i32,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = match current_end {
        Some(end) if end > now => end,
        _ => now,
    };
    (start, start + Duration::days(i64::from(duration_days)))
}

/// Period an approved payment pays for. An unpaid window that is still running
/// (left by a join approval) is settled as is; otherwise the payment renews.
pub fn payment_period(
    membership: &MembershipEntity,
    now: DateTime<Utc>,
    duration_days: i32,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let paid = PaymentStatus::from_str(&membership.payment_status) == Some(PaymentStatus::Paid);
    match (membership.subscription_start, membership.subscription_end) {
        (Some(start), Some(end)) if !paid && end > now => (start, end),
        _ => renewal_period(membership.subscription_end, now, duration_days),
    }
}

pub fn is_active(membership: &MembershipEntity) -> bool {
    MembershipStatus::from_str(&membership.status) == Some(MembershipStatus::Active)
}

pub fn has_pending_payment_request(membership: &MembershipEntity) -> bool {
    PaymentRequestStatus::from_str(&membership.payment_request_status)
        == Some(PaymentRequestStatus::Pending)
}

/// Paid, active and with a subscription period that includes `date`.
pub fn covers_date(membership: &MembershipEntity, date: NaiveDate) -> bool {
    let paid = PaymentStatus::from_str(&membership.payment_status) == Some(PaymentStatus::Paid);
    let in_period = match (membership.subscription_start, membership.subscription_end) {
        (Some(start), Some(end)) => {
            start.date_naive() <= date && date.and_time(NaiveTime::MIN).and_utc() < end
        }
        _ => false,
    };
    is_active(membership) && paid && in_period
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MembershipDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub meal_plan_id: Uuid,
    pub status: Option<MembershipStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_request_status: Option<PaymentRequestStatus>,
    pub subscription_start: Option<DateTime<Utc>>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub leave_days_used: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MembershipEntity> for MembershipDto {
    fn from(value: MembershipEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            mess_id: value.mess_id,
            meal_plan_id: value.meal_plan_id,
            status: MembershipStatus::from_str(&value.status),
            payment_status: PaymentStatus::from_str(&value.payment_status),
            payment_request_status: PaymentRequestStatus::from_str(&value.payment_request_status),
            subscription_start: value.subscription_start,
            subscription_end: value.subscription_end,
            leave_days_used: value.leave_days_used,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MembershipPaymentDto {
    pub id: Uuid,
    pub membership_id: Uuid,
    pub amount_minor: i32,
    pub payment_method: String,
    pub transaction_id: Option<Uuid>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub paid_at: DateTime<Utc>,
}

impl From<MembershipPaymentEntity> for MembershipPaymentDto {
    fn from(value: MembershipPaymentEntity) -> Self {
        Self {
            id: value.id,
            membership_id: value.membership_id,
            amount_minor: value.amount_minor,
            payment_method: value.payment_method,
            transaction_id: value.transaction_id,
            period_start: value.period_start,
            period_end: value.period_end,
            paid_at: value.paid_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renewal_starts_at_future_end() {
        let now = Utc::now();
        let current_end = now + Duration::days(5);

        let (start, end) = renewal_period(Some(current_end), now, 30);

        assert_eq!(start, current_end);
        assert_eq!(end, current_end + Duration::days(30));
    }

    #[test]
    fn renewal_of_lapsed_membership_starts_now() {
        let now = Utc::now();

        let (start, end) = renewal_period(Some(now - Duration::days(2)), now, 30);
        assert_eq!(start, now);
        assert_eq!(end, now + Duration::days(30));

        let (start, _) = renewal_period(None, now, 30);
        assert_eq!(start, now);
    }

    #[test]
    fn payment_settles_running_unpaid_window() {
        let now = Utc::now();
        let mut membership = membership_fixture(now);
        membership.payment_status = PaymentStatus::Pending.to_string();
        let window = (now - Duration::days(1), now + Duration::days(29));
        membership.subscription_start = Some(window.0);
        membership.subscription_end = Some(window.1);

        assert_eq!(payment_period(&membership, now, 30), window);

        membership.payment_status = PaymentStatus::Paid.to_string();
        let (start, end) = payment_period(&membership, now, 30);
        assert_eq!(start, window.1);
        assert_eq!(end, window.1 + Duration::days(30));
    }

    #[test]
    fn payment_for_lapsed_unpaid_window_starts_now() {
        let now = Utc::now();
        let mut membership = membership_fixture(now);
        membership.payment_status = PaymentStatus::Pending.to_string();
        membership.subscription_start = Some(now - Duration::days(40));
        membership.subscription_end = Some(now - Duration::days(10));

        assert_eq!(payment_period(&membership, now, 30), (now, now + Duration::days(30)));
    }

    fn membership_fixture(now: DateTime<Utc>) -> MembershipEntity {
        MembershipEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            mess_id: Uuid::new_v4(),
            meal_plan_id: Uuid::new_v4(),
            status: MembershipStatus::Active.to_string(),
            payment_status: PaymentStatus::Paid.to_string(),
            payment_request_status: PaymentRequestStatus::Pending.to_string(),
            subscription_start: None,
            subscription_end: None,
            leave_days_used: 0,
            credits_charged: true,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn coverage_requires_paid_active_period() {
        let now = Utc::now();
        let today = now.date_naive();
        let mut membership = MembershipEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            mess_id: Uuid::new_v4(),
            meal_plan_id: Uuid::new_v4(),
            status: MembershipStatus::Active.to_string(),
            payment_status: PaymentStatus::Paid.to_string(),
            payment_request_status: PaymentRequestStatus::Approved.to_string(),
            subscription_start: Some(now - Duration::days(1)),
            subscription_end: Some(now + Duration::days(10)),
            leave_days_used: 0,
            credits_charged: true,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        assert!(covers_date(&membership, today));
        assert!(!covers_date(&membership, today + Duration::days(30)));

        membership.payment_status = PaymentStatus::Overdue.to_string();
        assert!(!covers_date(&membership, today));
    }

    #[test]
    fn admission_period_spans_plan_duration() {
        let now = Utc::now();
        let (start, end) = admission_period(now, 7);

        assert_eq!(start, now);
        assert_eq!(end - start, Duration::days(7));
    }
}
