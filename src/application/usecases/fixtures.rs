//! Row builders shared by the use case tests.

use chrono::{Duration, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    entities::{
        meal_activations::MealActivationEntity, meal_plans::MealPlanEntity, meals::MealEntity,
        memberships::MembershipEntity, mess_credits::MessCreditsEntity, messes::MessEntity,
        notifications::NotificationEntity,
    },
    value_objects::enums::{
        activation_statuses::ActivationStatus, membership_statuses::MembershipStatus,
        notification_statuses::NotificationStatus, notification_types::NotificationType,
        payment_request_statuses::PaymentRequestStatus, payment_statuses::PaymentStatus,
    },
};

pub fn mess(owner_id: Uuid) -> MessEntity {
    MessEntity {
        id: Uuid::new_v4(),
        owner_id,
        name: "Annapurna Mess".to_string(),
        address: Some("12 College Road".to_string()),
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn plan(mess_id: Uuid, price_minor: i32) -> MealPlanEntity {
    MealPlanEntity {
        id: Uuid::new_v4(),
        mess_id,
        name: "Monthly veg".to_string(),
        description: None,
        price_minor,
        duration_days: 30,
        meals_per_day: 2,
        leave_days_allowed: 4,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn credits(mess_id: Uuid, balance: i32, member_cost: i32) -> MessCreditsEntity {
    MessCreditsEntity {
        mess_id,
        balance,
        member_cost,
        version: 3,
        updated_at: Utc::now(),
    }
}

pub fn notification(
    owner_id: Uuid,
    mess_id: Uuid,
    notification_type: NotificationType,
    status: NotificationStatus,
    data: Value,
) -> NotificationEntity {
    NotificationEntity {
        id: Uuid::new_v4(),
        user_id: owner_id,
        mess_id: Some(mess_id),
        notification_type: notification_type.to_string(),
        status: status.to_string(),
        title: "Request".to_string(),
        message: "Request".to_string(),
        data,
        is_read: false,
        acted_by: None,
        acted_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Active, paid membership covering the next ten days.
pub fn paid_membership(user_id: Uuid, mess_id: Uuid, meal_plan_id: Uuid) -> MembershipEntity {
    let now = Utc::now();
    MembershipEntity {
        id: Uuid::new_v4(),
        user_id,
        mess_id,
        meal_plan_id,
        status: MembershipStatus::Active.to_string(),
        payment_status: PaymentStatus::Paid.to_string(),
        payment_request_status: PaymentRequestStatus::Approved.to_string(),
        subscription_start: Some(now - Duration::days(20)),
        subscription_end: Some(now + Duration::days(10)),
        leave_days_used: 0,
        credits_charged: true,
        version: 7,
        created_at: now,
        updated_at: now,
    }
}

/// Membership created by a payment request that nobody reviewed yet.
pub fn awaiting_payment_membership(
    user_id: Uuid,
    mess_id: Uuid,
    meal_plan_id: Uuid,
) -> MembershipEntity {
    let now = Utc::now();
    MembershipEntity {
        id: Uuid::new_v4(),
        user_id,
        mess_id,
        meal_plan_id,
        status: MembershipStatus::Pending.to_string(),
        payment_status: PaymentStatus::Pending.to_string(),
        payment_request_status: PaymentRequestStatus::Pending.to_string(),
        subscription_start: None,
        subscription_end: None,
        leave_days_used: 0,
        credits_charged: false,
        version: 1,
        created_at: now,
        updated_at: now,
    }
}

pub fn meal(mess_id: Uuid, served_on: NaiveDate) -> MealEntity {
    MealEntity {
        id: Uuid::new_v4(),
        mess_id,
        meal_type: "lunch".to_string(),
        name: "Thali".to_string(),
        served_on,
        created_at: Utc::now(),
    }
}

pub fn activation(
    membership: &MembershipEntity,
    meal: &MealEntity,
    code: &str,
    status: ActivationStatus,
) -> MealActivationEntity {
    MealActivationEntity {
        id: Uuid::new_v4(),
        code: code.to_string(),
        user_id: membership.user_id,
        mess_id: meal.mess_id,
        meal_id: meal.id,
        membership_id: membership.id,
        activation_date: meal.served_on,
        status: status.to_string(),
        expires_at: crate::domain::value_objects::meal_activations::expiry_for(meal.served_on),
        activated_at: None,
        activated_by: None,
        activation_method: None,
        created_at: Utc::now(),
    }
}
