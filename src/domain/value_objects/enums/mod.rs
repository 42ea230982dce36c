pub mod activation_methods;
pub mod activation_statuses;
pub mod leave_statuses;
pub mod meal_types;
pub mod membership_statuses;
pub mod notification_statuses;
pub mod notification_types;
pub mod payment_methods;
pub mod payment_request_statuses;
pub mod payment_statuses;
pub mod transaction_statuses;
pub mod transaction_types;
pub mod user_roles;
pub mod verification_statuses;
