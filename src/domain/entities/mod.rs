pub mod chat_groups;
pub mod credit_ledger;
pub mod leave_requests;
pub mod meal_activations;
pub mod meal_plans;
pub mod meals;
pub mod membership_payments;
pub mod memberships;
pub mod mess_credits;
pub mod messes;
pub mod notifications;
pub mod payment_verifications;
pub mod transactions;
