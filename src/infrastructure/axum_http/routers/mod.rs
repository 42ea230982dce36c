pub mod credits;
pub mod join_requests;
pub mod leave_requests;
pub mod meal_activations;
pub mod meal_plans;
pub mod meals;
pub mod memberships;
pub mod messes;
pub mod notifications;
pub mod payment_requests;
pub mod transactions;
