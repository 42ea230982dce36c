pub mod chat_groups;
pub mod guards;
pub mod leave_requests;
pub mod meal_activations;
pub mod meal_plans;
pub mod meals;
pub mod membership_workflows;
pub mod memberships;
pub mod mess_credits;
pub mod messes;
pub mod notifications;
pub mod transactions;
