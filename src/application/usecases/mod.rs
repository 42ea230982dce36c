pub mod billing_cycle;
pub mod credits;
pub mod join_requests;
pub mod leave_requests;
pub mod meal_activations;
pub mod meal_plans;
pub mod meals;
pub mod memberships;
pub mod mess_access;
pub mod messes;
pub mod notifications;
pub mod payment_requests;
pub mod request_reviews;
pub mod transactions;

#[cfg(test)]
mod fixtures;
