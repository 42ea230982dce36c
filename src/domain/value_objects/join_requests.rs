use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitJoinRequestModel {
    pub meal_plan_id: Uuid,
    pub message: Option<String>,
}

/// Optional reason attached to a rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewRequestModel {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RequestReceiptDto {
    pub notification_id: Uuid,
}
