use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{
    enums::payment_methods::PaymentMethod, memberships::MembershipDto,
    transactions::TransactionDto,
};

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitPaymentRequestModel {
    pub mess_id: Uuid,
    pub meal_plan_id: Uuid,
    pub amount_minor: i32,
    pub payment_method: PaymentMethod,
    pub screenshot_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentRequestReceiptDto {
    pub notification_id: Uuid,
    pub membership_id: Uuid,
    pub verification_id: Uuid,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentApprovalDto {
    pub membership: MembershipDto,
    pub transaction: TransactionDto,
}
