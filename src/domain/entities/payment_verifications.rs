use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::payment_verifications;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payment_verifications)]
pub struct InsertPaymentVerificationEntity {
    pub membership_id: Uuid,
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub meal_plan_id: Uuid,
    pub amount_minor: i32,
    pub payment_method: String,
    pub screenshot_url: Option<String>,
    pub status: String,
}
