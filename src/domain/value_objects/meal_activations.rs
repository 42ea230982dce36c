use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::meal_activations::MealActivationEntity,
    value_objects::enums::{
        activation_methods::ActivationMethod, activation_statuses::ActivationStatus,
    },
};

pub const CODE_PREFIX: &str = "SM-";
const CODE_BODY_LEN: usize = 12;

/// `SM-` followed by 12 uppercase alphanumerics.
pub fn generate_activation_code() -> String {
    let body: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_BODY_LEN)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect();

    format!("{}{}", CODE_PREFIX, body)
}

pub fn is_well_formed_code(code: &str) -> bool {
    match code.strip_prefix(CODE_PREFIX) {
        Some(body) => {
            body.len() == CODE_BODY_LEN
                && body
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        }
        None => false,
    }
}

/// Codes are valid until the last second of the meal's day, UTC.
pub fn expiry_for(meal_date: NaiveDate) -> DateTime<Utc> {
    meal_date.and_time(NaiveTime::MIN).and_utc() + Duration::seconds(86_399)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationCheck {
    Ready,
    AlreadyActivated,
    /// `persist` is set when the stored row still says `generated`.
    Expired { persist: bool },
}

pub fn evaluate_activation(activation: &MealActivationEntity, now: DateTime<Utc>) -> ActivationCheck {
    match ActivationStatus::from_str(&activation.status) {
        Some(ActivationStatus::Activated) => ActivationCheck::AlreadyActivated,
        Some(ActivationStatus::Expired) | None => ActivationCheck::Expired { persist: false },
        Some(ActivationStatus::Generated) if now > activation.expires_at => {
            ActivationCheck::Expired { persist: true }
        }
        Some(ActivationStatus::Generated) => ActivationCheck::Ready,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateActivationModel {
    pub meal_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivateCodeModel {
    pub code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListActivationsFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessActivationsFilter {
    pub date: Option<NaiveDate>,
}

/// Fields written by the guarded `generated -> activated` update.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationStamp {
    pub activated_at: DateTime<Utc>,
    pub activated_by: Uuid,
    pub method: ActivationMethod,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MealActivationDto {
    pub id: Uuid,
    pub code: String,
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub meal_id: Uuid,
    pub activation_date: NaiveDate,
    pub status: Option<ActivationStatus>,
    pub expires_at: DateTime<Utc>,
    pub activated_at: Option<DateTime<Utc>>,
    pub activated_by: Option<Uuid>,
    pub activation_method: Option<ActivationMethod>,
}

impl From<MealActivationEntity> for MealActivationDto {
    fn from(value: MealActivationEntity) -> Self {
        Self {
            id: value.id,
            code: value.code,
            user_id: value.user_id,
            mess_id: value.mess_id,
            meal_id: value.meal_id,
            activation_date: value.activation_date,
            status: ActivationStatus::from_str(&value.status),
            expires_at: value.expires_at,
            activated_at: value.activated_at,
            activated_by: value.activated_by,
            activation_method: value
                .activation_method
                .as_deref()
                .and_then(ActivationMethod::from_str),
        }
    }
}
