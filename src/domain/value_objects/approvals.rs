//! Commands handed to the repositories that apply a review decision in one
//! database transaction.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    entities::{
        leave_requests::InsertLeaveRequestEntity,
        memberships::{InsertMembershipEntity, MembershipEntity, UpdateMembershipEntity},
        notifications::InsertNotificationEntity,
        transactions::{InsertTransactionEntity, TransactionEntity},
    },
    value_objects::{credits::CreditCharge, enums::payment_methods::PaymentMethod},
};

/// Result of a guarded write. Anything but `Applied` means the transaction was
/// rolled back without side effects.
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome<T> {
    Applied(T),
    /// The request was no longer pending.
    AlreadyProcessed,
    /// The membership version moved since it was read.
    StaleMembership,
    /// The credit balance moved since it was read.
    CreditsChanged,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MembershipWrite {
    Insert(InsertMembershipEntity),
    Update {
        membership_id: Uuid,
        expected_version: i32,
        changes: UpdateMembershipEntity,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinApprovalCommand {
    pub notification_id: Uuid,
    pub acted_by: Uuid,
    pub membership: MembershipWrite,
    pub credit_charge: Option<CreditCharge>,
    pub requester_notice: InsertNotificationEntity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub amount_minor: i32,
    pub payment_method: PaymentMethod,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentApprovalCommand {
    pub notification_id: Uuid,
    pub acted_by: Uuid,
    pub membership_id: Uuid,
    pub expected_version: i32,
    pub changes: UpdateMembershipEntity,
    pub credit_charge: Option<CreditCharge>,
    pub verification_id: Uuid,
    pub transaction: InsertTransactionEntity,
    pub payment_record: PaymentRecord,
    pub requester_notice: InsertNotificationEntity,
}

#[derive(Debug, Clone)]
pub struct PaymentApprovalResult {
    pub membership: MembershipEntity,
    pub transaction: TransactionEntity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRejection {
    pub membership_id: Uuid,
    pub expected_version: i32,
    pub verification_id: Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectRequestCommand {
    pub notification_id: Uuid,
    pub acted_by: Uuid,
    pub reason: Option<String>,
    pub requester_notice: InsertNotificationEntity,
    pub payment: Option<PaymentRejection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentVerificationDraft {
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub meal_plan_id: Uuid,
    pub amount_minor: i32,
    pub payment_method: PaymentMethod,
    pub screenshot_url: Option<String>,
}

/// The owner notice gets `membership_id` and `verification_id` written into
/// its data once those rows exist.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSubmissionCommand {
    pub membership: MembershipWrite,
    pub verification: PaymentVerificationDraft,
    pub owner_notice: InsertNotificationEntity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSubmissionResult {
    pub notification_id: Uuid,
    pub membership_id: Uuid,
    pub verification_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct LeaveSubmissionCommand {
    pub leave: InsertLeaveRequestEntity,
    pub owner_notice: InsertNotificationEntity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaveApprovalCommand {
    pub leave_id: Uuid,
    pub reviewed_by: Uuid,
    pub membership_id: Uuid,
    pub expected_version: i32,
    pub changes: UpdateMembershipEntity,
    pub member_notice: InsertNotificationEntity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRejectionCommand {
    pub leave_id: Uuid,
    pub reviewed_by: Uuid,
    pub reason: Option<String>,
    pub member_notice: InsertNotificationEntity,
}
