use anyhow::Result;
use axum::async_trait;
use chrono::NaiveDate;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::leave_requests::LeaveRequestEntity,
    value_objects::approvals::{
        ApprovalOutcome, LeaveApprovalCommand, LeaveRejectionCommand, LeaveSubmissionCommand,
    },
};

#[automock]
#[async_trait]
pub trait LeaveRequestRepository {
    /// Stores the leave and the owner's `leave_request` notification together.
    async fn submit(&self, command: LeaveSubmissionCommand) -> Result<LeaveRequestEntity>;
    async fn find_by_id(&self, leave_id: Uuid) -> Result<Option<LeaveRequestEntity>>;
    async fn list_by_membership(&self, membership_id: Uuid) -> Result<Vec<LeaveRequestEntity>>;
    /// Pending or approved leave intersecting `[start, end]`.
    async fn has_overlapping(
        &self,
        membership_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool>;
    async fn has_approved_leave_on(&self, membership_id: Uuid, date: NaiveDate) -> Result<bool>;
    async fn approve(
        &self,
        command: LeaveApprovalCommand,
    ) -> Result<ApprovalOutcome<LeaveRequestEntity>>;
    async fn reject(
        &self,
        command: LeaveRejectionCommand,
    ) -> Result<ApprovalOutcome<LeaveRequestEntity>>;
}
