use anyhow::Result;
use axum::async_trait;
use mockall::automock;

use crate::domain::{
    entities::memberships::MembershipEntity,
    value_objects::approvals::{
        ApprovalOutcome, JoinApprovalCommand, PaymentApprovalCommand, PaymentApprovalResult,
        PaymentSubmissionCommand, PaymentSubmissionResult, RejectRequestCommand,
    },
};

/// Multi-row writes of the join and payment workflows. Each call is one
/// database transaction.
#[automock]
#[async_trait]
pub trait MembershipWorkflowRepository {
    async fn approve_join_request(
        &self,
        command: JoinApprovalCommand,
    ) -> Result<ApprovalOutcome<MembershipEntity>>;
    async fn approve_payment_request(
        &self,
        command: PaymentApprovalCommand,
    ) -> Result<ApprovalOutcome<PaymentApprovalResult>>;
    async fn reject_request(&self, command: RejectRequestCommand) -> Result<ApprovalOutcome<()>>;
    async fn submit_payment_request(
        &self,
        command: PaymentSubmissionCommand,
    ) -> Result<ApprovalOutcome<PaymentSubmissionResult>>;
}
