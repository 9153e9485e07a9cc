use crate::db::models::report_models::{
    ChecklistSubmission, NewReport, Report, ReportFilters, ReportPatch, ReportStatus, SystemType,
};
use crate::db::models::user_models::UserRole;
use crate::db::repositories::reports::ReportsRepository;
use crate::db::repositories::users::UsersRepository;
use crate::error::Error;
use crate::security::require_role;
use crate::services::sheets::NotificationSink;
use log::warn;
use serde::Serialize;
use std::sync::Arc;

/// One row of a report listing; the issue count is derived on the way
/// out, never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListItem {
    #[serde(flatten)]
    pub report: Report,
    pub issue_count: usize,
}

impl From<Report> for ReportListItem {
    fn from(report: Report) -> Self {
        let issue_count = report.issue_count();
        Self {
            report,
            issue_count,
        }
    }
}

/// Report lifecycle service: checklist submission, review/approval
/// transitions and listings. Review and approval are role-gated here,
/// at the service boundary.
pub struct ReportService {
    users: UsersRepository,
    reports: ReportsRepository,
    sink: Arc<dyn NotificationSink>,
}

impl ReportService {
    pub fn new(
        users: UsersRepository,
        reports: ReportsRepository,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            users,
            reports,
            sink,
        }
    }

    /// Validate and persist a checklist, then forward it to the
    /// spreadsheet sink on a detached task. Sink failures are logged
    /// and swallowed; the persisted report is never rolled back.
    pub async fn submit(
        &self,
        system_type: SystemType,
        submission: ChecklistSubmission,
        submitted_by: i64,
    ) -> Result<Report, Error> {
        submission.validate(system_type)?;

        let report = self
            .reports
            .create(NewReport {
                system_type,
                date: submission.date.clone(),
                shift: submission.shift,
                operator_name: submission.operator_name.clone(),
                submitted_by: Some(submitted_by),
                checklist_data: submission.entries.clone(),
                remarks: None,
            })
            .await;

        let data = serde_json::to_value(&submission)
            .map_err(|e| Error::Internal(format!("Failed to encode checklist: {}", e)))?;
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            if let Err(e) = sink.forward(system_type, data).await {
                warn!("Failed to forward checklist to spreadsheet: {}", e);
            }
        });

        Ok(report)
    }

    /// Mark a pending report as reviewed. Requires a reviewer with role
    /// supervisor or above.
    pub async fn review(&self, report_id: i64, reviewer_id: i64) -> Result<Report, Error> {
        self.review_inner(report_id, reviewer_id, None).await
    }

    /// Mark a report as approved. Requires an approver with role
    /// manager; allowed from pending or reviewed.
    pub async fn approve(&self, report_id: i64, approver_id: i64) -> Result<Report, Error> {
        self.approve_inner(report_id, approver_id, None).await
    }

    /// Generic report patch. Status transitions route through the
    /// role-gated review/approve paths; everything else merges directly.
    pub async fn patch(&self, report_id: i64, patch: ReportPatch) -> Result<Report, Error> {
        match patch.status {
            Some(ReportStatus::Reviewed) => {
                let reviewer_id = patch.reviewed_by.ok_or_else(|| {
                    Error::Validation("reviewedBy is required to review a report".to_string())
                })?;
                self.review_inner(report_id, reviewer_id, patch.remarks)
                    .await
            }
            Some(ReportStatus::Approved) => {
                let approver_id = patch.approved_by.ok_or_else(|| {
                    Error::Validation("approvedBy is required to approve a report".to_string())
                })?;
                self.approve_inner(report_id, approver_id, patch.remarks)
                    .await
            }
            Some(ReportStatus::Pending) => Err(Error::Validation(
                "Report status cannot move back to pending".to_string(),
            )),
            // requires_attention is the manual escape hatch; plain field
            // patches (remarks etc.) also land here
            Some(ReportStatus::RequiresAttention) | None => self
                .reports
                .update(report_id, patch)
                .await
                .ok_or_else(|| Error::NotFound("Report not found".to_string())),
        }
    }

    /// List reports. A submitter filter wins and ignores the others.
    pub async fn list(
        &self,
        filters: ReportFilters,
        submitter: Option<i64>,
    ) -> Vec<ReportListItem> {
        let reports = match submitter {
            Some(user_id) => self.reports.get_by_submitter(user_id).await,
            None => self.reports.get_all(&filters).await,
        };
        reports.into_iter().map(ReportListItem::from).collect()
    }

    pub async fn get(&self, report_id: i64) -> Result<Report, Error> {
        self.reports
            .get_by_id(report_id)
            .await
            .ok_or_else(|| Error::NotFound("Report not found".to_string()))
    }

    async fn review_inner(
        &self,
        report_id: i64,
        reviewer_id: i64,
        remarks: Option<String>,
    ) -> Result<Report, Error> {
        let reviewer = self
            .users
            .get_by_id(reviewer_id)
            .await
            .ok_or_else(|| Error::NotFound("Reviewer not found".to_string()))?;
        require_role(&reviewer, UserRole::Supervisor)?;

        self.transition(
            report_id,
            &[ReportStatus::Pending],
            ReportPatch {
                status: Some(ReportStatus::Reviewed),
                reviewed_by: Some(reviewer_id),
                remarks,
                approved_by: None,
            },
        )
        .await
    }

    async fn approve_inner(
        &self,
        report_id: i64,
        approver_id: i64,
        remarks: Option<String>,
    ) -> Result<Report, Error> {
        let approver = self
            .users
            .get_by_id(approver_id)
            .await
            .ok_or_else(|| Error::NotFound("Approver not found".to_string()))?;
        require_role(&approver, UserRole::Manager)?;

        self.transition(
            report_id,
            &[ReportStatus::Pending, ReportStatus::Reviewed],
            ReportPatch {
                status: Some(ReportStatus::Approved),
                approved_by: Some(approver_id),
                remarks,
                reviewed_by: None,
            },
        )
        .await
    }

    async fn transition(
        &self,
        report_id: i64,
        allowed: &[ReportStatus],
        patch: ReportPatch,
    ) -> Result<Report, Error> {
        let target = patch.status.unwrap_or(ReportStatus::Pending);
        match self.reports.update_in_status(report_id, allowed, patch).await {
            None => Err(Error::NotFound("Report not found".to_string())),
            Some(Err(current)) => Err(Error::Validation(format!(
                "Report is {} and cannot move to {}",
                current, target
            ))),
            Some(Ok(report)) => Ok(report),
        }
    }
}
