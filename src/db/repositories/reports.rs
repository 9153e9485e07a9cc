use crate::db::models::report_models::{NewReport, Report, ReportFilters, ReportPatch, ReportStatus};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

struct ReportsInner {
    reports: HashMap<i64, Report>,
    next_id: i64,
}

/// Reports repository for handling checklist submissions
#[derive(Clone)]
pub struct ReportsRepository {
    inner: Arc<Mutex<ReportsInner>>,
}

impl ReportsRepository {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ReportsInner {
                reports: HashMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Create a new report. Status is forced to pending and the
    /// reviewer/approver references start out null regardless of input.
    pub async fn create(&self, new_report: NewReport) -> Report {
        let mut inner = self.inner.lock().await;

        let id = inner.next_id;
        inner.next_id += 1;

        let now = Utc::now();
        let report = Report {
            id,
            system_type: new_report.system_type,
            date: new_report.date,
            shift: new_report.shift,
            operator_name: new_report.operator_name,
            submitted_by: new_report.submitted_by,
            reviewed_by: None,
            approved_by: None,
            status: ReportStatus::Pending,
            checklist_data: new_report.checklist_data,
            remarks: new_report.remarks,
            created_at: now,
            updated_at: now,
        };

        info!(
            "Created {} report {} for {}",
            report.system_type, report.id, report.date
        );
        inner.reports.insert(id, report.clone());
        report
    }

    /// All reports matching every provided filter, most recent first
    pub async fn get_all(&self, filters: &ReportFilters) -> Vec<Report> {
        let inner = self.inner.lock().await;

        let mut reports: Vec<Report> = inner
            .reports
            .values()
            .filter(|r| {
                filters
                    .system_type
                    .map_or(true, |system_type| r.system_type == system_type)
            })
            .filter(|r| filters.status.map_or(true, |status| r.status == status))
            .filter(|r| filters.date.as_deref().map_or(true, |date| r.date == date))
            .cloned()
            .collect();

        sort_most_recent_first(&mut reports);
        reports
    }

    pub async fn get_by_id(&self, id: i64) -> Option<Report> {
        let inner = self.inner.lock().await;
        inner.reports.get(&id).cloned()
    }

    /// Reports submitted by one user, most recent first
    pub async fn get_by_submitter(&self, user_id: i64) -> Vec<Report> {
        let inner = self.inner.lock().await;

        let mut reports: Vec<Report> = inner
            .reports
            .values()
            .filter(|r| r.submitted_by == Some(user_id))
            .cloned()
            .collect();

        sort_most_recent_first(&mut reports);
        reports
    }

    /// Merge the provided fields over the existing record and refresh
    /// updated_at. Returns None when the id is absent. Check and merge
    /// happen under one lock.
    pub async fn update(&self, id: i64, patch: ReportPatch) -> Option<Report> {
        let mut inner = self.inner.lock().await;
        Some(apply_patch(inner.reports.get_mut(&id)?, patch))
    }

    /// Merge the patch only while the report is in one of the allowed
    /// states. The state check and the merge happen under one lock so
    /// two concurrent transitions cannot both pass the guard.
    /// None = unknown id; Err(current) = report in a disallowed state.
    pub async fn update_in_status(
        &self,
        id: i64,
        allowed: &[ReportStatus],
        patch: ReportPatch,
    ) -> Option<Result<Report, ReportStatus>> {
        let mut inner = self.inner.lock().await;

        let report = inner.reports.get_mut(&id)?;
        if !allowed.contains(&report.status) {
            return Some(Err(report.status));
        }

        Some(Ok(apply_patch(report, patch)))
    }
}

fn apply_patch(report: &mut Report, patch: ReportPatch) -> Report {
    if let Some(status) = patch.status {
        report.status = status;
    }
    if let Some(remarks) = patch.remarks {
        report.remarks = Some(remarks);
    }
    if let Some(reviewed_by) = patch.reviewed_by {
        report.reviewed_by = Some(reviewed_by);
    }
    if let Some(approved_by) = patch.approved_by {
        report.approved_by = Some(approved_by);
    }
    report.updated_at = Utc::now();
    report.clone()
}

impl Default for ReportsRepository {
    fn default() -> Self {
        Self::new()
    }
}

// Ties on created_at fall back to id so ordering stays deterministic
// for reports created within the same timestamp tick.
fn sort_most_recent_first(reports: &mut [Report]) {
    reports.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
