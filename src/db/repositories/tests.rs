use super::otp_codes::OtpRepository;
use super::reports::ReportsRepository;
use super::users::UsersRepository;
use crate::db::models::report_models::{
    NewReport, ReportFilters, ReportPatch, ReportStatus, Shift, SystemType,
};
use crate::db::models::user_models::{NewUser, UserRole};
use chrono::{Duration, Utc};
use std::collections::BTreeMap;

fn new_user(user_id: &str, role: UserRole) -> NewUser {
    NewUser {
        user_id: user_id.to_string(),
        mobile: "9541941695".to_string(),
        password: "secret".to_string(),
        role,
        name: user_id.to_string(),
    }
}

fn new_report(system_type: SystemType, date: &str, submitted_by: Option<i64>) -> NewReport {
    NewReport {
        system_type,
        date: date.to_string(),
        shift: Shift::Morning,
        operator_name: "Sarfraz".to_string(),
        submitted_by,
        checklist_data: BTreeMap::new(),
        remarks: None,
    }
}

#[tokio::test]
async fn user_ids_are_sequential_and_lookup_requires_role_match() {
    let repo = UsersRepository::new();

    let first = repo.create(new_user("zaffar", UserRole::Manager)).await;
    let second = repo.create(new_user("sarfraz", UserRole::Operator)).await;
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);

    let found = repo
        .get_by_user_id_and_role("zaffar", UserRole::Manager)
        .await;
    assert!(found.is_some());

    // real account, wrong role: reads as absent
    let mismatched = repo
        .get_by_user_id_and_role("zaffar", UserRole::Operator)
        .await;
    assert!(mismatched.is_none());

    assert!(repo.get_by_id(2).await.is_some());
    assert!(repo.get_by_id(99).await.is_none());
}

#[tokio::test]
async fn otp_is_single_use() {
    let repo = OtpRepository::new();
    let now = Utc::now();

    repo.create("6006807212", "1234", now + Duration::minutes(5))
        .await;

    assert!(repo.verify("6006807212", "1234", now).await);
    // second consumption of the same code fails
    assert!(!repo.verify("6006807212", "1234", now).await);
}

#[tokio::test]
async fn otp_fails_when_absent_or_expired() {
    let repo = OtpRepository::new();
    let now = Utc::now();

    assert!(!repo.verify("6006807212", "0000", now).await);

    repo.create("6006807212", "1234", now + Duration::minutes(5))
        .await;
    // fabricated "current time" past the expiry window
    let after_expiry = now + Duration::minutes(6);
    assert!(!repo.verify("6006807212", "1234", after_expiry).await);
}

#[tokio::test]
async fn otp_reissue_overwrites_consumed_entry() {
    let repo = OtpRepository::new();
    let now = Utc::now();

    repo.create("6006807212", "1234", now + Duration::minutes(5))
        .await;
    assert!(repo.verify("6006807212", "1234", now).await);

    // a later issuance for the same mobile+code pair is usable again
    repo.create("6006807212", "1234", now + Duration::minutes(5))
        .await;
    assert!(repo.verify("6006807212", "1234", now).await);
}

#[tokio::test]
async fn created_reports_start_pending_with_null_reviewers() {
    let repo = ReportsRepository::new();

    let report = repo
        .create(new_report(SystemType::Electrical, "2024-01-01", Some(2)))
        .await;

    assert_eq!(report.id, 1);
    assert_eq!(report.status, ReportStatus::Pending);
    assert!(report.reviewed_by.is_none());
    assert!(report.approved_by.is_none());
    assert_eq!(report.created_at, report.updated_at);
}

#[tokio::test]
async fn filters_are_conjunctive() {
    let repo = ReportsRepository::new();

    let target = repo
        .create(new_report(SystemType::Electrical, "2024-01-01", None))
        .await;
    repo.create(new_report(SystemType::Ac, "2024-01-01", None))
        .await;
    repo.create(new_report(SystemType::Electrical, "2024-02-02", None))
        .await;
    repo.update(
        target.id,
        ReportPatch {
            status: Some(ReportStatus::Approved),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let filters = ReportFilters {
        system_type: Some(SystemType::Electrical),
        status: Some(ReportStatus::Approved),
        date: Some("2024-01-01".to_string()),
    };
    let matched = repo.get_all(&filters).await;
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, target.id);

    // flipping any one filter to a non-matching value excludes it
    let mut wrong_type = filters.clone();
    wrong_type.system_type = Some(SystemType::Ac);
    assert!(repo.get_all(&wrong_type).await.is_empty());

    let mut wrong_status = filters.clone();
    wrong_status.status = Some(ReportStatus::Pending);
    assert!(repo.get_all(&wrong_status).await.is_empty());

    let mut wrong_date = filters;
    wrong_date.date = Some("2024-03-03".to_string());
    assert!(repo.get_all(&wrong_date).await.is_empty());
}

#[tokio::test]
async fn listings_are_most_recent_first() {
    let repo = ReportsRepository::new();

    for date in ["2024-01-01", "2024-01-02", "2024-01-03"] {
        repo.create(new_report(SystemType::Ac, date, Some(7))).await;
    }

    let all = repo.get_all(&ReportFilters::default()).await;
    let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);

    let mine = repo.get_by_submitter(7).await;
    assert_eq!(mine.len(), 3);
    assert_eq!(mine[0].id, 3);
    assert!(repo.get_by_submitter(99).await.is_empty());
}

#[tokio::test]
async fn update_merges_provided_fields_only() {
    let repo = ReportsRepository::new();

    let report = repo
        .create(new_report(SystemType::Ac, "2024-01-01", Some(2)))
        .await;

    let updated = repo
        .update(
            report.id,
            ReportPatch {
                status: Some(ReportStatus::Reviewed),
                reviewed_by: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, ReportStatus::Reviewed);
    assert_eq!(updated.reviewed_by, Some(3));
    // untouched fields survive the merge
    assert_eq!(updated.submitted_by, Some(2));
    assert_eq!(updated.operator_name, "Sarfraz");
    assert!(updated.updated_at >= updated.created_at);

    assert!(repo.update(99, ReportPatch::default()).await.is_none());
}
