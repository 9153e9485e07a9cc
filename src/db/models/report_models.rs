use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inspected system type. Checkpoint count, wire key prefix and display
/// labels are fixed data of the variant, not string conventions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SystemType {
    #[serde(rename = "electrical")]
    Electrical,
    #[serde(rename = "ac")]
    Ac,
}

const ELECTRICAL_CHECKPOINTS: [&str; 10] = [
    "Main Panel Power Supply ON",
    "Breakers and MCBs in Normal State",
    "No Alarm or Trip Indicators",
    "Indicator Lights Working",
    "Surge Protection Devices Status OK",
    "Earthing Checked",
    "Load Distribution Normal",
    "Manual Override Accessible & Safe",
    "Temperature of Panel Normal",
    "Panel Area Clean and Locked",
];

const AC_CHECKPOINTS: [&str; 14] = [
    "All Outdoor Units Operational",
    "Indoor Units Functioning in All Zones",
    "Temperature Set Points Verified",
    "No Abnormal Noise/Vibration in Units",
    "Air Filters Cleaned (Weekly)",
    "Indoor Unit Front Panel Cleaned",
    "Outdoor Unit Fins & Area Clean",
    "Remote/Touch Panel Display Working",
    "Remote Batteries Functional",
    "Remote/Touch Panel Settings Accessible",
    "Drain Pipe Free from Clogging",
    "Gas Pressure Levels Normal",
    "Power Supply Stable (No trip/fault)",
    "Control Wiring & Cabling Secure",
];

impl SystemType {
    pub fn key_prefix(&self) -> &'static str {
        match self {
            SystemType::Electrical => "electrical",
            SystemType::Ac => "ac",
        }
    }

    pub fn checkpoint_count(&self) -> usize {
        self.checkpoint_labels().len()
    }

    pub fn checkpoint_labels(&self) -> &'static [&'static str] {
        match self {
            SystemType::Electrical => &ELECTRICAL_CHECKPOINTS,
            SystemType::Ac => &AC_CHECKPOINTS,
        }
    }
}

impl std::fmt::Display for SystemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key_prefix())
    }
}

/// Working shift during which the inspection was performed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Shift {
    Morning,
    Evening,
    Night,
}

/// Report review state. Advances forward only:
/// pending -> reviewed -> approved; requires_attention is a terminal
/// escape reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReportStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "reviewed")]
    Reviewed,
    #[serde(rename = "approved")]
    Approved,
    #[serde(rename = "requires_attention")]
    RequiresAttention,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Approved => "approved",
            ReportStatus::RequiresAttention => "requires_attention",
        };
        f.write_str(s)
    }
}

/// A submitted inspection checklist
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i64,
    pub system_type: SystemType,
    pub date: String,
    pub shift: Shift,
    pub operator_name: String,
    pub submitted_by: Option<i64>,
    pub reviewed_by: Option<i64>,
    pub approved_by: Option<i64>,
    pub status: ReportStatus,
    pub checklist_data: BTreeMap<String, String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Number of checkpoints answered "No". Derived, never stored.
    pub fn issue_count(&self) -> usize {
        self.checklist_data
            .iter()
            .filter(|(key, value)| !key.ends_with("_remarks") && value.as_str() == "No")
            .count()
    }
}

/// Fields for creating a report; the store assigns id, forces
/// status=pending and stamps the timestamps
#[derive(Debug, Clone)]
pub struct NewReport {
    pub system_type: SystemType,
    pub date: String,
    pub shift: Shift,
    pub operator_name: String,
    pub submitted_by: Option<i64>,
    pub checklist_data: BTreeMap<String, String>,
    pub remarks: Option<String>,
}

/// Partial update over an existing report; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPatch {
    pub status: Option<ReportStatus>,
    pub remarks: Option<String>,
    pub reviewed_by: Option<i64>,
    pub approved_by: Option<i64>,
}

/// Conjunctive report filters; exact string equality per field
#[derive(Debug, Clone, Default)]
pub struct ReportFilters {
    pub system_type: Option<SystemType>,
    pub status: Option<ReportStatus>,
    pub date: Option<String>,
}

/// Checklist submission body. Checkpoint entries arrive flattened next
/// to the header fields, e.g. `electrical_3: "Yes"`,
/// `electrical_3_remarks: "breaker replaced"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistSubmission {
    pub date: String,
    pub shift: Shift,
    pub operator_name: String,
    #[serde(flatten)]
    pub entries: BTreeMap<String, String>,
}

impl ChecklistSubmission {
    /// Validate the submission against the system type's schema.
    /// Entry keys must be `{prefix}_{n}` with a "Yes"/"No" value or
    /// `{prefix}_{n}_remarks` with free text, 1 <= n <= checkpoint count.
    pub fn validate(&self, system_type: SystemType) -> Result<(), Error> {
        if self.date.trim().is_empty() {
            return Err(Error::Validation("Date is required".to_string()));
        }
        if self.operator_name.trim().is_empty() {
            return Err(Error::Validation("Operator name is required".to_string()));
        }

        let prefix = system_type.key_prefix();
        let count = system_type.checkpoint_count();

        for (key, value) in &self.entries {
            let rest = key.strip_prefix(prefix).and_then(|r| r.strip_prefix('_'));
            let rest = match rest {
                Some(rest) => rest,
                None => {
                    return Err(Error::Validation(format!(
                        "Unknown checklist field: {}",
                        key
                    )))
                }
            };

            let (index_part, is_remarks) = match rest.strip_suffix("_remarks") {
                Some(index_part) => (index_part, true),
                None => (rest, false),
            };

            let index: usize = index_part.parse().map_err(|_| {
                Error::Validation(format!("Unknown checklist field: {}", key))
            })?;
            if index < 1 || index > count {
                return Err(Error::Validation(format!(
                    "Checkpoint {} out of range for {} checklist",
                    index, prefix
                )));
            }

            if !is_remarks && value != "Yes" && value != "No" {
                return Err(Error::Validation(format!(
                    "Checkpoint {} must be Yes or No",
                    key
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(entries: &[(&str, &str)]) -> ChecklistSubmission {
        ChecklistSubmission {
            date: "2024-01-01".to_string(),
            shift: Shift::Morning,
            operator_name: "Sarfraz".to_string(),
            entries: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn accepts_well_formed_electrical_entries() {
        let sub = submission(&[
            ("electrical_1", "Yes"),
            ("electrical_2", "No"),
            ("electrical_2_remarks", "breaker tripped"),
            ("electrical_10", "Yes"),
        ]);
        assert!(sub.validate(SystemType::Electrical).is_ok());
    }

    #[test]
    fn rejects_checkpoint_out_of_range() {
        let sub = submission(&[("electrical_11", "Yes")]);
        assert!(sub.validate(SystemType::Electrical).is_err());

        // valid for AC (14 checkpoints), not for electrical
        let sub = submission(&[("ac_11", "Yes")]);
        assert!(sub.validate(SystemType::Ac).is_ok());
    }

    #[test]
    fn rejects_foreign_and_malformed_keys() {
        let sub = submission(&[("ac_1", "Yes")]);
        assert!(sub.validate(SystemType::Electrical).is_err());

        let sub = submission(&[("electrical_x", "Yes")]);
        assert!(sub.validate(SystemType::Electrical).is_err());
    }

    #[test]
    fn rejects_non_yes_no_status() {
        let sub = submission(&[("electrical_1", "maybe")]);
        assert!(sub.validate(SystemType::Electrical).is_err());
    }

    #[test]
    fn requires_header_fields() {
        let mut sub = submission(&[]);
        sub.date = String::new();
        assert!(sub.validate(SystemType::Electrical).is_err());
    }

    #[test]
    fn issue_count_ignores_remarks_fields() {
        let report = Report {
            id: 1,
            system_type: SystemType::Electrical,
            date: "2024-01-01".to_string(),
            shift: Shift::Morning,
            operator_name: "Sarfraz".to_string(),
            submitted_by: Some(1),
            reviewed_by: None,
            approved_by: None,
            status: ReportStatus::Pending,
            checklist_data: [
                ("electrical_1".to_string(), "No".to_string()),
                ("electrical_2".to_string(), "Yes".to_string()),
                ("electrical_2_remarks".to_string(), "fine".to_string()),
            ]
            .into_iter()
            .collect(),
            remarks: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(report.issue_count(), 1);
    }

    #[test]
    fn checkpoint_data_matches_declared_counts() {
        assert_eq!(SystemType::Electrical.checkpoint_count(), 10);
        assert_eq!(SystemType::Ac.checkpoint_count(), 14);
        assert_eq!(SystemType::Electrical.key_prefix(), "electrical");
        assert_eq!(SystemType::Ac.key_prefix(), "ac");
    }

    #[test]
    fn submission_deserializes_flattened_entries() {
        let sub: ChecklistSubmission = serde_json::from_str(
            r#"{
                "date": "2024-01-01",
                "shift": "Night",
                "operatorName": "Sarfraz",
                "electrical_1": "Yes",
                "electrical_1_remarks": "ok"
            }"#,
        )
        .unwrap();
        assert_eq!(sub.shift, Shift::Night);
        assert_eq!(sub.entries.len(), 2);
        assert_eq!(sub.entries["electrical_1"], "Yes");
    }
}
