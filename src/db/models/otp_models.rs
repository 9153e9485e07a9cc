use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One-time code bound to a mobile number.
/// Entries are keyed by (mobile, code); a later issuance for the same
/// pair overwrites the earlier one. A code is consumed at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpCode {
    pub id: i64,
    pub mobile: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}
