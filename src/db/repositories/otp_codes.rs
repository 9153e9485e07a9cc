use crate::db::models::otp_models::OtpCode;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

struct OtpInner {
    // keyed by (mobile, code); re-issue overwrites
    codes: HashMap<(String, String), OtpCode>,
    next_id: i64,
}

/// Ledger of issued one-time codes. Stale entries are never deleted,
/// they just become permanently unusable.
#[derive(Clone)]
pub struct OtpRepository {
    inner: Arc<Mutex<OtpInner>>,
}

impl OtpRepository {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(OtpInner {
                codes: HashMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Store a freshly issued code, overwriting any earlier entry for
    /// the same (mobile, code) pair
    pub async fn create(&self, mobile: &str, code: &str, expires_at: DateTime<Utc>) -> OtpCode {
        let mut inner = self.inner.lock().await;

        let id = inner.next_id;
        inner.next_id += 1;

        let otp = OtpCode {
            id,
            mobile: mobile.to_string(),
            code: code.to_string(),
            expires_at,
            verified: false,
            created_at: Utc::now(),
        };

        debug!("Issued OTP for mobile {}", mobile);
        inner
            .codes
            .insert((mobile.to_string(), code.to_string()), otp.clone());
        otp
    }

    /// Consume a code. Returns false if the entry is absent, already
    /// verified, or expired at `now`; otherwise marks it verified and
    /// returns true. The check and the flip happen under one lock so
    /// two concurrent verifications cannot both succeed.
    pub async fn verify(&self, mobile: &str, code: &str, now: DateTime<Utc>) -> bool {
        let mut inner = self.inner.lock().await;

        let otp = match inner
            .codes
            .get_mut(&(mobile.to_string(), code.to_string()))
        {
            Some(otp) => otp,
            None => return false,
        };

        if otp.verified {
            return false;
        }
        if now > otp.expires_at {
            return false;
        }

        otp.verified = true;
        true
    }
}

impl Default for OtpRepository {
    fn default() -> Self {
        Self::new()
    }
}
