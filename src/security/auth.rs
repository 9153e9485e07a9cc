use crate::config::SecurityConfig;
use crate::db::models::user_models::{
    LoginCredentials, OtpLoginRequest, OtpVerifyRequest, UserView,
};
use crate::db::repositories::otp_codes::OtpRepository;
use crate::db::repositories::users::UsersRepository;
use crate::error::Error;
use chrono::{Duration, Utc};
use rand::Rng;
use tracing::info;

/// Authentication service for the password and OTP login flows.
/// Both yield the same sanitized user view.
pub struct AuthService {
    users: UsersRepository,
    otp_codes: OtpRepository,
    config: SecurityConfig,
}

impl AuthService {
    pub fn new(users: UsersRepository, otp_codes: OtpRepository, config: &SecurityConfig) -> Self {
        Self {
            users,
            otp_codes,
            config: config.clone(),
        }
    }

    /// Login with userId/password/role. The lookup requires both the
    /// external id and the role to match, so a wrong role for a real
    /// account fails the same way as a wrong password.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<UserView, Error> {
        let user = self
            .users
            .get_by_user_id_and_role(&credentials.user_id, credentials.role)
            .await
            .ok_or_else(|| {
                Error::Authentication("Invalid credentials or role mismatch".to_string())
            })?;

        // Passwords are opaque strings compared verbatim (demo system)
        if user.password != credentials.password {
            return Err(Error::Authentication(
                "Invalid credentials or role mismatch".to_string(),
            ));
        }

        info!("User logged in: {}", user.user_id);
        Ok(UserView::from(&user))
    }

    /// Issue a 4-digit code for the user's mobile with a fixed validity
    /// window. The code is returned to the caller; whether it also goes
    /// out in the API response is the controller's decision.
    pub async fn generate_otp(&self, request: &OtpLoginRequest) -> Result<String, Error> {
        let user = self
            .users
            .get_by_user_id_and_role(&request.user_id, request.role)
            .await
            .ok_or_else(|| Error::NotFound("User not found or role mismatch".to_string()))?;

        let code = rand::thread_rng().gen_range(1000..=9999).to_string();
        let expires_at = Utc::now() + Duration::minutes(self.config.otp_ttl_minutes);

        self.otp_codes
            .create(&user.mobile, &code, expires_at)
            .await;

        // SMS delivery stand-in
        info!("OTP for {}: {}", user.mobile, code);

        Ok(code)
    }

    /// Consume an issued code. The user is re-resolved by (userId, role);
    /// the ledger itself is role-agnostic and keys only on mobile+code,
    /// so role consistency rests entirely on the two lookups.
    pub async fn verify_otp(&self, request: &OtpVerifyRequest) -> Result<UserView, Error> {
        let user = self
            .users
            .get_by_user_id_and_role(&request.user_id, request.role)
            .await
            .ok_or_else(|| Error::NotFound("User not found or role mismatch".to_string()))?;

        let valid = self
            .otp_codes
            .verify(&user.mobile, &request.code, Utc::now())
            .await;
        if !valid {
            return Err(Error::Authentication("Invalid or expired OTP".to_string()));
        }

        info!("User logged in via OTP: {}", user.user_id);
        Ok(UserView::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::user_models::{NewUser, UserRole};

    async fn service() -> AuthService {
        let users = UsersRepository::new();
        users
            .create(NewUser {
                user_id: "sarfraz".to_string(),
                mobile: "6006807212".to_string(),
                password: "1234".to_string(),
                role: UserRole::Operator,
                name: "Sarfraz".to_string(),
            })
            .await;
        AuthService::new(users, OtpRepository::new(), &SecurityConfig::default())
    }

    fn credentials(user_id: &str, password: &str, role: UserRole) -> LoginCredentials {
        LoginCredentials {
            user_id: user_id.to_string(),
            password: password.to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn password_login_returns_sanitized_user() {
        let auth = service().await;

        let user = auth
            .login(&credentials("sarfraz", "1234", UserRole::Operator))
            .await
            .unwrap();
        assert_eq!(user.user_id, "sarfraz");
        assert_eq!(user.role, UserRole::Operator);
        // serialized view never carries the password
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
    }

    #[tokio::test]
    async fn password_login_rejects_bad_password_and_role_mismatch() {
        let auth = service().await;

        assert!(auth
            .login(&credentials("sarfraz", "wrong", UserRole::Operator))
            .await
            .is_err());
        // real account, wrong role
        assert!(auth
            .login(&credentials("sarfraz", "1234", UserRole::Manager))
            .await
            .is_err());
        // unknown account
        assert!(auth
            .login(&credentials("nobody", "1234", UserRole::Operator))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn otp_flow_issues_and_verifies_once() {
        let auth = service().await;
        let request = OtpLoginRequest {
            user_id: "sarfraz".to_string(),
            role: UserRole::Operator,
        };

        let code = auth.generate_otp(&request).await.unwrap();
        assert_eq!(code.len(), 4);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        let verify = OtpVerifyRequest {
            user_id: "sarfraz".to_string(),
            code: code.clone(),
            role: UserRole::Operator,
        };
        let user = auth.verify_otp(&verify).await.unwrap();
        assert_eq!(user.user_id, "sarfraz");

        // single use: the same code cannot be consumed twice
        assert!(auth.verify_otp(&verify).await.is_err());
    }

    #[tokio::test]
    async fn otp_generation_fails_for_unknown_user_or_role() {
        let auth = service().await;

        let unknown = OtpLoginRequest {
            user_id: "nobody".to_string(),
            role: UserRole::Operator,
        };
        assert!(auth.generate_otp(&unknown).await.is_err());

        let wrong_role = OtpLoginRequest {
            user_id: "sarfraz".to_string(),
            role: UserRole::Supervisor,
        };
        assert!(auth.generate_otp(&wrong_role).await.is_err());
    }

    #[tokio::test]
    async fn otp_verify_rejects_wrong_code_and_role_switch() {
        let auth = service().await;
        let request = OtpLoginRequest {
            user_id: "sarfraz".to_string(),
            role: UserRole::Operator,
        };
        let code = auth.generate_otp(&request).await.unwrap();

        let wrong_code = OtpVerifyRequest {
            user_id: "sarfraz".to_string(),
            code: "0000".to_string(),
            role: UserRole::Operator,
        };
        // 0000 is outside the issued range, so it can never collide
        assert!(auth.verify_otp(&wrong_code).await.is_err());

        // role switched between generation and verification
        let switched = OtpVerifyRequest {
            user_id: "sarfraz".to_string(),
            code,
            role: UserRole::Manager,
        };
        assert!(auth.verify_otp(&switched).await.is_err());
    }
}
