use crate::db::models::user_models::{NewUser, UserRole};
use crate::db::repositories::otp_codes::OtpRepository;
use crate::db::repositories::reports::ReportsRepository;
use crate::db::repositories::users::UsersRepository;
use log::info;

pub mod models;
pub mod repositories;

/// Owns the in-memory stores and their id counters. Constructed once at
/// process start; volatile by design, so there is no teardown.
#[derive(Clone)]
pub struct StoreService {
    pub users: UsersRepository,
    pub otp_codes: OtpRepository,
    pub reports: ReportsRepository,
}

impl StoreService {
    /// Create the stores and seed the default accounts
    pub async fn new() -> Self {
        let service = Self {
            users: UsersRepository::new(),
            otp_codes: OtpRepository::new(),
            reports: ReportsRepository::new(),
        };
        service.seed_users().await;
        service
    }

    async fn seed_users(&self) {
        info!("Seeding default users");

        self.users
            .create(NewUser {
                user_id: "zaffar".to_string(),
                mobile: "9541941695".to_string(),
                password: "admin123".to_string(),
                role: UserRole::Manager,
                name: "Zaffar".to_string(),
            })
            .await;
        self.users
            .create(NewUser {
                user_id: "sarfraz".to_string(),
                mobile: "6006807212".to_string(),
                password: "1234".to_string(),
                role: UserRole::Operator,
                name: "Sarfraz".to_string(),
            })
            .await;
        self.users
            .create(NewUser {
                user_id: "hilal".to_string(),
                mobile: "9103309765".to_string(),
                password: "5678".to_string(),
                role: UserRole::Supervisor,
                name: "Hilal".to_string(),
            })
            .await;
    }
}
