pub mod otp_models;
pub mod report_models;
pub mod user_models;
