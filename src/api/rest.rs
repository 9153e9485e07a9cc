use crate::config::{ApiConfig, SecurityConfig};
use crate::error::Error;
use crate::security::auth::AuthService;
use crate::services::reports::ReportService;
use anyhow::Result;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use log::info;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub mod auth_controller;
pub mod report_controller;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub report_service: Arc<ReportService>,
    pub security: SecurityConfig,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
}

impl ApiError {
    /// Malformed or missing request fields, detected at the boundary
    pub fn bad_request(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status: StatusCode::BAD_REQUEST.as_u16(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(_) | Error::Config(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::BAD_REQUEST.as_u16(),
            },
            Error::Authentication(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::UNAUTHORIZED.as_u16(),
            },
            Error::Authorization(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::FORBIDDEN.as_u16(),
            },
            Error::NotFound(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::NOT_FOUND.as_u16(),
            },
            Error::Upstream(_) | Error::Internal(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            },
        }
    }
}

/// Implement IntoResponse for ApiError
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(self);
        (status, body).into_response()
    }
}

pub struct RestApi {
    config: ApiConfig,
    state: AppState,
}

impl RestApi {
    pub fn new(
        config: &ApiConfig,
        auth_service: Arc<AuthService>,
        report_service: Arc<ReportService>,
        security: &SecurityConfig,
    ) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            state: AppState {
                auth_service,
                report_service,
                security: security.clone(),
            },
        })
    }

    pub async fn run(&self) -> Result<()> {
        // Create a CORS layer that allows all origins and preflight requests
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_credentials(false)
            .max_age(Duration::from_secs(3600));

        let app = Router::new()
            // Auth routes
            .route("/api/auth/login", post(auth_controller::login))
            .route("/api/auth/generate-otp", post(auth_controller::generate_otp))
            .route("/api/auth/verify-otp", post(auth_controller::verify_otp))
            // Report routes
            .route(
                "/api/reports/electrical",
                post(report_controller::submit_electrical),
            )
            .route("/api/reports/ac", post(report_controller::submit_ac))
            .route("/api/reports", get(report_controller::list_reports))
            .route("/api/reports/:id", get(report_controller::get_report))
            .route("/api/reports/:id", patch(report_controller::update_report))
            // Checklist catalog
            .route(
                "/api/checklists/:system_type",
                get(report_controller::get_checklist_catalog),
            )
            .with_state(self.state.clone())
            // Apply CORS middleware to all routes
            .layer(cors);

        let addr = self.config.address.clone() + ":" + &self.config.port.to_string();
        let addr: SocketAddr = addr.parse()?;

        info!("API server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;

        axum::Server::from_tcp(listener.into_std()?)?
            .serve(app.into_make_service())
            .await?;

        Ok(())
    }
}
