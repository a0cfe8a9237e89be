use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method, StatusCode,
    },
    routing::post,
    Json, Router,
};
use log::{error, info};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    config::Config,
    models::{ErrorBody, OtpRequest, SuccessBody},
    services::{
        email::SmtpTransport,
        otp::{OtpService, OtpServiceError},
    },
};

const DELIVERY_FAILED: &str = "Failed to send OTP email";

#[derive(Clone)]
pub struct AppState {
    pub otp_service: Arc<OtpService>,
}

pub async fn run(config: Config) -> std::io::Result<()> {
    let transport = Arc::new(SmtpTransport::new(config.smtp.clone()));
    let state = AppState {
        otp_service: Arc::new(OtpService::new(transport, config.smtp.from_address.clone())),
    };

    let listener = tokio::net::TcpListener::bind(config.listen_addr.as_str()).await?;
    info!(
        "Listening on {}, relaying through {}:{}",
        config.listen_addr, config.smtp.host, config.smtp.port
    );
    axum::serve(listener, router(state)).await
}

/// Pre-flight requests are answered by the CORS layer before any handler runs.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ]);

    Router::new()
        .route("/send-otp", post(send_otp))
        .layer(cors)
        .with_state(state)
}

fn delivery_failure(details: String) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: DELIVERY_FAILED.to_string(),
            details: Some(details),
        }),
    )
}

impl From<OtpServiceError> for (StatusCode, Json<ErrorBody>) {
    fn from(error: OtpServiceError) -> Self {
        if error.is_validation() {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody { error: error.to_string(), details: None }),
            );
        }
        error!("Error sending OTP email: {}", error);
        delivery_failure(error.to_string())
    }
}

/// The body is read as JSON whatever its content type; browsers posting a
/// string body send `text/plain`.
pub async fn send_otp(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SuccessBody>, (StatusCode, Json<ErrorBody>)> {
    let value: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        error!("Unreadable OTP request body: {}", e);
        delivery_failure(e.to_string())
    })?;
    let request = OtpRequest::from_json(&value);
    state.otp_service.send_otp(&request).await?;
    Ok(Json(SuccessBody::sent()))
}
