use crate::core::lookup::LookupService;
use crate::core::{RecordSource, ResultSummary};
use crate::utils::error::{ErrorCategory, PortalError};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub school_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResultSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        match self.category() {
            ErrorCategory::Input => tracing::info!("Rejected lookup: {}", self),
            ErrorCategory::Lookup => tracing::info!("{}", self),
            ErrorCategory::Authorization => tracing::warn!("{}", self),
            ErrorCategory::Upstream => {
                tracing::error!("❌ Upstream failure: {}", self);
                tracing::error!("💡 Suggestion: {}", self.recovery_suggestion());
            }
            ErrorCategory::Configuration => {
                tracing::error!("❌ Configuration defect: {}", self);
                tracing::error!("💡 Suggestion: {}", self.recovery_suggestion());
            }
        }

        let body = ApiResponse {
            success: false,
            data: None,
            message: Some(self.user_friendly_message().to_string()),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// GET /api/student/{roll_number}?school_code=...
pub async fn get_student<S: RecordSource + 'static>(
    State(service): State<Arc<LookupService<S>>>,
    Path(roll_number): Path<String>,
    query: Result<Query<StudentQuery>, QueryRejection>,
) -> Result<Json<ApiResponse>, PortalError> {
    // 查詢字串無法解析時（例如重複的 school_code）同樣回傳 JSON 格式的 400
    let Query(query) = query.map_err(|rejection| PortalError::InvalidInput {
        message: format!("unreadable query string: {}", rejection.body_text()),
    })?;
    let school_code = query.school_code.unwrap_or_default();
    let summary = service.lookup(&roll_number, &school_code).await?;

    tracing::info!(
        "✅ Served result for roll number '{}' ({} {})",
        roll_number,
        summary.grade,
        summary.result
    );

    Ok(Json(ApiResponse {
        success: true,
        data: Some(summary),
        message: None,
    }))
}

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// Unmatched paths still answer with the `{success:false}` envelope.
pub async fn fallback(uri: Uri) -> Response {
    if uri.path().trim_end_matches('/') == "/api/student" {
        return PortalError::InvalidInput {
            message: "roll number missing from path".to_string(),
        }
        .into_response();
    }

    tracing::debug!("No route for {}", uri.path());
    let body = ApiResponse {
        success: false,
        data: None,
        message: Some("Route not found".to_string()),
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

pub fn router<S: RecordSource + 'static>(service: Arc<LookupService<S>>) -> Router {
    Router::new()
        .route("/api/student/{roll_number}", get(get_student::<S>))
        .route("/health", get(health))
        .fallback(fallback)
        .with_state(service)
}

/// 在指定的 listener 上提供服務，收到 Ctrl-C 後結束
pub async fn serve(listener: tokio::net::TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_err() {
                // 無法註冊訊號時持續服務
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received");
        })
        .await
}
