//! Route handlers

use crate::api::error::ApiError;
use crate::api::schemas::{
    EchoQuery, EchoResponse, GenerateCourseRequest, GenerateCourseResponse, GenerateLessonRequest,
    GenerateLessonResponse, HealthResponse,
};
use crate::api::AppState;
use crate::usecases::{GenerateCourseContent, GenerateLesson};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use tracing::error;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn ai_echo(State(state): State<Arc<AppState>>, Query(query): Query<EchoQuery>) -> Json<EchoResponse> {
    let result = state.echo.run_text(&query.text).await;
    Json(EchoResponse { result })
}

pub async fn generate_course(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateCourseRequest>,
) -> (StatusCode, Json<GenerateCourseResponse>) {
    let model = request
        .model
        .clone()
        .unwrap_or_else(|| state.settings.llm.model.clone());
    let use_case = GenerateCourseContent::new(state.llm.clone(), model).with_review(state.settings.review);

    match use_case.execute(&request.topic).await {
        Ok(course) => (StatusCode::OK, Json(GenerateCourseResponse::ok(course))),
        Err(e) => {
            error!("Error generating course: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(GenerateCourseResponse::failed(e.to_string())),
            )
        }
    }
}

pub async fn generate_lesson(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateLessonRequest>,
) -> Result<Json<GenerateLessonResponse>, ApiError> {
    let use_case = GenerateLesson::new(state.llm.clone(), state.settings.llm.model.clone())
        .with_temperature(state.settings.llm.temperature);

    let response = use_case.execute(request).await.map_err(|e| {
        error!("Error generating lesson: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(response))
}
