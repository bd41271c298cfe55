use axum::{Json, Router, body::Bytes, extract::{State, rejection::BytesRejection}, routing::{get, post}};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::GenerationError,
    models::{GenerationRequest, GenerationResponse, ShortScript},
    openai::CompletionService,
    prompts::{build_user_prompt, SYSTEM_PROMPT},
};

#[derive(Clone)]
pub struct AppState {
    pub completions: Arc<dyn CompletionService>,
    pub strict_output: bool,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/generate-shorts", post(generate_shorts))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "shortskit" }))
}

#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn generate_shorts(
    State(state): State<AppState>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<Json<GenerationResponse>, GenerationError> {
    // Parsed as JSON regardless of Content-Type.
    let payload = payload
        .map_err(|e| GenerationError::Internal(format!("unreadable request body: {}", e.body_text())))?;
    let body: GenerationRequest = serde_json::from_slice(&payload)
        .map_err(|e| GenerationError::Internal(format!("request body is not valid JSON: {e}")))?;

    let script = body
        .trimmed_script()
        .ok_or_else(|| GenerationError::InvalidInput("script is missing or blank".to_string()))?;
    let count = body.effective_count();
    let (platform, tone) = (body.platform(), body.tone());

    info!("🚀 Generating {} shorts for {} ({} tone, {} chars of script)", count, platform, tone, script.chars().count());

    // The prompt carries the script as submitted, only the emptiness check trims it.
    let raw_script = body.script.as_deref().unwrap_or(script);
    let user_prompt = build_user_prompt(raw_script, &platform, &tone, count);
    let completion = state.completions.complete(SYSTEM_PROMPT, &user_prompt).await?;

    let shorts = parse_completion(&completion, state.strict_output)?;
    match &shorts {
        Value::Array(items) => info!("✅ Generated {} shorts (requested {})", items.len(), count),
        _ => info!("✅ Generated a non-array result (requested {})", count),
    }
    Ok(Json(GenerationResponse { shorts }))
}

/// Parses completion text into the `shorts` payload.
///
/// Permissive mode returns any JSON value untouched. Strict mode requires a
/// list of well-formed [`ShortScript`]s.
pub fn parse_completion(raw: &str, strict: bool) -> Result<Value, GenerationError> {
    let parse_error = |reason: String| GenerationError::ResponseParse { reason, raw: raw.to_string() };

    let value: Value = serde_json::from_str(strip_json_fences(raw)).map_err(|e| parse_error(e.to_string()))?;
    if !strict {
        return Ok(value);
    }

    let shorts: Vec<ShortScript> = serde_json::from_value(value).map_err(|e| parse_error(e.to_string()))?;
    for (index, short) in shorts.iter().enumerate() {
        if let Some(violation) = short.shape_violation() {
            return Err(parse_error(format!("short #{index}: {violation}")));
        }
    }
    serde_json::to_value(shorts).map_err(|e| GenerationError::Internal(e.to_string()))
}

/// Strips a surrounding Markdown code fence, including any info string
/// (`json`, `JSON`, `jsonc`, ...) on the opening line.
fn strip_json_fences(text: &str) -> &str {
    let Some(rest) = text.trim().strip_prefix("```") else {
        return text;
    };
    let inner = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    let inner = inner.trim_end();
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
