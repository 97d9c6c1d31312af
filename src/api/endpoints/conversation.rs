//! Conversation endpoint, dispatched by method.
//!
//! `GET /conversation?userKey=<k>` returns the stored history. `POST
//! /conversation` runs a full chat round and returns the updated history.
//! Unsupported methods get an empty 200 rather than a 405 — clients always
//! read the body as a (possibly empty) history array.

use axum::body::to_bytes;
use axum::extract::{Query, Request, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::chat::prompt;
use crate::db::repository;
use crate::models::ConversationTurn;
use crate::secrets::{fetch_credential, mask_value};

/// Upper bound on POST body size; a chat question is small.
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub user_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub user_key: String,
    pub chat_question: String,
}

/// Route any method on `/conversation`.
pub async fn dispatch(State(ctx): State<ApiContext>, req: Request) -> Response {
    let method = req.method().clone();
    if method == Method::GET {
        handle_get(ctx, req).await.into_response()
    } else if method == Method::POST {
        handle_post(ctx, req).await.into_response()
    } else {
        tracing::warn!(%method, "unsupported method on /conversation");
        Json(Vec::<ConversationTurn>::new()).into_response()
    }
}

async fn handle_get(
    ctx: ApiContext,
    req: Request,
) -> Result<Json<Vec<ConversationTurn>>, ApiError> {
    let Query(query) = Query::<HistoryQuery>::try_from_uri(req.uri())
        .map_err(|_| ApiError::BadRequest("Missing or invalid userKey".into()))?;
    tracing::debug!(user_key = %query.user_key, "history request");

    let history = {
        let conn = ctx.lock_db()?;
        repository::history_for_user(&conn, &query.user_key)?
    };
    Ok(Json(history))
}

/// One chat round: credential → history → prompt → completion → persist →
/// re-read → respond. No step recovers from a failure of the one before it.
async fn handle_post(
    ctx: ApiContext,
    req: Request,
) -> Result<Json<Vec<ConversationTurn>>, ApiError> {
    let bytes = to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Cannot read request body: {e}")))?;
    let ask: AskRequest = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))?;
    if ask.chat_question.trim().is_empty() {
        return Err(ApiError::BadRequest("chatQuestion cannot be empty".into()));
    }
    tracing::debug!(user_key = %ask.user_key, question = %ask.chat_question, "chat request");

    // Fetched on every request, never cached.
    let credential = fetch_credential(
        ctx.secrets.as_ref(),
        &ctx.credential.secret_name,
        &ctx.credential.secret_key,
    )?;
    tracing::debug!(credential = %mask_value(&credential), "credential fetched");

    let history = {
        let conn = ctx.lock_db()?;
        repository::history_for_user(&conn, &ask.user_key)?
    };
    let messages = prompt::build_messages(&history, &ask.chat_question);

    let answer = ctx.chat.complete(&credential, messages).await?;
    tracing::debug!(answer_chars = answer.len(), "chat answer received");

    {
        let conn = ctx.lock_db()?;
        repository::insert_turn(&conn, &ask.user_key, &ask.chat_question, &answer)?;
    }

    // Re-read so the response reflects the store's own ordering.
    let history = {
        let conn = ctx.lock_db()?;
        repository::history_for_user(&conn, &ask.user_key)?
    };
    Ok(Json(history))
}
