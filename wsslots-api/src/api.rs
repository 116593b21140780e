//! `/api.php` handlers.

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::params::{EditSlotsParams, PageRef};
use crate::permissions::Action;
use axum::{
    extract::{Form, Query, State, rejection::FormRejection},
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};
use wsslots_edit::{EditSuccess, SlotEditor};
use wsslots_types::ActorId;

/// Header carrying the name of the authenticated user.
pub const USER_HEADER: &str = "x-wiki-user";

type Params = HashMap<String, String>;

/// The requesting actor; no header or a blank one is anonymous.
fn actor_from(headers: &HeaderMap) -> ActorId {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ActorId::user)
        .unwrap_or(ActorId::Anonymous)
}

fn action_of(params: &Params) -> ApiResult<String> {
    params
        .get("action")
        .cloned()
        .ok_or_else(|| ApiError::missing("action"))
}

pub(crate) async fn api_get(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<Params>,
) -> Response {
    let action = match action_of(&params) {
        Ok(action) => action,
        Err(e) => return e.into_response(),
    };
    let actor = actor_from(&headers);
    let result = match action.as_str() {
        "editslots" => Err(ApiError::MustBePosted(action.clone())),
        "query" => query_tokens(&state, &actor, &params),
        other => Err(ApiError::UnknownAction(other.to_string())),
    };
    respond(result)
}

pub(crate) async fn api_post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(mut params): Query<Params>,
    form: Result<Form<Params>, FormRejection>,
) -> Response {
    match form {
        Ok(Form(body)) => params.extend(body),
        Err(rejection) => debug!("Ignoring request body: {}", rejection),
    }

    let action = match action_of(&params) {
        Ok(action) => action,
        Err(e) => return e.into_response(),
    };
    let actor = actor_from(&headers);
    let result = match action.as_str() {
        "editslots" => edit_slots(state, actor, params).await,
        "query" => query_tokens(&state, &actor, &params),
        other => Err(ApiError::UnknownAction(other.to_string())),
    };
    respond(result)
}

fn respond(result: ApiResult<Value>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `action=query&meta=tokens`: the caller's edit token.
fn query_tokens(state: &AppState, actor: &ActorId, params: &Params) -> ApiResult<Value> {
    match params.get("meta").map(String::as_str) {
        Some("tokens") => Ok(json!({
            "batchcomplete": true,
            "query": {
                "tokens": {
                    "csrftoken": state.tokens.token_for(actor),
                }
            }
        })),
        other => Err(ApiError::BadValue {
            param: "meta",
            value: other.unwrap_or_default().to_string(),
        }),
    }
}

/// `action=editslots`: token check, parameter parsing, then the edit itself
/// on the blocking pool.
async fn edit_slots(state: Arc<AppState>, actor: ActorId, params: Params) -> ApiResult<Value> {
    let token = params.get("token").ok_or_else(|| ApiError::missing("token"))?;
    if !state.tokens.validate(&actor, token) {
        return Err(ApiError::BadToken);
    }
    let parsed = EditSlotsParams::parse(&params, state.registry.as_ref())?;

    let success = tokio::task::spawn_blocking(move || perform_edit(&state, actor, parsed))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(success_body(&success))
}

fn perform_edit(state: &AppState, actor: ActorId, parsed: EditSlotsParams) -> ApiResult<EditSuccess> {
    let page = match &parsed.page {
        PageRef::Title(title) => state.store.page_by_title(title)?,
        PageRef::Id(id) => state
            .store
            .page_by_id(*id)?
            .ok_or_else(|| ApiError::NoSuchPageId(id.to_string()))?,
    };
    state
        .permissions
        .check(&actor, &page.title, Action::for_page(page.exists()))?;

    let editor = SlotEditor::new(
        state.store.as_ref(),
        state.watch.as_ref(),
        state.registry.as_ref(),
    );
    editor
        .edit_slots(parsed.into_request(actor, page))
        .map_err(|e| {
            error!(
                "Editing slot failed while performing edit through the \"editslots\" API: {}",
                e
            );
            ApiError::from(e)
        })
}

fn success_body(success: &EditSuccess) -> Value {
    let mut result = json!({
        "result": "success",
        "pageid": success.page_id.get(),
        "newrevid": success.revision_id.to_string(),
    });
    if let Some(parent) = success.parent {
        result["oldrevid"] = json!(parent.to_string());
    }
    if success.created {
        result["new"] = json!(true);
    }
    json!({ "editslots": result })
}
