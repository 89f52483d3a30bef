use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    Json as RequestJson,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::api::auth::UserContext;
use crate::logic::represent::{
    self, OperationRepr, ProcessDetail, ProcessSummary, RenderContext,
};
use crate::logic::resolve::{self, OpNumber};
use crate::logic::validate::{self, ValidationErrors};
use crate::model::{Id, Operation, Process};
use crate::store::traits::{Store, StoreError, UpsertOutcome};

pub type AppState<S> = Arc<S>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

fn validation_failed(errors: ValidationErrors) -> Response {
    (StatusCode::BAD_REQUEST, Json(errors)).into_response()
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new(message))).into_response()
}

fn internal_error(e: &anyhow::Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(&e.to_string())),
    )
        .into_response()
}

/// Map a rejected store write onto the client-facing failure. Uniqueness
/// violations are client-fixable field errors; a vanished parent process is
/// reported as the parent resource being gone.
fn write_rejected(e: anyhow::Error) -> Response {
    match e.downcast_ref::<StoreError>() {
        Some(StoreError::DuplicateOpNumber(_)) => validation_failed(ValidationErrors::single(
            "op_number",
            "This field must be unique.",
        )),
        Some(StoreError::ProcessNotFound(_)) => not_found("Process not found"),
        None => internal_error(&e),
    }
}

/// Resolve the payload's `process` hyperlink and require it to address the
/// parent process from the request path. Any failure is a validation error on
/// the `process` field: a link that does not resolve is a bad field value
/// submitted by the client, never a 404.
async fn check_process_link<S: Store>(
    store: &S,
    link: &str,
    parent_id: &Id,
) -> Result<(), Response> {
    let linked_id = match represent::parse_process_link(link) {
        Some(id) => id,
        None => {
            return Err(validation_failed(ValidationErrors::single(
                "process",
                "Invalid hyperlink - no URL match.",
            )))
        }
    };
    match resolve::resolve_process(store, &linked_id).await {
        Ok(Some(process)) if process.id == *parent_id => Ok(()),
        Ok(Some(_)) => Err(validation_failed(ValidationErrors::single(
            "process",
            "Must reference the process addressed by the URL.",
        ))),
        Ok(None) => Err(validation_failed(ValidationErrors::single(
            "process",
            "Invalid hyperlink - object does not exist.",
        ))),
        Err(e) => Err(internal_error(&e)),
    }
}

// ---- Process handlers ----

pub async fn list_processes<S: Store>(
    State(store): State<AppState<S>>,
    _user: UserContext,
) -> Result<Json<Vec<ProcessSummary>>, Response> {
    match store.list_processes().await {
        Ok(processes) => Ok(Json(
            processes.iter().map(represent::process_summary).collect(),
        )),
        Err(e) => Err(internal_error(&e)),
    }
}

pub async fn create_process<S: Store>(
    State(store): State<AppState<S>>,
    ctx: RenderContext,
    user: UserContext,
    RequestJson(payload): RequestJson<Value>,
) -> Result<(StatusCode, Json<ProcessDetail>), Response> {
    let fields = match validate::process_payload(&payload) {
        Ok(fields) => fields,
        Err(errors) => return Err(validation_failed(errors)),
    };
    let process = Process::new(fields.name, fields.description);
    if let Err(e) = store.insert_process(process.clone()).await {
        return Err(internal_error(&e));
    }
    log::info!("user {} created process {}", user.user_id, process.id);
    Ok((
        StatusCode::CREATED,
        Json(represent::process_detail(&process, &[], &ctx)),
    ))
}

pub async fn get_process<S: Store>(
    State(store): State<AppState<S>>,
    ctx: RenderContext,
    _user: UserContext,
    Path(process_id): Path<Id>,
) -> Result<Json<ProcessDetail>, Response> {
    let process = match resolve::resolve_process(store.as_ref(), &process_id).await {
        Ok(Some(process)) => process,
        Ok(None) => return Err(not_found("Process not found")),
        Err(e) => return Err(internal_error(&e)),
    };
    match store.list_operations_for_process(&process.id).await {
        Ok(operations) => Ok(Json(represent::process_detail(&process, &operations, &ctx))),
        Err(e) => Err(internal_error(&e)),
    }
}

pub async fn replace_process<S: Store>(
    State(store): State<AppState<S>>,
    ctx: RenderContext,
    user: UserContext,
    Path(process_id): Path<Id>,
    RequestJson(payload): RequestJson<Value>,
) -> Result<(StatusCode, Json<ProcessDetail>), Response> {
    let fields = match validate::process_payload(&payload) {
        Ok(fields) => fields,
        Err(errors) => return Err(validation_failed(errors)),
    };
    // One storage call decides create-vs-update; the path id is the key.
    let process = Process::with_id(process_id, fields.name, fields.description);
    let outcome = match store.upsert_process(process.clone()).await {
        Ok(outcome) => outcome,
        Err(e) => return Err(internal_error(&e)),
    };
    let operations = match store.list_operations_for_process(&process.id).await {
        Ok(operations) => operations,
        Err(e) => return Err(internal_error(&e)),
    };
    let status = match outcome {
        UpsertOutcome::Created => StatusCode::CREATED,
        UpsertOutcome::Updated => StatusCode::OK,
    };
    log::info!(
        "user {} replaced process {} ({:?})",
        user.user_id,
        process.id,
        outcome
    );
    Ok((
        status,
        Json(represent::process_detail(&process, &operations, &ctx)),
    ))
}

pub async fn delete_process<S: Store>(
    State(store): State<AppState<S>>,
    user: UserContext,
    Path(process_id): Path<Id>,
) -> Result<StatusCode, Response> {
    match store.delete_process(&process_id).await {
        Ok(true) => {
            log::info!("user {} deleted process {}", user.user_id, process_id);
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(not_found("Process not found")),
        Err(e) => Err(internal_error(&e)),
    }
}

// ---- Operation handlers ----

pub async fn list_operations<S: Store>(
    State(store): State<AppState<S>>,
    ctx: RenderContext,
    _user: UserContext,
    Path(process_id): Path<Id>,
) -> Result<Json<Vec<OperationRepr>>, Response> {
    let process = match resolve::resolve_process(store.as_ref(), &process_id).await {
        Ok(Some(process)) => process,
        Ok(None) => return Err(not_found("Process not found")),
        Err(e) => return Err(internal_error(&e)),
    };
    match store.list_operations_for_process(&process.id).await {
        Ok(operations) => Ok(Json(
            operations
                .iter()
                .map(|op| represent::operation_repr(op, &ctx))
                .collect(),
        )),
        Err(e) => Err(internal_error(&e)),
    }
}

pub async fn create_operation<S: Store>(
    State(store): State<AppState<S>>,
    ctx: RenderContext,
    user: UserContext,
    Path(process_id): Path<Id>,
    RequestJson(payload): RequestJson<Value>,
) -> Result<(StatusCode, Json<OperationRepr>), Response> {
    let parent = match resolve::resolve_process(store.as_ref(), &process_id).await {
        Ok(Some(process)) => process,
        Ok(None) => return Err(not_found("Process not found")),
        Err(e) => return Err(internal_error(&e)),
    };
    let fields = match validate::operation_payload(&payload) {
        Ok(fields) => fields,
        Err(errors) => return Err(validation_failed(errors)),
    };
    check_process_link(store.as_ref(), &fields.process_link, &parent.id).await?;

    let operation = Operation::new(
        fields.op_number,
        fields.name,
        fields.description,
        fields.cycle_time,
        parent.id,
    );
    if let Err(e) = store.insert_operation(operation.clone()).await {
        return Err(write_rejected(e));
    }
    log::info!(
        "user {} created operation {} under process {}",
        user.user_id,
        operation.op_number,
        operation.process_id
    );
    Ok((
        StatusCode::CREATED,
        Json(represent::operation_repr(&operation, &ctx)),
    ))
}

pub async fn get_operation<S: Store>(
    State(store): State<AppState<S>>,
    ctx: RenderContext,
    _user: UserContext,
    Path((process_id, op_number)): Path<(Id, String)>,
) -> Result<Json<OperationRepr>, Response> {
    let op_number = match OpNumber::parse(&op_number) {
        Ok(op_number) => op_number,
        Err(errors) => return Err(validation_failed(errors)),
    };
    match resolve::resolve_operation(store.as_ref(), &process_id, op_number).await {
        Ok(Some(operation)) => Ok(Json(represent::operation_repr(&operation, &ctx))),
        Ok(None) => Err(not_found("Operation not found")),
        Err(e) => Err(internal_error(&e)),
    }
}

pub async fn replace_operation<S: Store>(
    State(store): State<AppState<S>>,
    ctx: RenderContext,
    user: UserContext,
    Path((process_id, op_number)): Path<(Id, String)>,
    RequestJson(payload): RequestJson<Value>,
) -> Result<(StatusCode, Json<OperationRepr>), Response> {
    let op_number = match OpNumber::parse(&op_number) {
        Ok(op_number) => op_number,
        Err(errors) => return Err(validation_failed(errors)),
    };
    let parent = match resolve::resolve_process(store.as_ref(), &process_id).await {
        Ok(Some(process)) => process,
        Ok(None) => return Err(not_found("Process not found")),
        Err(e) => return Err(internal_error(&e)),
    };
    let fields = match validate::operation_payload(&payload) {
        Ok(fields) => fields,
        Err(errors) => return Err(validation_failed(errors)),
    };
    // The path is the identity; the payload may repeat it but not change it.
    if fields.op_number != op_number.0 {
        return Err(validation_failed(ValidationErrors::single(
            "op_number",
            "Does not match the op_number in the URL.",
        )));
    }
    check_process_link(store.as_ref(), &fields.process_link, &parent.id).await?;

    // One storage call decides create-vs-update, keyed by (process, op_number).
    // An updated operation keeps its surrogate id; the fresh one here is only
    // used when the store takes the create branch.
    let candidate = Operation::new(
        op_number.0,
        fields.name,
        fields.description,
        fields.cycle_time,
        parent.id,
    );
    let (outcome, operation) = match store.upsert_operation(candidate).await {
        Ok(result) => result,
        Err(e) => return Err(write_rejected(e)),
    };
    let status = match outcome {
        UpsertOutcome::Created => StatusCode::CREATED,
        UpsertOutcome::Updated => StatusCode::OK,
    };
    log::info!(
        "user {} replaced operation {} under process {} ({:?})",
        user.user_id,
        op_number.0,
        process_id,
        outcome
    );
    Ok((status, Json(represent::operation_repr(&operation, &ctx))))
}

pub async fn delete_operation<S: Store>(
    State(store): State<AppState<S>>,
    user: UserContext,
    Path((process_id, op_number)): Path<(Id, String)>,
) -> Result<StatusCode, Response> {
    let op_number = match OpNumber::parse(&op_number) {
        Ok(op_number) => op_number,
        Err(errors) => return Err(validation_failed(errors)),
    };
    match store.delete_operation(&process_id, op_number.0).await {
        Ok(true) => {
            log::info!(
                "user {} deleted operation {} under process {}",
                user.user_id,
                op_number.0,
                process_id
            );
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(not_found("Operation not found")),
        Err(e) => Err(internal_error(&e)),
    }
}

// ---- Documentation ----

pub async fn get_api_docs<S: Store>(_state: State<AppState<S>>) -> Html<String> {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Shopfloor Routing API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui.css" />
    <style>
        html {
            box-sizing: border-box;
            overflow: -moz-scrollbars-vertical;
            overflow-y: scroll;
        }
        *, *:before, *:after {
            box-sizing: inherit;
        }
        body {
            margin: 0;
            background: #fafafa;
        }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            const ui = SwaggerUIBundle({
                url: '/docs/openapi.json',
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                plugins: [
                    SwaggerUIBundle.plugins.DownloadUrl
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
"#;
    Html(html.to_string())
}

pub async fn get_openapi_spec<S: Store>(_state: State<AppState<S>>) -> Json<Value> {
    let process_schema = serde_json::json!({
        "type": "object",
        "properties": {
            "id": {"type": "string", "readOnly": true},
            "name": {"type": "string"},
            "description": {"type": "string"},
            "operations": {
                "type": "array",
                "items": {"type": "string", "format": "uri"},
                "readOnly": true
            }
        }
    });
    let operation_schema = serde_json::json!({
        "type": "object",
        "required": ["op_number", "name", "description", "cycle_time", "process"],
        "properties": {
            "id": {"type": "string", "readOnly": true},
            "op_number": {"type": "integer", "minimum": 0},
            "name": {"type": "string"},
            "description": {"type": "string"},
            "cycle_time": {"type": "string", "example": "0:01:30"},
            "process": {"type": "string", "format": "uri"}
        }
    });
    let validation_error = serde_json::json!({
        "type": "object",
        "additionalProperties": {"type": "array", "items": {"type": "string"}}
    });

    let spec = serde_json::json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Shopfloor Routing API",
            "version": "0.1.0",
            "description": "CRUD API for manufacturing processes and their operations. Operations are addressed by parent process id plus op_number; relations are rendered as hyperlinks."
        },
        "servers": [{"url": "/", "description": "Current server"}],
        "tags": [
            {"name": "Documentation", "description": "API documentation endpoints"},
            {"name": "Processes", "description": "Manufacturing process management"},
            {"name": "Operations", "description": "Operations nested under a process"}
        ],
        "components": {
            "schemas": {
                "Process": process_schema,
                "Operation": operation_schema,
                "ValidationError": validation_error
            }
        },
        "paths": {
            "/health": {
                "get": {
                    "tags": ["Documentation"],
                    "summary": "Health check",
                    "responses": {"200": {"description": "Service is healthy"}}
                }
            },
            "/docs": {
                "get": {
                    "tags": ["Documentation"],
                    "summary": "Interactive API documentation",
                    "responses": {"200": {"description": "Swagger UI page"}}
                }
            },
            "/docs/openapi.json": {
                "get": {
                    "tags": ["Documentation"],
                    "summary": "OpenAPI specification",
                    "responses": {"200": {"description": "This document"}}
                }
            },
            "/processes": {
                "get": {
                    "tags": ["Processes"],
                    "summary": "List processes",
                    "responses": {"200": {"description": "All processes"}}
                },
                "post": {
                    "tags": ["Processes"],
                    "summary": "Create a process",
                    "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Process"}}}},
                    "responses": {
                        "201": {"description": "Process created"},
                        "400": {"description": "Validation failed", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ValidationError"}}}}
                    }
                }
            },
            "/processes/{process_id}": {
                "parameters": [{"name": "process_id", "in": "path", "required": true, "schema": {"type": "string"}}],
                "get": {
                    "tags": ["Processes"],
                    "summary": "Retrieve a process with links to its operations",
                    "responses": {"200": {"description": "Process detail"}, "404": {"description": "Unknown process"}}
                },
                "put": {
                    "tags": ["Processes"],
                    "summary": "Replace a process, creating it when absent",
                    "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Process"}}}},
                    "responses": {
                        "200": {"description": "Process updated"},
                        "201": {"description": "Process created at this id"},
                        "400": {"description": "Validation failed"}
                    }
                },
                "delete": {
                    "tags": ["Processes"],
                    "summary": "Delete a process and all of its operations",
                    "responses": {"204": {"description": "Deleted"}, "404": {"description": "Unknown process"}}
                }
            },
            "/processes/{process_id}/operations": {
                "parameters": [{"name": "process_id", "in": "path", "required": true, "schema": {"type": "string"}}],
                "get": {
                    "tags": ["Operations"],
                    "summary": "List the operations of a process, ordered by op_number",
                    "responses": {"200": {"description": "Operations of the process"}, "404": {"description": "Unknown process"}}
                },
                "post": {
                    "tags": ["Operations"],
                    "summary": "Create an operation under a process",
                    "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Operation"}}}},
                    "responses": {
                        "201": {"description": "Operation created"},
                        "400": {"description": "Validation failed"},
                        "404": {"description": "Unknown process"}
                    }
                }
            },
            "/processes/{process_id}/operations/{op_number}": {
                "parameters": [
                    {"name": "process_id", "in": "path", "required": true, "schema": {"type": "string"}},
                    {"name": "op_number", "in": "path", "required": true, "schema": {"type": "integer"}}
                ],
                "get": {
                    "tags": ["Operations"],
                    "summary": "Retrieve an operation by op_number",
                    "responses": {"200": {"description": "Operation detail"}, "400": {"description": "op_number is not an integer"}, "404": {"description": "Unknown operation"}}
                },
                "put": {
                    "tags": ["Operations"],
                    "summary": "Replace an operation, creating it when absent",
                    "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Operation"}}}},
                    "responses": {
                        "200": {"description": "Operation updated"},
                        "201": {"description": "Operation created at this address"},
                        "400": {"description": "Validation failed"},
                        "404": {"description": "Unknown process"}
                    }
                },
                "delete": {
                    "tags": ["Operations"],
                    "summary": "Delete an operation",
                    "responses": {"204": {"description": "Deleted"}, "400": {"description": "op_number is not an integer"}, "404": {"description": "Unknown operation"}}
                }
            }
        }
    });
    Json(spec)
}
