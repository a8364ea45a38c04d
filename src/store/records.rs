//! Code record fetch and upsert against the hosted function API.
//!
//! The store exposes Convex-style function endpoints: `POST /api/query` and
//! `POST /api/mutation` with a `{path, args, format}` envelope, answering
//! `{status: "success", value}` or `{status: "error", errorMessage}`.

use crate::domain::CodeRecord;
use crate::store::client::StoreClient;
use crate::store::errors::format_http_error;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const GET_CODE_FUNCTION: &str = "userCode:getUserCode";
const UPDATE_CODE_FUNCTION: &str = "userCode:updateUserCode";

/// Result type for record queries.
pub type Result<T> = std::result::Result<T, RecordQueryError>;

/// Errors returned while fetching or upserting a code record.
#[derive(Debug, Error)]
pub enum RecordQueryError {
    #[error("store request failed: {0}")]
    Http(String),
    #[error("store returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("store function failed: {0}")]
    Function(String),
    #[error("failed to parse store response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionEnvelope {
    status: String,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodeRecordPayload {
    code: String,
    #[serde(default)]
    updated_at: f64,
    #[serde(default)]
    is_default: bool,
}

/// Fetches the code record for `user_id`. The store substitutes a default
/// payload (flagged `isDefault`) when the user has no saved record yet.
pub async fn fetch_code_record(client: &StoreClient, user_id: &str) -> Result<CodeRecord> {
    let value = call_function(
        client,
        "query",
        GET_CODE_FUNCTION,
        json!({ "userId": user_id }),
    )
    .await?;

    let payload: CodeRecordPayload = serde_json::from_value(value)?;
    Ok(CodeRecord {
        code: payload.code,
        updated_at_unix_ms: payload.updated_at as i64,
        is_default: payload.is_default,
    })
}

/// Inserts or overwrites the code record for `user_id`.
pub async fn upsert_code_record(client: &StoreClient, user_id: &str, code: &str) -> Result<()> {
    call_function(
        client,
        "mutation",
        UPDATE_CODE_FUNCTION,
        json!({ "userId": user_id, "code": code }),
    )
    .await?;

    Ok(())
}

async fn call_function(
    client: &StoreClient,
    kind: &str,
    path: &str,
    args: serde_json::Value,
) -> Result<serde_json::Value> {
    let response = client
        .http()
        .post(client.function_url(kind))
        .json(&json!({ "path": path, "args": args, "format": "json" }))
        .send()
        .await
        .map_err(|error| RecordQueryError::Http(format_http_error(&error)))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|error| RecordQueryError::Http(format_http_error(&error)))?;

    if !status.is_success() {
        return Err(RecordQueryError::Status {
            status: status.as_u16(),
            body: body.trim().to_owned(),
        });
    }

    decode_envelope(&body)
}

fn decode_envelope(body: &str) -> Result<serde_json::Value> {
    let envelope: FunctionEnvelope = serde_json::from_str(body)?;

    if envelope.status == "success" {
        Ok(envelope.value.unwrap_or(serde_json::Value::Null))
    } else {
        Err(RecordQueryError::Function(
            envelope
                .error_message
                .unwrap_or_else(|| "unknown store error".to_owned()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{CodeRecordPayload, RecordQueryError, decode_envelope};

    #[test]
    fn success_envelope_yields_value() {
        let value = decode_envelope(r#"{"status":"success","value":{"code":"x"}}"#).unwrap();
        assert_eq!(value["code"], "x");
    }

    #[test]
    fn error_envelope_surfaces_function_message() {
        let error =
            decode_envelope(r#"{"status":"error","errorMessage":"no such function"}"#).unwrap_err();
        match error {
            RecordQueryError::Function(message) => assert_eq!(message, "no such function"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_envelope_is_invalid_response() {
        let error = decode_envelope("not json").unwrap_err();
        assert!(matches!(error, RecordQueryError::InvalidResponse(_)));
    }

    #[test]
    fn record_payload_decodes_store_field_names() {
        let payload: CodeRecordPayload = serde_json::from_str(
            r#"{"code":"print(1)","updatedAt":1754300000000.0,"isDefault":true}"#,
        )
        .unwrap();

        assert_eq!(payload.code, "print(1)");
        assert!(payload.is_default);
        assert_eq!(payload.updated_at as i64, 1_754_300_000_000);
    }

    #[test]
    fn saved_records_omit_the_default_flag() {
        let payload: CodeRecordPayload =
            serde_json::from_str(r#"{"code":"saved text","updatedAt":1.0}"#).unwrap();

        assert_eq!(payload.code, "saved text");
        assert!(!payload.is_default);
    }
}
