//! JSON schemas for response bodies

use serde_json::{json, Value};

/// Successful `/login` body: a non-empty token and nothing else
pub fn login_token_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["token"],
        "properties": {
            "token": { "type": "string", "minLength": 1 }
        },
        "additionalProperties": false
    })
}

/// `{ "error": "..." }` body returned with 4xx responses
pub fn error_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["error"],
        "properties": {
            "error": { "type": "string", "minLength": 1 }
        }
    })
}

/// Echo returned by `POST /users`
pub fn created_user_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["name", "job", "id", "createdAt"],
        "properties": {
            "name": { "type": "string" },
            "job": { "type": "string" },
            "id": { "type": "string", "minLength": 1 },
            "createdAt": { "type": "string", "minLength": 1 }
        }
    })
}
