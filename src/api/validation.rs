use actix_web::{HttpResponse, error::InternalError, web};
use serde::Serialize;
use serde_json::{Map, Value, json};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

fn bad_request(error: &str, fields: Map<String, Value>) -> actix_web::Error {
    let error_response = ErrorResponse {
        error: error.to_string(),
        fields: Value::Object(fields),
    };
    InternalError::from_response("", HttpResponse::BadRequest().json(error_response)).into()
}

fn message(text: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("message".to_string(), json!(text));
    fields
}

/// JSON body config with the project's standard 400 response
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default()
        .error_handler(|err, _req| match err {
            actix_web_validator::Error::Validate(validation_errors) => {
                let mut fields = Map::new();
                for (field, errors) in validation_errors.field_errors() {
                    let messages: Vec<String> = errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("Validation error in field: {}", field))
                        })
                        .collect();
                    fields.insert(field.to_string(), json!({ "errors": messages }));
                }
                bad_request("Validation failed", fields)
            }
            actix_web_validator::Error::Deserialize(de_err) => {
                let err_string = de_err.to_string();

                let text = if err_string.contains("EOF while parsing") {
                    "Request body is empty. Expected JSON payload"
                } else if err_string.contains("unknown field") {
                    "Unknown field. Allowed fields are title, salary and equity"
                } else {
                    "Invalid JSON format"
                };
                bad_request("Request validation failed", message(text))
            }
            _ => bad_request("Validation failed", message("Validation error")),
        })
}

/// Query string config; malformed filters (e.g. `hasEquity=yes`) become a 400
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| {
            bad_request("Invalid query parameters", message(&err.to_string()))
        })
}
