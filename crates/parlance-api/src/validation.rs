//! Strict schema check for `POST /api/prompt` bodies.
//!
//! Serde stops at the first problem, so the body is walked as a
//! `serde_json::Value` instead and every issue is collected. The report
//! renders as a pretty-printed JSON array of `{code, path, message}`
//! objects, the same shape zod uses for its error messages.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use parlance_core::{PromptRequest, RequestType};

const FIELDS: [&str; 3] = ["id", "prompt", "requestType"];

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub code: String,
    pub path: Vec<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(code: &str, path: &[&str], message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            path: path.iter().map(|p| p.to_string()).collect(),
            message: message.into(),
        }
    }
}

/// All schema violations found in one request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Field paths that failed, e.g. `["prompt"]`. Root issues use `""`.
    pub fn paths(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.path.join(".")).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(&self.issues) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{} validation issue(s)", self.issues.len()),
        }
    }
}

/// Validate a parsed request body against the prompt schema.
///
/// Required: `id` (hyphenated UUID), `prompt` (at least one character),
/// `requestType` (`launch` or `text`). Any other key is rejected. Bodies
/// that are not JSON at all never reach this check.
pub fn validate_prompt_request(value: Value) -> Result<PromptRequest, ValidationReport> {
    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(ValidationReport::new(vec![ValidationIssue::new(
                "invalid_type",
                &[],
                format!("Invalid input: expected object, received {}", type_name(&other)),
            )]));
        }
    };

    let mut issues = Vec::new();
    let id = check_id(&object, &mut issues);
    let prompt = check_prompt(&object, &mut issues);
    let request_type = check_request_type(&object, &mut issues);
    check_unknown_keys(&object, &mut issues);

    match (id, prompt, request_type) {
        (Some(id), Some(prompt), Some(request_type)) if issues.is_empty() => {
            Ok(PromptRequest::new(id, prompt, request_type))
        }
        _ => Err(ValidationReport::new(issues)),
    }
}

fn check_id(object: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) -> Option<Uuid> {
    let raw = expect_string(object, "id", issues)?;
    // Only the canonical 8-4-4-4-12 form; uuid also accepts simple and urn forms.
    match Uuid::try_parse(raw) {
        Ok(id) if raw.len() == 36 => Some(id),
        _ => {
            issues.push(ValidationIssue::new("invalid_format", &["id"], "Invalid UUID"));
            None
        }
    }
}

fn check_prompt(object: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) -> Option<String> {
    let prompt = expect_string(object, "prompt", issues)?;
    if prompt.is_empty() {
        issues.push(ValidationIssue::new(
            "too_small",
            &["prompt"],
            "Too small: expected string to have >=1 characters",
        ));
        return None;
    }
    Some(prompt.to_string())
}

fn check_request_type(
    object: &Map<String, Value>,
    issues: &mut Vec<ValidationIssue>,
) -> Option<RequestType> {
    let parsed = object
        .get("requestType")
        .and_then(Value::as_str)
        .and_then(RequestType::from_name);
    if parsed.is_none() {
        let options: Vec<String> = RequestType::NAMES
            .iter()
            .map(|name| format!("\"{name}\""))
            .collect();
        issues.push(ValidationIssue::new(
            "invalid_value",
            &["requestType"],
            format!("Invalid option: expected one of {}", options.join("|")),
        ));
    }
    parsed
}

fn check_unknown_keys(object: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) {
    let unknown: Vec<String> = object
        .keys()
        .filter(|key| !FIELDS.contains(&key.as_str()))
        .map(|key| format!("\"{key}\""))
        .collect();
    if unknown.is_empty() {
        return;
    }
    let noun = if unknown.len() == 1 { "key" } else { "keys" };
    issues.push(ValidationIssue::new(
        "unrecognized_keys",
        &[],
        format!("Unrecognized {noun}: {}", unknown.join(", ")),
    ));
}

fn expect_string<'a>(
    object: &'a Map<String, Value>,
    field: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<&'a str> {
    match object.get(field) {
        Some(Value::String(s)) => Some(s.as_str()),
        other => {
            let received = other.map(type_name).unwrap_or("undefined");
            issues.push(ValidationIssue::new(
                "invalid_type",
                &[field],
                format!("Invalid input: expected string, received {received}"),
            ));
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
