use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde_json::{Map, Value};
use service_core::error::{field_violations, AppError, FieldViolation};
use validator::Validate;

/// A request body that can be read field by field from parsed JSON.
///
/// Implementations read every field through a [`FieldReader`], so one pass
/// reports every missing or mistyped field instead of stopping at the first.
pub trait FromJsonFields: Validate + Sized {
    fn from_fields(fields: &mut FieldReader<'_>) -> Self;
}

/// JSON body that has been read and then validated.
///
/// Shape errors (missing fields, wrong types) and constraint violations are
/// merged into one 422 with per-field detail; the handler never runs.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: FromJsonFields + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        let mut reader = FieldReader::new(&body);
        let value = T::from_fields(&mut reader);
        let mut violations = reader.into_violations();

        if violations.is_empty() {
            value.validate()?;
            return Ok(ValidatedJson(value));
        }

        // Constraint checks only count for fields that were read successfully.
        if let Err(errors) = value.validate() {
            let rejected: Vec<String> = violations.iter().map(|v| v.field.clone()).collect();
            violations.extend(
                field_violations(&errors)
                    .into_iter()
                    .filter(|v| !rejected.contains(&v.field)),
            );
        }
        violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));

        Err(AppError::InvalidPayload(violations))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(e) => AppError::UnsupportedMediaType(e.body_text()),
        other => AppError::BadRequest(anyhow::anyhow!("{}", other.body_text())),
    }
}

/// Reads typed fields out of a JSON object, recording a violation for each
/// field that is absent or has the wrong type.
///
/// Rejected fields read as an empty placeholder; callers must not use the
/// value when [`FieldReader::into_violations`] is non-empty.
pub struct FieldReader<'a> {
    object: Option<&'a Map<String, Value>>,
    violations: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    pub fn new(body: &'a Value) -> Self {
        let object = body.as_object();
        let mut violations = Vec::new();
        if object.is_none() {
            violations.push(
                FieldViolation::new("body", "invalid")
                    .with_message(format!("expected a JSON object, found {}", kind(body))),
            );
        }
        Self { object, violations }
    }

    fn lookup(&mut self, field: &str) -> Option<&'a Value> {
        let object = self.object?;
        let value = object.get(field);
        if value.is_none() {
            self.violations
                .push(FieldViolation::new(field, "required").with_message("field required"));
        }
        value
    }

    fn reject(&mut self, field: &str, expected: &str, found: &Value) {
        self.violations.push(
            FieldViolation::new(field, "invalid_type")
                .with_message(format!("expected {}, found {}", expected, kind(found))),
        );
    }

    /// Required string field.
    pub fn string(&mut self, field: &str) -> String {
        match self.lookup(field) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                self.reject(field, "a string", other);
                String::new()
            }
            None => String::new(),
        }
    }

    /// Required whole number that fits in an `i32`. `1.1` and `"10"` are rejected.
    pub fn integer(&mut self, field: &str) -> i32 {
        let Some(value) = self.lookup(field) else {
            return 0;
        };
        let parsed = match value {
            Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
            _ => None,
        };
        match parsed {
            Some(v) => v,
            None => {
                let expected = if value.is_number() {
                    "a 32-bit integer"
                } else {
                    "an integer"
                };
                self.reject(field, expected, value);
                0
            }
        }
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "an integer",
        Value::Number(_) => "a fractional number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
