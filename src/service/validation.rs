//! Explicit request validation for customer bodies.
//!
//! Bodies arrive as raw JSON objects. Browser forms send every field as a string, so numbers and
//! dates are accepted in string form as well as their native JSON form.

use crate::model::{CustomerPatch, NewCustomer};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

pub const NAME: &str = "name";
pub const DATE_OF_BIRTH: &str = "dateOfBirth";
pub const MEMBER_NUMBER: &str = "memberNumber";
pub const INTERESTS: &str = "interests";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must not be blank")]
    Blank(&'static str),
    #[error("{field} must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("{field} is not a valid date: '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("{field} is not a valid integer: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

pub struct CustomerValidator;

impl CustomerValidator {
    /// Validate a Create body. All required fields must be present and non-null.
    pub fn validate_new(body: &Value) -> Result<NewCustomer, ValidationError> {
        let obj = as_object(body)?;
        Ok(NewCustomer {
            name: parse_name(required(obj, NAME)?)?,
            date_of_birth: parse_date(DATE_OF_BIRTH, required(obj, DATE_OF_BIRTH)?)?,
            member_number: parse_member_number(required(obj, MEMBER_NUMBER)?)?,
            interests: match obj.get(INTERESTS) {
                Some(v) => parse_interests(v)?,
                None => None,
            },
        })
    }

    /// Validate an Update body. Only fields present are validated; omitted fields stay untouched.
    /// An explicit null clears `interests` and is rejected for required fields.
    pub fn validate_patch(body: &Value) -> Result<CustomerPatch, ValidationError> {
        let obj = as_object(body)?;
        let mut patch = CustomerPatch::default();
        if let Some(v) = obj.get(NAME) {
            patch.name = Some(parse_name(non_null(NAME, v)?)?);
        }
        if let Some(v) = obj.get(DATE_OF_BIRTH) {
            patch.date_of_birth = Some(parse_date(DATE_OF_BIRTH, non_null(DATE_OF_BIRTH, v)?)?);
        }
        if let Some(v) = obj.get(MEMBER_NUMBER) {
            patch.member_number = Some(parse_member_number(non_null(MEMBER_NUMBER, v)?)?);
        }
        if let Some(v) = obj.get(INTERESTS) {
            patch.interests = Some(parse_interests(v)?);
        }
        Ok(patch)
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object().ok_or(ValidationError::NotAnObject)
}

fn required<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, ValidationError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(ValidationError::Missing(field)),
        Some(v) => Ok(v),
    }
}

fn non_null<'a>(field: &'static str, v: &'a Value) -> Result<&'a Value, ValidationError> {
    if v.is_null() {
        return Err(ValidationError::Missing(field));
    }
    Ok(v)
}

fn parse_name(v: &Value) -> Result<String, ValidationError> {
    let s = v.as_str().ok_or(ValidationError::InvalidType {
        field: NAME,
        expected: "a string",
    })?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank(NAME));
    }
    Ok(trimmed.to_string())
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its UTC calendar date is kept).
fn parse_date(field: &'static str, v: &Value) -> Result<NaiveDate, ValidationError> {
    let s = v.as_str().ok_or(ValidationError::InvalidType {
        field,
        expected: "a date string",
    })?;
    let s = s.trim();
    if s.is_empty() {
        return Err(ValidationError::Blank(field));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| ValidationError::InvalidDate {
            field,
            value: s.to_string(),
        })
}

fn parse_member_number(v: &Value) -> Result<i64, ValidationError> {
    let invalid = |value: String| ValidationError::InvalidNumber {
        field: MEMBER_NUMBER,
        value,
    };
    match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
                _ => Err(invalid(n.to_string())),
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(ValidationError::Blank(MEMBER_NUMBER));
            }
            s.parse::<i64>().map_err(|_| invalid(s.to_string()))
        }
        _ => Err(ValidationError::InvalidType {
            field: MEMBER_NUMBER,
            expected: "an integer",
        }),
    }
}

fn parse_interests(v: &Value) -> Result<Option<String>, ValidationError> {
    match v {
        Value::Null => Ok(None),
        Value::String(s) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        _ => Err(ValidationError::InvalidType {
            field: INTERESTS,
            expected: "a string",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn new_customer_trims_and_parses() {
        let body = json!({
            "name": "  Ann  ",
            "dateOfBirth": "1990-05-01",
            "memberNumber": 1,
            "interests": " chess "
        });
        let c = CustomerValidator::validate_new(&body).expect("valid");
        assert_eq!(c.name, "Ann");
        assert_eq!(c.date_of_birth, date(1990, 5, 1));
        assert_eq!(c.member_number, 1);
        assert_eq!(c.interests.as_deref(), Some("chess"));
    }

    #[test]
    fn form_strings_are_coerced() {
        let body = json!({
            "name": "Bo",
            "dateOfBirth": "1985-12-31T00:00:00.000Z",
            "memberNumber": " 42 ",
            "interests": ""
        });
        let c = CustomerValidator::validate_new(&body).expect("valid");
        assert_eq!(c.date_of_birth, date(1985, 12, 31));
        assert_eq!(c.member_number, 42);
        assert_eq!(c.interests, None);
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let err = CustomerValidator::validate_new(&json!({"dateOfBirth": "1990-05-01", "memberNumber": 1}))
            .unwrap_err();
        assert_eq!(err, ValidationError::Missing(NAME));

        let err = CustomerValidator::validate_new(&json!({"name": "Ann", "memberNumber": 1})).unwrap_err();
        assert_eq!(err, ValidationError::Missing(DATE_OF_BIRTH));

        let err = CustomerValidator::validate_new(&json!({"name": "Ann", "dateOfBirth": "1990-05-01", "memberNumber": null}))
            .unwrap_err();
        assert_eq!(err, ValidationError::Missing(MEMBER_NUMBER));
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = CustomerValidator::validate_new(&json!({"name": "   ", "dateOfBirth": "1990-05-01", "memberNumber": 1}))
            .unwrap_err();
        assert_eq!(err, ValidationError::Blank(NAME));
    }

    #[test]
    fn bad_dates_and_numbers_are_rejected() {
        let err = CustomerValidator::validate_new(&json!({"name": "Ann", "dateOfBirth": "yesterday", "memberNumber": 1}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDate { field: DATE_OF_BIRTH, .. }));

        let err = CustomerValidator::validate_new(&json!({"name": "Ann", "dateOfBirth": "1990-02-30", "memberNumber": 1}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDate { .. }));

        let err = CustomerValidator::validate_new(&json!({"name": "Ann", "dateOfBirth": "1990-05-01", "memberNumber": 1.5}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidNumber { .. }));

        let err = CustomerValidator::validate_new(&json!({"name": "Ann", "dateOfBirth": "1990-05-01", "memberNumber": "seven"}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidNumber { .. }));

        let err = CustomerValidator::validate_new(&json!({"name": "Ann", "dateOfBirth": "1990-05-01", "memberNumber": true}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { field: MEMBER_NUMBER, .. }));
    }

    #[test]
    fn whole_float_member_number_is_accepted() {
        let c = CustomerValidator::validate_new(&json!({"name": "Ann", "dateOfBirth": "1990-05-01", "memberNumber": 7.0}))
            .expect("valid");
        assert_eq!(c.member_number, 7);
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert_eq!(
            CustomerValidator::validate_new(&json!([1, 2])).unwrap_err(),
            ValidationError::NotAnObject
        );
        assert_eq!(
            CustomerValidator::validate_patch(&json!("x")).unwrap_err(),
            ValidationError::NotAnObject
        );
    }

    #[test]
    fn patch_only_includes_supplied_fields() {
        let p = CustomerValidator::validate_patch(&json!({"interests": "chess, reading"})).expect("valid");
        assert_eq!(
            p,
            CustomerPatch {
                interests: Some(Some("chess, reading".into())),
                ..Default::default()
            }
        );
    }

    #[test]
    fn patch_null_clears_interests_but_not_required_fields() {
        let p = CustomerValidator::validate_patch(&json!({"interests": null})).expect("valid");
        assert_eq!(p.interests, Some(None));

        let err = CustomerValidator::validate_patch(&json!({"name": null})).unwrap_err();
        assert_eq!(err, ValidationError::Missing(NAME));
    }

    #[test]
    fn patch_ignores_server_owned_and_unknown_fields() {
        let p = CustomerValidator::validate_patch(&json!({
            "_id": "other",
            "createdAt": "2000-01-01T00:00:00Z",
            "nickname": "x"
        }))
        .expect("valid");
        assert!(p.is_empty());
    }

    #[test]
    fn messages_name_the_field() {
        assert_eq!(ValidationError::Missing(NAME).to_string(), "name is required");
        assert_eq!(
            ValidationError::Blank(MEMBER_NUMBER).to_string(),
            "memberNumber must not be blank"
        );
    }
}
