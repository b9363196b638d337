//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure becomes `invalid_request` with a `details` object naming the
//! offending field, the rejected value and a machine-readable code.

use chrono::NaiveDate;
use pagination::{PageRequest, PageRequestError};
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::calendar::parse_check_in_date;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidPage,
    InvalidLimit,
    InvalidBody,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidDate => "invalid_date",
            Self::InvalidPage => "invalid_page",
            Self::InvalidLimit => "invalid_limit",
            Self::InvalidBody => "invalid_body",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("missing required field: {name}")).with_details(json!({
        "field": name,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        field_error(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            value,
        )
    })
}

/// Parse an optional check-in date, accepting `YYYY-MM-DD` or RFC 3339.
pub(crate) fn parse_optional_date(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    value
        .map(|raw| {
            parse_check_in_date(raw).map_err(|err| {
                field_error(field, err.to_string(), ErrorCode::InvalidDate, raw)
            })
        })
        .transpose()
}

/// Decode an optional JSON body; an empty or blank body yields `T::default()`.
pub(crate) fn parse_optional_json<T>(body: &[u8]) -> Result<T, Error>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        Error::invalid_request(format!("request body is not valid JSON: {err}")).with_details(
            json!({
                "code": ErrorCode::InvalidBody.as_str(),
            }),
        )
    })
}

/// Validate `page`/`limit` query parameters against `default_limit`.
pub(crate) fn parse_page(
    page: Option<u32>,
    limit: Option<u32>,
    default_limit: u32,
) -> Result<PageRequest, Error> {
    PageRequest::from_query(page, limit, default_limit).map_err(|err| {
        let (field, code, value) = match err {
            PageRequestError::InvalidPage => ("page", ErrorCode::InvalidPage, page),
            PageRequestError::InvalidLimit { .. } => ("limit", ErrorCode::InvalidLimit, limit),
        };
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": field,
            "value": value,
            "code": code.as_str(),
        }))
    })
}
