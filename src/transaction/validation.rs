//! Validation of candidate transactions submitted by clients.
//!
//! Every rule is checked, so a single response can tell the client about all
//! of the fields it needs to fix.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::{
    Error,
    transaction::{Category, TransactionBuilder, TransactionType},
};

/// The longest allowed title, in characters.
pub const MAX_TITLE_LENGTH: usize = 50;
/// The longest allowed description, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;
/// The largest allowed amount.
///
/// Keeps totals over any realistic number of transactions finite.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// A rule violation for a single field of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The JSON name of the offending field, e.g. "amount".
    pub field: String,
    /// A message suitable for showing to the user.
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_owned(),
            message: message.to_owned(),
        }
    }
}

/// The JSON body of a create or update request.
///
/// Fields are kept as raw JSON so that a wrongly typed field is reported as
/// a violation alongside the others instead of rejecting the whole body.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub title: Option<Value>,
    pub amount: Option<Value>,
    pub category: Option<Value>,
    #[serde(rename = "type")]
    pub transaction_type: Option<Value>,
    pub date: Option<Value>,
    pub description: Option<Value>,
}

/// Check `payload` against the transaction rules.
///
/// Text fields are trimmed, numeric strings are accepted for `amount`, and an
/// empty description is treated as no description.
///
/// # Errors
///
/// Returns [Error::Validation] listing every violated rule, in field order.
pub fn validate_transaction(payload: TransactionPayload) -> Result<TransactionBuilder, Error> {
    let mut errors = Vec::new();

    let title = validate_title(payload.title.as_ref())
        .map_err(|error| errors.push(error))
        .ok();
    let amount = validate_amount(payload.amount.as_ref())
        .map_err(|error| errors.push(error))
        .ok();
    let category = validate_category(payload.category.as_ref())
        .map_err(|error| errors.push(error))
        .ok();
    let transaction_type = validate_type(payload.transaction_type.as_ref())
        .map_err(|error| errors.push(error))
        .ok();
    let date = validate_date(payload.date.as_ref())
        .map_err(|error| errors.push(error))
        .ok();
    let description = validate_description(payload.description.as_ref())
        .map_err(|error| errors.push(error))
        .ok();

    match (title, amount, category, transaction_type, date, description) {
        (
            Some(title),
            Some(amount),
            Some(category),
            Some(transaction_type),
            Some(date),
            Some(description),
        ) => Ok(TransactionBuilder {
            title,
            amount,
            category,
            transaction_type,
            date,
            description,
        }),
        _ => Err(Error::Validation(errors)),
    }
}

fn validate_title(value: Option<&Value>) -> Result<String, FieldError> {
    let invalid = || {
        FieldError::new(
            "title",
            &format!("Title must be between 1 and {MAX_TITLE_LENGTH} characters"),
        )
    };

    match value {
        Some(Value::String(title)) => {
            let title = title.trim();
            let length = title.chars().count();

            if (1..=MAX_TITLE_LENGTH).contains(&length) {
                Ok(title.to_owned())
            } else {
                Err(invalid())
            }
        }
        _ => Err(invalid()),
    }
}

fn validate_amount(value: Option<&Value>) -> Result<f64, FieldError> {
    let amount = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match amount {
        Some(amount) if amount > MAX_AMOUNT => Err(FieldError::new(
            "amount",
            "Amount cannot be more than 1,000,000,000,000",
        )),
        Some(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(FieldError::new(
            "amount",
            "Amount must be a non-negative number",
        )),
    }
}

fn validate_category(value: Option<&Value>) -> Result<Category, FieldError> {
    value
        .and_then(Value::as_str)
        .and_then(Category::from_name)
        .ok_or_else(|| FieldError::new("category", "Please select a valid category"))
}

fn validate_type(value: Option<&Value>) -> Result<TransactionType, FieldError> {
    value
        .and_then(Value::as_str)
        .and_then(TransactionType::from_name)
        .ok_or_else(|| FieldError::new("type", "Type must be either income or expense"))
}

fn validate_date(value: Option<&Value>) -> Result<Option<OffsetDateTime>, FieldError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => parse_date(text.trim())
            .map(Some)
            .ok_or_else(|| FieldError::new("date", "Date must be a valid date")),
        Some(_) => Err(FieldError::new("date", "Date must be a valid date")),
    }
}

fn validate_description(value: Option<&Value>) -> Result<Option<String>, FieldError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(description)) => {
            let description = description.trim();

            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                Err(FieldError::new(
                    "description",
                    &format!(
                        "Description cannot be more than {MAX_DESCRIPTION_LENGTH} characters"
                    ),
                ))
            } else if description.is_empty() {
                Ok(None)
            } else {
                Ok(Some(description.to_owned()))
            }
        }
        Some(_) => Err(FieldError::new("description", "Description must be text")),
    }
}

/// Parse an ISO 8601 date or date-time.
///
/// Accepts RFC 3339 date-times ("2024-01-28T08:30:00Z"), date-times without
/// an offset ("2024-01-28T08:30:00", taken as UTC) and plain calendar dates
/// ("2024-01-28", taken as midnight UTC).
pub fn parse_date(text: &str) -> Option<OffsetDateTime> {
    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(date_time);
    }

    let local_format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(date_time) = PrimitiveDateTime::parse(text, local_format) {
        return Some(date_time.assume_utc());
    }

    let date_format = format_description!("[year]-[month]-[day]");
    Date::parse(text, date_format)
        .ok()
        .map(|date| date.midnight().assume_utc())
}
