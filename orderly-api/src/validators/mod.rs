//! Request validators
//!
//! Each request type deserializes untrusted input (see [`crate::extract`]),
//! checks it, and binds it into a model creation or patch record. Nothing is
//! written until binding succeeds.
//!
//! Length, email and numeric-range rules are `validator` derive attributes.
//! Maximum lengths mirror the `VARCHAR` widths in `migrations/`, so anything
//! accepted here fits its column. Enum membership, required fields and money
//! amounts are checked through [`FieldCheck`], which merges both sources
//! into one field → rule map.

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::error::{collect_field_errors, ApiError, ApiResult, FieldErrors};

pub mod company;
pub mod item;
pub mod order;
pub mod user;

/// Largest amount a `NUMERIC(12, 2)` column holds
pub const MAX_MONEY: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Accumulates field violations for one request
#[derive(Debug, Default)]
pub struct FieldCheck {
    errors: FieldErrors,
}

impl FieldCheck {
    /// Starts from the derive-attribute violations of `request`
    pub fn of<T: Validate>(request: &T) -> Self {
        let errors = match request.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => collect_field_errors(&e),
        };
        Self { errors }
    }

    /// Records a violation unless the field already has one
    pub fn add(&mut self, field: &str, rule: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| rule.into());
    }

    /// Requires a non-string field to be present
    pub fn require<V>(&mut self, field: &str, value: &Option<V>) {
        if value.is_none() {
            self.add(field, "is required");
        }
    }

    /// Requires a text field to be non-empty
    pub fn filled(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            self.add(field, "is required");
        }
    }

    /// Checks an amount fits a `NUMERIC(12, 2)` column without rounding
    pub fn money(&mut self, field: &str, value: Option<Decimal>) {
        let Some(value) = value else { return };

        if value < Decimal::ZERO {
            self.add(field, "must not be negative");
        } else if value.normalize().scale() > 2 {
            self.add(field, "must have at most 2 decimal places");
        } else if value > MAX_MONEY {
            self.add(field, format!("must not exceed {}", MAX_MONEY));
        }
    }

    /// Parses an optional textual enum value
    pub fn one_of<E>(
        &mut self,
        field: &str,
        value: Option<&str>,
        parse: impl Fn(&str) -> Option<E>,
        allowed: &[&str],
    ) -> Option<E> {
        let raw = value?;
        let parsed = parse(raw);
        if parsed.is_none() {
            self.add(field, format!("must be one of: {}", allowed.join(", ")));
        }
        parsed
    }

    /// Parses an optional UUID field
    pub fn uuid(&mut self, field: &str, value: Option<&str>) -> Option<Uuid> {
        let raw = value?;
        match Uuid::parse_str(raw.trim()) {
            Ok(id) => Some(id),
            Err(_) => {
                self.add(field, "must be a valid UUID");
                None
            }
        }
    }

    /// Fails with every collected violation, if any
    pub fn finish(self) -> ApiResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}
