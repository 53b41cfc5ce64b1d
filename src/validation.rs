use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::errors::ServiceError;

/// Flattens validator output into one user-facing string, e.g.
/// `"Email is invalid, Password must be at least 8 characters"`.
///
/// Messages are ordered by field name so the output is stable.
pub fn join_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect(errors, &mut messages);
    messages.sort();
    messages.dedup();
    messages
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join(", ")
}

fn collect(errors: &ValidationErrors, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field));
                    out.push((field.to_string(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, out),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    collect(inner, out);
                }
            }
        }
    }
}

/// Runs `validator` checks and converts failures into a `ValidationError`.
pub fn validate<T: validator::Validate>(payload: &T) -> Result<(), ServiceError> {
    payload.validate().map_err(ServiceError::from)
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(invalid("amount", "Amount must be greater than zero"))
    }
}

pub fn non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO {
        Ok(())
    } else {
        Err(invalid("amount", "Amount cannot be negative"))
    }
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(invalid("blank", "Value cannot be blank"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use validator::Validate;

    #[derive(Validate)]
    struct Registration {
        #[validate(email(message = "Email is invalid"))]
        email: String,
        #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
        password: String,
        #[validate(custom = "positive_amount")]
        deposit: Decimal,
    }

    #[test]
    fn joins_field_messages_in_field_order() {
        let payload = Registration {
            email: "nope".into(),
            password: "short".into(),
            deposit: dec!(0),
        };
        let errors = payload.validate().unwrap_err();
        assert_eq!(
            join_errors(&errors),
            "Amount must be greater than zero, Email is invalid, Password must be at least 8 characters"
        );
    }

    #[test]
    fn valid_payload_passes() {
        let payload = Registration {
            email: "a@b.co".into(),
            password: "long enough".into(),
            deposit: dec!(1.5),
        };
        assert!(validate(&payload).is_ok());
    }

    #[test]
    fn amount_helpers() {
        assert!(positive_amount(&dec!(0.01)).is_ok());
        assert!(positive_amount(&dec!(0)).is_err());
        assert!(non_negative_amount(&dec!(0)).is_ok());
        assert!(non_negative_amount(&dec!(-1)).is_err());
        assert!(not_blank("  ").is_err());
    }
}
