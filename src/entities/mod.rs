pub mod conversation;
pub mod feedback;
pub mod material;
pub mod message;
pub mod notification;
pub mod order;
pub mod order_item;
pub mod payment;
pub mod quotation;
pub mod service;
pub mod service_rating;
pub mod staff;
pub mod supplier;
pub mod task;
pub mod user;

pub use order::{OrderStatus, PaymentStatus};
pub use quotation::QuotationStatus;
pub use task::TaskStatus;
pub use user::UserRole;

use serde_json::Value;

/// Reads a JSON array column of strings, ignoring anything that is not a string.
pub fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Inverse of [`string_list`].
pub fn to_json_list<I, S>(items: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::Array(items.into_iter().map(|s| Value::String(s.into())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_list_skips_non_strings() {
        assert_eq!(
            string_list(&json!(["a", 1, "b", null])),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(string_list(&json!({"a": 1})).is_empty());
    }

    #[test]
    fn quotation_transitions() {
        use QuotationStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Completed));
        assert!(Approved.can_transition_to(Approved));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Completed));
    }

    #[test]
    fn payment_status_uses_display_names() {
        assert_eq!(
            serde_json::to_value(PaymentStatus::VerificationPending).unwrap(),
            json!("Verification Pending")
        );
        assert_eq!(PaymentStatus::VerificationPending.to_string(), "Verification Pending");
        assert_eq!(serde_json::to_value(TaskStatus::ToDo).unwrap(), json!("To Do"));
    }
}
