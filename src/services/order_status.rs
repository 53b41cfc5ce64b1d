use rand::{distributions::Alphanumeric, Rng};
use rust_decimal::Decimal;

use crate::entities::{OrderStatus, PaymentStatus};

/// Validates if a status transition is allowed
///
/// `Pending -> {Scheduled, Cancelled}`, `Scheduled -> {Scheduled, Completed}`.
/// Completed and Cancelled are terminal.
pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    match (from, to) {
        (Pending, Scheduled) => true,
        (Pending, Cancelled) => true,

        // Rescheduling keeps the order in Scheduled
        (Scheduled, Scheduled) => true,
        (Scheduled, Completed) => true,

        _ => false,
    }
}

/// Payment status after verification: Paid once the total is covered, Partial
/// while something has been paid, otherwise unset.
pub fn payment_status_for(paid: Decimal, total: Decimal) -> Option<PaymentStatus> {
    if paid >= total {
        Some(PaymentStatus::Paid)
    } else if paid > Decimal::ZERO {
        Some(PaymentStatus::Partial)
    } else {
        None
    }
}

/// Share of `total` covered by `paid`, in percent, capped at 100 and rounded to two places.
pub fn paid_percentage(paid: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ONE_HUNDRED;
    }
    let pct = (paid / total * Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED);
    pct.round_dp(2).normalize()
}

/// Public order reference, `ORD-` followed by eight uppercase alphanumerics.
pub fn generate_reference_code() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect();
    format!("ORD-{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use sea_orm::Iterable;

    #[rstest]
    #[case(OrderStatus::Pending, OrderStatus::Scheduled, true)]
    #[case(OrderStatus::Pending, OrderStatus::Cancelled, true)]
    #[case(OrderStatus::Pending, OrderStatus::Completed, false)]
    #[case(OrderStatus::Pending, OrderStatus::Pending, false)]
    #[case(OrderStatus::Scheduled, OrderStatus::Scheduled, true)]
    #[case(OrderStatus::Scheduled, OrderStatus::Completed, true)]
    #[case(OrderStatus::Scheduled, OrderStatus::Cancelled, false)]
    #[case(OrderStatus::Scheduled, OrderStatus::Pending, false)]
    fn transition_table(#[case] from: OrderStatus, #[case] to: OrderStatus, #[case] ok: bool) {
        assert_eq!(is_valid_transition(from, to), ok);
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for terminal in [OrderStatus::Completed, OrderStatus::Cancelled] {
            for to in OrderStatus::iter() {
                assert!(!is_valid_transition(terminal, to), "{terminal} -> {to}");
            }
        }
    }

    #[test]
    fn payment_status_examples() {
        assert_eq!(payment_status_for(dec!(400), dec!(1000)), Some(PaymentStatus::Partial));
        assert_eq!(payment_status_for(dec!(1000), dec!(1000)), Some(PaymentStatus::Paid));
        assert_eq!(payment_status_for(dec!(1200), dec!(1000)), Some(PaymentStatus::Paid));
        assert_eq!(payment_status_for(dec!(0), dec!(1000)), None);
    }

    #[test]
    fn percentage_examples() {
        assert_eq!(paid_percentage(dec!(400), dec!(1000)).to_string(), "40");
        assert_eq!(paid_percentage(dec!(1), dec!(3)).to_string(), "33.33");
        assert_eq!(paid_percentage(dec!(1500), dec!(1000)).to_string(), "100");
        assert_eq!(paid_percentage(dec!(5), dec!(0)).to_string(), "100");
    }

    #[test]
    fn reference_codes_have_expected_shape() {
        let code = generate_reference_code();
        assert_eq!(code.len(), 12);
        assert!(code.starts_with("ORD-"));
        assert!(code[4..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    proptest! {
        #[test]
        fn payment_status_matches_definition(paid in 0u64..1_000_000, total in 1u64..1_000_000) {
            let paid = Decimal::from(paid);
            let total = Decimal::from(total);
            let status = payment_status_for(paid, total);
            prop_assert_eq!(status == Some(PaymentStatus::Paid), paid >= total);
            prop_assert_eq!(status == Some(PaymentStatus::Partial), paid > Decimal::ZERO && paid < total);
            prop_assert_eq!(status.is_none(), paid.is_zero());
        }

        #[test]
        fn paid_amount_never_decreases(amounts in proptest::collection::vec(1u64..10_000, 1..10)) {
            let total = Decimal::from(20_000u64);
            let mut paid = Decimal::ZERO;
            for amount in amounts {
                let next = paid + Decimal::from(amount);
                prop_assert!(next >= paid);
                prop_assert!(payment_status_for(next, total).is_some());
                paid = next;
            }
        }
    }
}
