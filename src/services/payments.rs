use crate::{
    auth::AuthUser,
    db::DbPool,
    entities::{
        order::{self, ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel},
        payment::{self, Entity as PaymentEntity},
        to_json_list, OrderStatus, PaymentStatus,
    },
    errors::ServiceError,
    metrics,
    services::{
        notifications,
        order_status::{paid_percentage, payment_status_for},
        orders::find_accessible_order,
    },
    validation::positive_amount,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait, UpdateMany,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitPaymentRequest {
    /// Hosted image references for the proof of payment
    #[serde(default)]
    pub attachments: Vec<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyPaymentRequest {
    #[validate(custom = "positive_amount")]
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PaymentVerification {
    pub payment: payment::Model,
    pub order: OrderModel,
    /// Share of the order total paid so far
    pub paid_percentage: Decimal,
}

/// Appends `incoming` to `existing`, keeping first occurrences only.
fn merge_attachments(existing: Vec<String>, incoming: &[String]) -> Vec<String> {
    let mut merged = existing;
    for item in incoming {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}

/// Sets the verified amount on a payment that has not been verified yet.
/// Affects no rows when the payment was already verified.
fn claim_payment(
    payment_id: Uuid,
    amount: Decimal,
    verified_by: Uuid,
    now: DateTime<Utc>,
) -> UpdateMany<PaymentEntity> {
    PaymentEntity::update_many()
        .col_expr(payment::Column::Amount, Expr::value(amount))
        .col_expr(payment::Column::VerifiedAt, Expr::value(now))
        .col_expr(payment::Column::VerifiedBy, Expr::value(verified_by))
        .filter(payment::Column::Id.eq(payment_id))
        .filter(payment::Column::VerifiedAt.is_null())
}

/// Adds `amount` to the stored paid amount in place.
fn credit_order(order_id: Uuid, amount: Decimal, now: DateTime<Utc>) -> UpdateMany<OrderEntity> {
    OrderEntity::update_many()
        .col_expr(order::Column::PaidAmount, Expr::col(order::Column::PaidAmount).add(amount))
        .col_expr(order::Column::UpdatedAt, Expr::value(now))
        .filter(order::Column::Id.eq(order_id))
}

/// Customer proof-of-payment uploads and staff verification
#[derive(Clone)]
pub struct PaymentService {
    db_pool: Arc<DbPool>,
}

impl PaymentService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Records a proof of payment with a zero amount and marks the order as
    /// awaiting verification. No amounts change here.
    #[instrument(skip(self, user, request), fields(order_id = %order_id, user_id = %user.id))]
    pub async fn submit_payment(
        &self,
        order_id: Uuid,
        user: &AuthUser,
        request: SubmitPaymentRequest,
    ) -> Result<payment::Model, ServiceError> {
        let attachments: Vec<String> = request
            .attachments
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        if attachments.is_empty() {
            return Err(ServiceError::ValidationError(
                "Please upload at least one proof of payment".to_string(),
            ));
        }

        let txn = self.db_pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for payment submission");
            ServiceError::DatabaseError(e)
        })?;

        let order = find_accessible_order(&txn, order_id, user).await?;
        if order.status == OrderStatus::Cancelled {
            return Err(ServiceError::InvalidTransition(
                "Payments cannot be submitted for a cancelled order".to_string(),
            ));
        }

        let now = Utc::now();
        let payment_model = payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            amount: Set(Decimal::ZERO),
            attachments: Set(to_json_list(attachments.clone())),
            note: Set(request.note.filter(|n| !n.trim().is_empty())),
            verified_at: Set(None),
            verified_by: Set(None),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to create payment record");
            ServiceError::DatabaseError(e)
        })?;

        let merged = merge_attachments(order.attachment_list(), &attachments);
        let mut active: OrderActiveModel = order.into();
        active.attachments = Set(to_json_list(merged));
        active.payment_status = Set(Some(PaymentStatus::VerificationPending));
        active.updated_at = Set(now);
        active.update(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to attach payment to order");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit payment submission");
            ServiceError::DatabaseError(e)
        })?;

        metrics::record_payment_submitted();
        info!(payment_id = %payment_model.id, "Payment submitted for verification");
        Ok(payment_model)
    }

    /// Sets the verified amount on a payment and rolls it into the order's
    /// paid amount. A payment can be verified once.
    #[instrument(skip(self, request), fields(payment_id = %payment_id, verified_by = %verified_by))]
    pub async fn verify_payment(
        &self,
        payment_id: Uuid,
        verified_by: Uuid,
        request: VerifyPaymentRequest,
    ) -> Result<PaymentVerification, ServiceError> {
        crate::validation::validate(&request)?;
        let amount = request.amount;

        let txn = self.db_pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for payment verification");
            ServiceError::DatabaseError(e)
        })?;

        let payment = PaymentEntity::find_by_id(payment_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Payment"))?;
        let order_id = payment.order_id;

        // No read-modify-write on shared rows: the claim is conditional and the
        // credit is applied in place.
        let now = Utc::now();
        let claimed = claim_payment(payment_id, amount, verified_by, now)
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, payment_id = %payment_id, "Failed to update payment");
                ServiceError::DatabaseError(e)
            })?;
        if claimed.rows_affected == 0 {
            warn!(payment_id = %payment_id, "Rejected repeat verification");
            return Err(ServiceError::Conflict(
                "This payment has already been verified".to_string(),
            ));
        }

        let credited = credit_order(order_id, amount, now)
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, payment_id = %payment_id, "Failed to update order paid amount");
                ServiceError::DatabaseError(e)
            })?;
        if credited.rows_affected == 0 {
            return Err(ServiceError::not_found("Order"));
        }

        let payment = PaymentEntity::find_by_id(payment_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Payment"))?;
        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order"))?;

        let paid = order.paid_amount;
        let total = order.total_amount;
        let status = payment_status_for(paid, total);
        let percentage = paid_percentage(paid, total);
        let customer_id = order.customer_id;
        let reference_code = order.reference_code.clone();

        let mut order_active: OrderActiveModel = order.into();
        order_active.payment_status = Set(status);
        let order = order_active.update(&txn).await.map_err(|e| {
            error!(error = %e, payment_id = %payment_id, "Failed to update order payment status");
            ServiceError::DatabaseError(e)
        })?;

        notifications::create(
            &txn,
            customer_id,
            "Payment Verified",
            format!(
                "Your payment of {} for order {} has been verified. You have now paid {}% of the total amount.",
                amount.normalize(),
                reference_code,
                percentage
            ),
        )
        .await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, payment_id = %payment_id, "Failed to commit payment verification");
            ServiceError::DatabaseError(e)
        })?;

        metrics::record_payment_verified();
        info!(order_id = %order.id, paid = %paid, total = %total, "Payment verified");
        Ok(PaymentVerification {
            payment,
            order,
            paid_percentage: percentage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn attachments_merge_without_duplicates() {
        let merged = merge_attachments(
            vec!["a.png".into(), "b.png".into()],
            &["b.png".into(), "c.png".into(), "c.png".into()],
        );
        assert_eq!(merged, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn verification_claims_only_unverified_payments() {
        let sql = claim_payment(Uuid::new_v4(), dec!(400), Uuid::new_v4(), Utc::now())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.starts_with(r#"UPDATE "payments" SET "amount" = "#), "{sql}");
        assert!(sql.contains(r#""verified_at" IS NULL"#), "{sql}");
    }

    #[test]
    fn order_credit_is_relative_to_stored_amount() {
        let sql = credit_order(Uuid::new_v4(), dec!(600), Utc::now())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""paid_amount" = "paid_amount" + "#), "{sql}");
    }

    #[test]
    fn verification_amount_must_be_positive() {
        assert!(VerifyPaymentRequest { amount: dec!(0) }.validate().is_err());
        assert!(VerifyPaymentRequest { amount: dec!(-5) }.validate().is_err());
        assert!(VerifyPaymentRequest { amount: dec!(0.01) }.validate().is_ok());
    }
}
