use crate::{
    auth::AuthUser,
    db::DbPool,
    entities::{
        quotation::{self, Entity as QuotationEntity},
        service::Entity as ServiceEntity,
        QuotationStatus,
    },
    errors::ServiceError,
    mailer::{MailMessage, Mailer},
    metrics,
    services::notifications,
    validation::{non_negative_amount, not_blank},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuotationRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 7, max = 20, message = "Please enter a valid phone number"))]
    pub phone: String,
    pub service_id: Option<Uuid>,
    #[validate(custom = "not_blank", length(max = 5000, message = "Details are too long"))]
    pub details: String,
    #[validate(length(max = 200, message = "Dimensions are too long"))]
    pub dimensions: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuotationStatusRequest {
    pub status: QuotationStatus,
    #[validate(length(max = 2000, message = "Note is too long"))]
    pub note: Option<String>,
    /// Applied only when the new status is Approved
    #[validate(custom = "non_negative_amount")]
    pub estimated_price: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuotationFilter {
    pub status: Option<QuotationStatus>,
}

/// Result of a status change; the email outcome is reported next to the saved row.
#[derive(Debug, Serialize)]
pub struct QuotationUpdate {
    pub quotation: quotation::Model,
    pub email_sent: bool,
}

/// Renders the customer email for the quotation's current status.
pub fn render_status_email(quotation: &quotation::Model) -> MailMessage {
    let headline = match quotation.status {
        QuotationStatus::Pending => "Your quotation request is being reviewed",
        QuotationStatus::Approved => "Your quotation has been approved",
        QuotationStatus::Rejected => "Your quotation request was declined",
        QuotationStatus::Completed => "Your quotation has been completed",
    };

    let mut lines = vec![
        format!("Hi {},", quotation.name),
        format!("{}.", headline),
        format!("Request: {}", quotation.details),
    ];
    if let Some(dimensions) = &quotation.dimensions {
        lines.push(format!("Dimensions: {}", dimensions));
    }
    if let Some(price) = quotation.estimated_price {
        lines.push(format!("Estimated price: {}", price.round_dp(2)));
    }
    if let Some(note) = &quotation.note {
        lines.push(format!("Note from our team: {}", note));
    }

    let text = lines.join("\n\n");
    let html = lines
        .iter()
        .map(|line| format!("<p>{}</p>", escape_html(line)))
        .collect::<String>();

    MailMessage {
        to: quotation.email.clone(),
        subject: format!("Quotation {}", quotation.status),
        html,
        text,
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Quotation requests and their review workflow
#[derive(Clone)]
pub struct QuotationService {
    db_pool: Arc<DbPool>,
    mailer: Arc<dyn Mailer>,
}

impl QuotationService {
    pub fn new(db_pool: Arc<DbPool>, mailer: Arc<dyn Mailer>) -> Self {
        Self { db_pool, mailer }
    }

    #[instrument(skip(self, request), fields(customer_id = %customer_id))]
    pub async fn create_quotation(
        &self,
        customer_id: Uuid,
        request: CreateQuotationRequest,
    ) -> Result<quotation::Model, ServiceError> {
        crate::validation::validate(&request)?;
        let db = &*self.db_pool;

        if let Some(service_id) = request.service_id {
            ServiceEntity::find_by_id(service_id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("Service"))?;
        }

        let now = Utc::now();
        let model = quotation::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(customer_id),
            name: Set(request.name.trim().to_string()),
            email: Set(request.email.trim().to_string()),
            phone: Set(request.phone.trim().to_string()),
            service_id: Set(request.service_id),
            details: Set(request.details.trim().to_string()),
            dimensions: Set(request.dimensions),
            status: Set(QuotationStatus::Pending),
            note: Set(None),
            estimated_price: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create quotation");
            ServiceError::DatabaseError(e)
        })?;

        info!(quotation_id = %model.id, "Quotation requested");
        Ok(model)
    }

    /// Customers see their own requests; staff see all.
    #[instrument(skip(self, user, filter), fields(user_id = %user.id))]
    pub async fn list_quotations(
        &self,
        user: &AuthUser,
        filter: QuotationFilter,
    ) -> Result<Vec<quotation::Model>, ServiceError> {
        let mut query = QuotationEntity::find().order_by_desc(quotation::Column::CreatedAt);
        if !user.is_staff() {
            query = query.filter(quotation::Column::CustomerId.eq(user.id));
        }
        if let Some(status) = filter.status {
            query = query.filter(quotation::Column::Status.eq(status));
        }
        Ok(query.all(&*self.db_pool).await?)
    }

    /// Applies a status change, notifies the customer, then emails them.
    /// A failed email does not undo the update; it is reported as `email_sent = false`.
    #[instrument(skip(self, request), fields(quotation_id = %quotation_id, status = %request.status))]
    pub async fn update_status(
        &self,
        quotation_id: Uuid,
        request: UpdateQuotationStatusRequest,
    ) -> Result<QuotationUpdate, ServiceError> {
        crate::validation::validate(&request)?;

        let txn = self.db_pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for quotation update");
            ServiceError::DatabaseError(e)
        })?;

        let current = QuotationEntity::find_by_id(quotation_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Quotation"))?;

        if !current.status.can_transition_to(request.status) {
            return Err(ServiceError::InvalidTransition(format!(
                "Cannot change quotation status from {} to {}",
                current.status, request.status
            )));
        }

        let customer_id = current.customer_id;
        let mut active: quotation::ActiveModel = current.into();
        active.status = Set(request.status);
        if let Some(note) = request.note {
            active.note = Set(Some(note).filter(|n| !n.trim().is_empty()));
        }
        if request.status == QuotationStatus::Approved {
            if let Some(price) = request.estimated_price {
                active.estimated_price = Set(Some(price));
            }
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, quotation_id = %quotation_id, "Failed to update quotation");
            ServiceError::DatabaseError(e)
        })?;

        notifications::create(
            &txn,
            customer_id,
            "Quotation Update",
            format!("Your quotation request is now {}.", updated.status),
        )
        .await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, quotation_id = %quotation_id, "Failed to commit quotation update");
            ServiceError::DatabaseError(e)
        })?;

        let email_sent = match self.mailer.send(render_status_email(&updated)).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, quotation_id = %quotation_id, "Quotation email failed");
                metrics::record_quotation_email_failed();
                false
            }
        };

        info!(quotation_id = %quotation_id, email_sent, "Quotation status updated");
        Ok(QuotationUpdate {
            quotation: updated,
            email_sent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quotation(status: QuotationStatus) -> quotation::Model {
        let now = Utc::now();
        quotation::Model {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            name: "Ana <Cruz>".into(),
            email: "ana@example.com".into(),
            phone: "09171234567".into(),
            service_id: None,
            details: "Sliding window".into(),
            dimensions: Some("120x90cm".into()),
            status,
            note: Some("Site visit needed".into()),
            estimated_price: Some(dec!(15500)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn approved_email_carries_price_and_note() {
        let mail = render_status_email(&quotation(QuotationStatus::Approved));
        assert_eq!(mail.to, "ana@example.com");
        assert_eq!(mail.subject, "Quotation Approved");
        assert!(mail.text.contains("Estimated price: 15500"));
        assert!(mail.text.contains("Site visit needed"));
        assert!(mail.html.contains("Ana &lt;Cruz&gt;"));
    }

    #[test]
    fn details_must_not_be_blank() {
        let request = CreateQuotationRequest {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: "09171234567".into(),
            service_id: None,
            details: "   ".into(),
            dimensions: None,
        };
        assert!(request.validate().is_err());
    }
}
