use crate::{
    auth::AuthUser,
    db::DbPool,
    entities::{
        order::{self, ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel},
        order_item::{self, Entity as OrderItemEntity},
        payment::{self, Entity as PaymentEntity},
        service::{self, Entity as ServiceEntity},
        to_json_list, OrderStatus,
    },
    errors::ServiceError,
    metrics,
    services::{
        cart::Cart,
        notifications,
        order_status::{generate_reference_code, is_valid_transition},
    },
    validation::non_negative_amount,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// One requested line of a new order
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderLineRequest {
    pub service_id: Uuid,
    #[validate(length(min = 1, max = 50, message = "Please choose a color"))]
    pub color: String,
    #[validate(range(min = 1, max = 10000, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    /// Price the client displayed; the catalog price is what gets stored
    #[validate(custom = "non_negative_amount")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitOrderRequest {
    #[validate]
    pub items: Vec<OrderLineRequest>,
    /// Total the client computed; informational only
    pub total: Option<Decimal>,
    #[serde(default)]
    pub discount_requested: bool,
    /// Image references proving senior citizen / PWD eligibility
    #[serde(default)]
    pub discount_documents: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub cart: Cart,
    #[serde(default)]
    pub discount_requested: bool,
    #[serde(default)]
    pub discount_documents: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order: OrderModel,
    /// Cart with the checked-out lines removed, for the client to store back
    pub cart: Cart,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleOrderRequest {
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}

/// Order with its lines and payment records
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: OrderModel,
    pub items: Vec<order_item::Model>,
    pub payments: Vec<payment::Model>,
}

/// Loads an order the caller may act on: customers only see their own.
pub(crate) async fn find_accessible_order<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    user: &AuthUser,
) -> Result<OrderModel, ServiceError> {
    let order = OrderEntity::find_by_id(order_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Order"))?;

    if !user.is_staff() && order.customer_id != user.id {
        warn!(order_id = %order_id, user_id = %user.id, "Rejected access to foreign order");
        return Err(ServiceError::Forbidden(
            "You do not have access to this order".to_string(),
        ));
    }
    Ok(order)
}

fn format_schedule(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y at %-I:%M %p UTC").to_string()
}

/// Service for the order lifecycle
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates a Pending order with its lines and notifies the customer.
    ///
    /// Unit prices come from the catalog; the stored total is the sum of the lines.
    #[instrument(skip(self, request), fields(customer_id = %customer_id, lines = request.items.len()))]
    pub async fn submit_order(
        &self,
        customer_id: Uuid,
        request: SubmitOrderRequest,
    ) -> Result<OrderModel, ServiceError> {
        if request.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "Your order has no items".to_string(),
            ));
        }
        crate::validation::validate(&request)?;
        if request.discount_requested && request.discount_documents.is_empty() {
            return Err(ServiceError::ValidationError(
                "Please upload a valid ID to request the senior citizen or PWD discount"
                    .to_string(),
            ));
        }

        let db = &*self.db_pool;
        let service_ids: Vec<Uuid> = request.items.iter().map(|i| i.service_id).collect();
        let catalog: HashMap<Uuid, service::Model> = ServiceEntity::find()
            .filter(service::Column::Id.is_in(service_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let mut total = Decimal::ZERO;
        for line in &request.items {
            let listed = catalog
                .get(&line.service_id)
                .ok_or_else(|| ServiceError::not_found("Service"))?;
            if !listed.is_available {
                return Err(ServiceError::ValidationError(format!(
                    "{} is currently unavailable",
                    listed.name
                )));
            }
            let colors = listed.color_list();
            if !colors.is_empty() && !colors.iter().any(|c| c == &line.color) {
                return Err(ServiceError::ValidationError(format!(
                    "{} is not offered in {}",
                    listed.name, line.color
                )));
            }
            if line.price != listed.price {
                warn!(
                    service_id = %listed.id,
                    client_price = %line.price,
                    catalog_price = %listed.price,
                    "Client price differs from catalog"
                );
            }
            total += listed.price * Decimal::from(line.quantity);
        }

        if let Some(client_total) = request.total {
            if client_total != total {
                warn!(client_total = %client_total, computed_total = %total, "Client total differs from computed total");
            }
        }

        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let reference_code = generate_reference_code();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order submission");
            ServiceError::DatabaseError(e)
        })?;

        let order_model = OrderActiveModel {
            id: Set(order_id),
            reference_code: Set(reference_code.clone()),
            customer_id: Set(customer_id),
            status: Set(OrderStatus::Pending),
            total_amount: Set(total),
            paid_amount: Set(Decimal::ZERO),
            payment_status: Set(None),
            scheduled_at: Set(None),
            date_cancelled: Set(None),
            discount_requested: Set(request.discount_requested),
            discount_documents: Set(to_json_list(request.discount_documents)),
            attachments: Set(to_json_list(Vec::<String>::new())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to create order in database");
            ServiceError::DatabaseError(e)
        })?;

        for line in &request.items {
            // Presence checked above
            let price = catalog
                .get(&line.service_id)
                .map(|s| s.price)
                .unwrap_or(line.price);
            order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                service_id: Set(line.service_id),
                color: Set(line.color.clone()),
                quantity: Set(line.quantity),
                price: Set(price),
                created_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to create order item");
                ServiceError::DatabaseError(e)
            })?;
        }

        notifications::create(
            &txn,
            customer_id,
            "Order Placed",
            format!(
                "Your order {} has been placed and is awaiting scheduling.",
                reference_code
            ),
        )
        .await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order submission");
            ServiceError::DatabaseError(e)
        })?;

        metrics::record_order_submitted();
        info!(order_id = %order_id, reference_code = %reference_code, total = %total, "Order submitted");
        Ok(order_model)
    }

    /// Submits the selected cart lines as one order.
    #[instrument(skip(self, request), fields(customer_id = %customer_id))]
    pub async fn checkout(
        &self,
        customer_id: Uuid,
        request: CheckoutRequest,
    ) -> Result<CheckoutResponse, ServiceError> {
        let CheckoutRequest {
            mut cart,
            discount_requested,
            discount_documents,
        } = request;

        let items: Vec<OrderLineRequest> = cart
            .selected_items()
            .into_iter()
            .map(|line| OrderLineRequest {
                service_id: line.service_id,
                color: line.color.clone(),
                quantity: i32::try_from(line.quantity).unwrap_or(i32::MAX),
                price: line.price,
            })
            .collect();

        if items.is_empty() {
            return Err(ServiceError::ValidationError(
                "Please select at least one item to check out".to_string(),
            ));
        }

        let order = self
            .submit_order(
                customer_id,
                SubmitOrderRequest {
                    items,
                    total: Some(cart.selected_total()),
                    discount_requested,
                    discount_documents,
                },
            )
            .await?;

        cart.clear_selected();
        Ok(CheckoutResponse { order, cart })
    }

    /// Customers see their own orders; staff see every order.
    #[instrument(skip(self, user, filter), fields(user_id = %user.id))]
    pub async fn list_orders(
        &self,
        user: &AuthUser,
        filter: OrderFilter,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        let mut query = OrderEntity::find().order_by_desc(order::Column::CreatedAt);
        if !user.is_staff() {
            query = query.filter(order::Column::CustomerId.eq(user.id));
        }
        if let Some(status) = filter.status {
            query = query.filter(order::Column::Status.eq(status));
        }
        Ok(query.all(&*self.db_pool).await?)
    }

    #[instrument(skip(self, user), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid, user: &AuthUser) -> Result<OrderDetail, ServiceError> {
        let db = &*self.db_pool;
        let order = find_accessible_order(db, order_id, user).await?;

        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .order_by_asc(order_item::Column::CreatedAt)
            .all(db)
            .await?;
        let payments = PaymentEntity::find()
            .filter(payment::Column::OrderId.eq(order_id))
            .order_by_asc(payment::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(OrderDetail {
            order,
            items,
            payments,
        })
    }

    /// Cancels a Pending order. Any other status is an invalid transition and
    /// leaves the order untouched.
    #[instrument(skip(self, user), fields(order_id = %order_id))]
    pub async fn cancel_order(&self, order_id: Uuid, user: &AuthUser) -> Result<OrderModel, ServiceError> {
        let txn = self.begin().await?;
        let order = find_accessible_order(&txn, order_id, user).await?;

        if order.status != OrderStatus::Pending {
            return Err(ServiceError::InvalidTransition(format!(
                "Only pending orders can be cancelled; this order is {}",
                order.status
            )));
        }

        let now = Utc::now();
        let customer_id = order.customer_id;
        let reference_code = order.reference_code.clone();
        let mut active: OrderActiveModel = order.into();
        active.status = Set(OrderStatus::Cancelled);
        active.date_cancelled = Set(Some(now));
        active.updated_at = Set(now);
        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to cancel order");
            ServiceError::DatabaseError(e)
        })?;

        notifications::create(
            &txn,
            customer_id,
            "Order Cancelled",
            format!("Your order {} has been cancelled.", reference_code),
        )
        .await?;

        self.commit(txn, order_id).await?;
        metrics::record_order_cancelled();
        metrics::record_order_transition(&OrderStatus::Cancelled.to_string());
        info!(order_id = %order_id, "Order cancelled");
        Ok(updated)
    }

    /// Sets or moves the installation date.
    #[instrument(skip(self, request), fields(order_id = %order_id, scheduled_at = %request.scheduled_at))]
    pub async fn schedule_order(
        &self,
        order_id: Uuid,
        request: ScheduleOrderRequest,
    ) -> Result<OrderModel, ServiceError> {
        let when = request.scheduled_at;
        self.transition(
            order_id,
            OrderStatus::Scheduled,
            |active| active.scheduled_at = Set(Some(when)),
            "Service Scheduled",
            |reference| {
                format!(
                    "Your order {} has been scheduled for {}.",
                    reference,
                    format_schedule(&when)
                )
            },
        )
        .await
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn complete_order(&self, order_id: Uuid) -> Result<OrderModel, ServiceError> {
        self.transition(
            order_id,
            OrderStatus::Completed,
            |_| {},
            "Order Completed",
            |reference| {
                format!(
                    "Your order {} has been completed. We would love to hear your feedback!",
                    reference
                )
            },
        )
        .await
    }

    /// Hard delete; items and payments cascade.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn delete_order(&self, order_id: Uuid) -> Result<(), ServiceError> {
        let result = OrderEntity::delete_by_id(order_id)
            .exec(&*self.db_pool)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to delete order");
                ServiceError::DatabaseError(e)
            })?;

        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Order"));
        }
        info!(order_id = %order_id, "Order deleted");
        Ok(())
    }

    /// Moves an order through the transition table, applies `patch` and writes
    /// one notification, all in a single transaction.
    async fn transition<P, M>(
        &self,
        order_id: Uuid,
        to: OrderStatus,
        patch: P,
        title: &str,
        message: M,
    ) -> Result<OrderModel, ServiceError>
    where
        P: FnOnce(&mut OrderActiveModel),
        M: FnOnce(&str) -> String,
    {
        let txn = self.begin().await?;
        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order"))?;

        if !is_valid_transition(order.status, to) {
            warn!(order_id = %order_id, from = %order.status, to = %to, "Rejected order transition");
            return Err(ServiceError::InvalidTransition(format!(
                "Cannot change order status from {} to {}",
                order.status, to
            )));
        }

        let customer_id = order.customer_id;
        let body = message(&order.reference_code);
        let mut active: OrderActiveModel = order.into();
        active.status = Set(to);
        active.updated_at = Set(Utc::now());
        patch(&mut active);

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to update order status");
            ServiceError::DatabaseError(e)
        })?;

        notifications::create(&txn, customer_id, title, body).await?;
        self.commit(txn, order_id).await?;

        metrics::record_order_transition(&to.to_string());
        info!(order_id = %order_id, status = %to, "Order status updated");
        Ok(updated)
    }

    async fn begin(&self) -> Result<DatabaseTransaction, ServiceError> {
        self.db_pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction");
            ServiceError::DatabaseError(e)
        })
    }

    async fn commit(&self, txn: DatabaseTransaction, order_id: Uuid) -> Result<(), ServiceError> {
        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order transaction");
            ServiceError::DatabaseError(e)
        })
    }
}
