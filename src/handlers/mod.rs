pub mod auth;
pub mod catalog;
pub mod chat;
pub mod common;
pub mod feedback;
pub mod health;
pub mod inventory;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod quotations;
pub mod ratings;
pub mod staff;
pub mod tasks;
pub mod users;

use crate::{db::DbPool, mailer::Mailer, services};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<services::orders::OrderService>,
    pub payments: Arc<services::payments::PaymentService>,
    pub quotations: Arc<services::quotations::QuotationService>,
    pub notifications: Arc<services::notifications::NotificationService>,
    pub chat: Arc<services::chat::ChatService>,
    pub feedback: Arc<services::feedback::FeedbackService>,
    pub ratings: Arc<services::ratings::RatingService>,
    pub catalog: Arc<services::catalog::CatalogService>,
    pub materials: Arc<services::materials::MaterialService>,
    pub suppliers: Arc<services::suppliers::SupplierService>,
    pub staff: Arc<services::staff::StaffService>,
    pub users: Arc<services::users::UserService>,
    pub tasks: Arc<services::tasks::TaskService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            orders: Arc::new(services::orders::OrderService::new(db_pool.clone())),
            payments: Arc::new(services::payments::PaymentService::new(db_pool.clone())),
            quotations: Arc::new(services::quotations::QuotationService::new(
                db_pool.clone(),
                mailer,
            )),
            notifications: Arc::new(services::notifications::NotificationService::new(
                db_pool.clone(),
            )),
            chat: Arc::new(services::chat::ChatService::new(db_pool.clone())),
            feedback: Arc::new(services::feedback::FeedbackService::new(db_pool.clone())),
            ratings: Arc::new(services::ratings::RatingService::new(db_pool.clone())),
            catalog: Arc::new(services::catalog::CatalogService::new(db_pool.clone())),
            materials: Arc::new(services::materials::MaterialService::new(db_pool.clone())),
            suppliers: Arc::new(services::suppliers::SupplierService::new(db_pool.clone())),
            staff: Arc::new(services::staff::StaffService::new(db_pool.clone())),
            users: Arc::new(services::users::UserService::new(db_pool.clone())),
            tasks: Arc::new(services::tasks::TaskService::new(db_pool)),
        }
    }
}
