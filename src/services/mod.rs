// Order lifecycle
pub mod cart;
pub mod order_status;
pub mod orders;
pub mod payments;

// Customer engagement
pub mod chat;
pub mod feedback;
pub mod notifications;
pub mod quotations;
pub mod ratings;

// Back office
pub mod catalog;
pub mod materials;
pub mod staff;
pub mod suppliers;
pub mod tasks;
pub mod users;
