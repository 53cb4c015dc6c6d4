pub mod accounts;
pub mod contacts;
pub mod insights;
pub mod navigation;
pub mod notifications;
pub mod transactions;
pub mod users;
