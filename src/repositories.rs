pub mod accounts;
pub mod contacts;
pub mod insights;
pub mod navigation;
pub mod notifications;
pub mod session;
pub mod transactions;
