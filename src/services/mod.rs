pub mod auth;
pub mod order_service;
pub mod payment_service;
pub mod report_service;
pub mod session_service;
