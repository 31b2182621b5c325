pub mod account_service;
pub mod investment_service;
pub mod notification_service;
pub mod project_service;

pub use account_service::*;
pub use investment_service::*;
pub use notification_service::*;
pub use project_service::*;
