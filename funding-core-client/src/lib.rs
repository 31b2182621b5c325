pub mod account_store;
pub mod gateway;
pub mod investment_engine;
pub mod notification_store;
pub mod project_store;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use account_store::*;
pub use gateway::*;
pub use notification_store::*;
pub use project_store::*;
pub use session::*;
