pub mod account;
pub mod investment;
pub mod notification;
pub mod project;

pub use account::*;
pub use investment::*;
pub use notification::*;
pub use project::*;
