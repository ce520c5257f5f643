pub mod buddy;
pub mod help_request;

pub use buddy::*;
pub use help_request::*;
