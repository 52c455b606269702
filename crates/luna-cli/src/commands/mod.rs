//! Command implementations.

pub mod ask;
pub mod profile;

pub use self::ask::{answer, execute_ask, open_oracle};
pub use self::profile::execute_profile;
