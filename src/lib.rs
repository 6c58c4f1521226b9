pub mod config;
pub mod crypto;
pub mod error;
pub mod events;
pub mod governance;
pub mod governor;
pub mod ledger;
pub mod roles;
pub mod time;

pub use error::{GovernorError, GovernorResult};
pub use events::Event;
pub use governor::{Governor, GovernorState};
