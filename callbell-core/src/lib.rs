//! Core types and logic for the callbell ecosystem.
//!
//! This crate provides everything the server and the providers share:
//! - `UpcomingEvent` and credential types
//! - the file-backed store (users, credentials, reminder ledger)
//! - the `CalendarSource` / `CallDialer` provider contracts
//! - the reminder-dispatch cycle itself

pub mod credentials;
pub mod cycle;
pub mod error;
pub mod event;
pub mod phone;
pub mod providers;
pub mod store;

pub use credentials::TokenData;
pub use error::{CallbellError, CallbellResult};
pub use event::UpcomingEvent;
pub use providers::{CalendarSource, CallDialer};
pub use store::FileStore;
