//! Vault domain: application state and the three components operating on it.
//!
//! - `state.rs`: `AppState`, the single explicit state container
//! - `snapshot.rs`: `VaultSnapshot`, the last successful read pass
//! - `session.rs`: `SessionManager`, wallet connect/disconnect
//! - `reader.rs`: `VaultReader`, batched snapshot reads
//! - `dispatcher.rs`: `VaultDispatcher`, approve/deposit/withdraw

pub mod dispatcher;
pub mod reader;
pub mod session;
pub mod snapshot;
pub mod state;

pub use dispatcher::{ActionKind, ActionState, PendingAction, VaultDispatcher};
pub use reader::VaultReader;
pub use session::{Session, SessionManager};
pub use snapshot::VaultSnapshot;
pub use state::{AppState, SharedState};
