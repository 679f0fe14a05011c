//! Client library for the Bacheca backend: the fixed-slot shopping list,
//! the note board, and their REST + websocket plumbing.
//!
//! The local view of the shopping list is always exactly `SLOT_COUNT` slots,
//! however many rows the backend holds. Local edits and remote change events
//! both land in the same reducer ([`reconcile::SlotBoard`]), so the view
//! converges the same way regardless of where a change originated.

pub mod error;
pub mod gateway;
pub mod notes;
pub mod notify;
pub mod reconcile;
pub mod rest;
pub mod shopping;

pub use error::{ClientError, Result};
pub use gateway::GatewaySubscription;
pub use notes::NoteBoard;
pub use notify::{LogNotifier, Notifier};
pub use reconcile::{ListStats, SlotBoard, reconcile};
pub use rest::RestClient;
pub use shopping::ShoppingList;
