pub mod incident;
pub mod session;

pub use incident::{Incident, InventoryItem, Severity};
pub use session::{ChatSession, SessionStore};
