//! Real-time chat synchronization
//!
//! Two delivery paths feed one transcript: the REST sync path (prompt in,
//! reply out) and the push channel (server-initiated messages). The
//! [`reducer`] arbitrates between them; [`session`] drives the REST side;
//! [`socket`] owns the push connection.

pub mod reducer;
pub mod session;
pub mod socket;

pub use reducer::{ChatEvent, ConversationReducer, Effect};
pub use session::ChatSession;
pub use socket::{PushChannel, SocketEvent};
