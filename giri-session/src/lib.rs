//! Per-session state and handlers for GIRI.
//!
//! A [`Session`] owns the listing cache, the chat [`Transcript`] and the
//! [`ChatRelay`]; front ends create one at start-up, call its handlers on
//! user events and [`Session::end`] it on exit.

pub mod credential;
pub mod relay;
pub mod session;
pub mod transcript;

pub use credential::{Credential, CredentialSource};
pub use relay::{ChatOutcome, ChatRelay, NO_KEY_WARNING, PendingCall, RelayState};
pub use session::{KEY_LOADED_MESSAGE, Session};
pub use transcript::{ChatMessage, ChatRole, Transcript};
