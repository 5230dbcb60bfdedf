//! The registration session flow
//!
//! A linear step machine with entry guards ([`machine`]), the operations
//! that advance it ([`wizard`]), and the resend rate limit for the OTP
//! step ([`cooldown`]).

pub mod cooldown;
pub mod machine;
pub mod wizard;

pub use cooldown::ResendCooldown;
pub use machine::{entry_guard, FlowStep, StepEntry};
pub use wizard::{RegisterOutcome, RegistrationFlow, RegistrationForm, DEFAULT_PLAN};
