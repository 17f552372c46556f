pub mod connection_service;
pub mod faucet_service;
pub mod form_state;

pub use connection_service::{ConnectionManager, ConnectionView, InitRequest};
pub use faucet_service::{AdvanceOutcome, FaucetService, FundOutcome};
pub use form_state::{FormAction, FormState, TimestampFormState};
