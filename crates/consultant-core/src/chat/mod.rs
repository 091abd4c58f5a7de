pub mod assembler;
pub mod driver;
pub mod log;
pub mod session;

pub use assembler::{Assembled, MessageAssembler, ERROR_REPLY, FALLBACK_REPLY};
pub use driver::{ChatDriver, TurnOutcome};
pub use log::ConversationLog;
pub use session::SessionContext;
