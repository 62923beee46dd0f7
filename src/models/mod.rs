mod session;

pub use session::{SessionRecord, SessionSummary};
