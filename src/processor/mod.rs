pub mod dump;
pub mod output;
pub mod progress;
pub mod session;

pub use dump::{format_summary, ChainstateDumper};
pub use output::EntryWriter;
pub use progress::ProgressTracker;
pub use session::{BatchOutcome, DecodeSession, RecordError};
