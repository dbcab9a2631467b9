pub mod builders;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use builders::{one_v_one, MatchBuilder};
#[allow(unused_imports)]
pub use mocks::{BrokenStatsStore, FlakyMatchLogStore, LogLine, RecordingLogger};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
