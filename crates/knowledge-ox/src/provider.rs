//! Clock and identifier sources used when the remote leaves a value out.

use std::fmt::Debug;

use knowledge_ox_common::Timestamp;

/// Source of the current time
pub trait Clock: Debug + Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;

    /// Seconds since the Unix epoch
    fn now_seconds(&self) -> i64 {
        self.now_millis() / 1000
    }
}

/// Source of fresh message identifiers
pub trait IdGenerator: Debug + Send + Sync {
    fn next_id(&self) -> String;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Timestamp::now().to_unix_millis()
    }
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
