/// Lifecycle of a streaming engine
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Initializing,
    Streaming,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}

/// Outcome of a single cooperative tick
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Nothing to do, the engine is idle
    Idle,
    /// The engine made progress and stays active
    Busy,
    /// The stream stopped during this tick, the engine is idle again
    Ended,
}
