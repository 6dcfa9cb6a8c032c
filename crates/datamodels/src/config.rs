use std::num::NonZeroUsize;

/// Configuration for a generation run
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of tables emitted concurrently
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}

impl Config {
    /// Create a new Config sized to the machine's available parallelism
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of emission workers. Zero is treated as one.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}
