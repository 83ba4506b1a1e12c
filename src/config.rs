/// Deepest parenthesis nesting a formula may use. Function call parentheses count.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parsed formulas kept by a caching [`Evaluator`](crate::Evaluator).
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Tunables for an [`Evaluator`](crate::Evaluator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_depth: usize,
    /// Zero disables the parse cache.
    pub cache_capacity: usize,
}

impl EngineConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    /// Same limits, no cache.
    pub fn uncached() -> Self {
        Self::default().with_cache_capacity(0)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
