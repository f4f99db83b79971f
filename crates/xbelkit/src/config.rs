//! Limits shared by the XML tokenizer and the bookmark reader

/// Parser limits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }

    /// Whether `depth` open elements would break the depth limit
    pub fn exceeds_depth(&self, depth: usize) -> bool {
        self.max_depth > 0 && depth > usize::from(self.max_depth)
    }

    /// Whether an input of `len` bytes would break the size limit
    pub fn exceeds_size(&self, len: usize) -> bool {
        self.max_size > 0 && len > self.max_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = Config::default();
        assert!(!config.exceeds_depth(128));
        assert!(config.exceeds_depth(129));
        assert!(config.exceeds_size(10 * 1024 * 1024 + 1));
    }

    #[test]
    fn test_unlimited_never_exceeds() {
        let config = Config::unlimited();
        assert!(!config.exceeds_depth(usize::MAX));
        assert!(!config.exceeds_size(usize::MAX));
    }
}
