//! Per-key blocking query cursor.
//!
//! See https://developer.hashicorp.com/consul/api-docs/features/blocking#implementation-details
//! for the reset rules.

/// Result of feeding a response index into the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The index moved forward (or stayed put); the payload may be applied.
    Accepted(u64),
    /// The index went to zero or backwards; the payload must be discarded.
    Reset,
}

/// Index tracking for one watched key. Owned by its watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchCursor {
    index: u64,
    last_index: u64,
}

impl Default for WatchCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchCursor {
    pub fn new() -> Self {
        Self {
            index: 1,
            last_index: 0,
        }
    }

    /// Index to send on the next blocking query.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Last index whose payload was accepted.
    pub fn last_index(&self) -> u64 {
        self.last_index
    }

    /// Feed the index a response carried. `None` keeps the current index.
    pub fn advance(&mut self, candidate: Option<u64>) -> Advance {
        let candidate = candidate.unwrap_or(self.index);

        if candidate == 0 || candidate < self.last_index {
            self.index = 1;
            self.last_index = 1;
            return Advance::Reset;
        }

        self.index = candidate;
        self.last_index = candidate;
        Advance::Accepted(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_one() {
        let cursor = WatchCursor::new();
        assert_eq!((cursor.index(), cursor.last_index()), (1, 0));
    }

    #[test]
    fn test_forward_progress() {
        let mut cursor = WatchCursor::new();
        assert_eq!(cursor.advance(Some(5)), Advance::Accepted(5));
        assert_eq!(cursor.advance(Some(5)), Advance::Accepted(5));
        assert_eq!(cursor.advance(Some(9)), Advance::Accepted(9));
        assert_eq!((cursor.index(), cursor.last_index()), (9, 9));
    }

    #[test]
    fn test_backwards_resets() {
        let mut cursor = WatchCursor::new();
        cursor.advance(Some(5));

        assert_eq!(cursor.advance(Some(4)), Advance::Reset);
        assert_eq!((cursor.index(), cursor.last_index()), (1, 1));

        // History restarts from the reset point
        assert_eq!(cursor.advance(Some(2)), Advance::Accepted(2));
    }

    #[test]
    fn test_zero_resets() {
        let mut cursor = WatchCursor::new();
        assert_eq!(cursor.advance(Some(0)), Advance::Reset);
        assert_eq!((cursor.index(), cursor.last_index()), (1, 1));
    }

    #[test]
    fn test_absent_header_keeps_index() {
        let mut cursor = WatchCursor::new();
        cursor.advance(Some(12));
        assert_eq!(cursor.advance(None), Advance::Accepted(12));
        assert_eq!(cursor.index(), 12);
    }

    #[test]
    fn test_never_accepts_regression() {
        let script = [3u64, 8, 8, 2, 0, 6, 1, 7, 7, 4, 11];
        let mut cursor = WatchCursor::new();

        for candidate in script {
            let floor = cursor.last_index();
            match cursor.advance(Some(candidate)) {
                Advance::Accepted(i) => assert!(i != 0 && i >= floor),
                Advance::Reset => {
                    assert!(candidate == 0 || candidate < floor);
                    assert_eq!((cursor.index(), cursor.last_index()), (1, 1));
                }
            }
        }
    }
}
