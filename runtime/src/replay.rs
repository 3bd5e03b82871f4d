use std::hash::Hash;

use fnv::FnvHashMap;

/// How far ahead of the last accepted sequence a frame may claim to be and
/// still count as fresh. Half the sequence space: anything further ahead is
/// more plausibly an old capture from before wraparound.
pub const ACCEPT_WINDOW: u8 = 127;

/// Tracks the last accepted sequence number per sender identity and refuses
/// anything that is not strictly newer under modular arithmetic.
///
/// A sender never seen before has no entry, which is the "none seen yet"
/// state: its first frame is always fresh. State only moves forward on
/// acceptance, so a rejected frame cannot disturb the window.
pub struct ReplayGuard<K> {
    last_accepted: FnvHashMap<K, u8>,
}

impl<K> ReplayGuard<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            last_accepted: FnvHashMap::default(),
        }
    }

    /// True iff `sequence` is fresh for `sender`; records it when it is.
    pub fn accept(&mut self, sender: K, sequence: u8) -> bool {
        match self.last_accepted.get(&sender) {
            Some(&last) => {
                let ahead = sequence.wrapping_sub(last);
                if (1..=ACCEPT_WINDOW).contains(&ahead) {
                    self.last_accepted.insert(sender, sequence);
                    true
                } else {
                    false
                }
            }
            None => {
                self.last_accepted.insert(sender, sequence);
                true
            }
        }
    }
}

impl<K> Default for ReplayGuard<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_frame_is_always_fresh() {
        let mut guard = ReplayGuard::new();
        assert!(guard.accept("tx", 200));
    }

    #[test]
    fn duplicate_is_rejected() {
        let mut guard = ReplayGuard::new();
        assert!(guard.accept("tx", 5));
        assert!(!guard.accept("tx", 5));
    }

    #[test]
    fn next_sequence_is_accepted() {
        let mut guard = ReplayGuard::new();
        assert!(guard.accept("tx", 5));
        assert!(guard.accept("tx", 6));
    }

    #[test]
    fn stale_capture_is_rejected() {
        let mut guard = ReplayGuard::new();
        assert!(guard.accept("tx", 100));
        // seq = last - 50 mod 256
        assert!(!guard.accept("tx", 50));
    }

    #[test]
    fn wraparound_in_order() {
        let mut guard = ReplayGuard::new();
        for seq in [254u8, 255, 0, 1] {
            assert!(guard.accept("tx", seq), "rejected {seq} across wraparound");
        }
    }

    #[test]
    fn window_edges() {
        let mut guard = ReplayGuard::new();
        assert!(guard.accept("tx", 0));
        assert!(guard.accept("tx", 127));

        let mut guard = ReplayGuard::new();
        assert!(guard.accept("tx", 0));
        assert!(!guard.accept("tx", 128));
    }

    #[test]
    fn rejection_does_not_move_the_window() {
        let mut guard = ReplayGuard::new();
        assert!(guard.accept("tx", 10));
        assert!(!guard.accept("tx", 10));
        // Still relative to 10, not to the rejected frame.
        assert!(guard.accept("tx", 11));
    }

    #[test]
    fn senders_are_independent() {
        let mut guard = ReplayGuard::new();
        assert!(guard.accept("a", 10));
        assert!(guard.accept("b", 10));
        assert!(!guard.accept("a", 10));
        assert!(guard.accept("b", 11));
    }
}
