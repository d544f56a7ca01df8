/// Cyclic position within a deck.
///
/// `next` and `previous` wrap around; there is no terminal state. A deck with
/// no slides keeps every operation a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    total: usize,
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowRight,
    ArrowLeft,
    Space,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key moved the deck; the default action (scrolling) should be suppressed.
    Consumed,
    Ignored,
}

impl Navigator {
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// Start at `index`, clamped into the deck.
    pub fn starting_at(total: usize, index: usize) -> Self {
        Self {
            current: index.min(total.saturating_sub(1)),
            total,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn next(&mut self) {
        if self.total > 0 {
            self.current = (self.current + 1) % self.total;
        }
    }

    pub fn previous(&mut self) {
        if self.total > 0 {
            self.current = (self.current + self.total - 1) % self.total;
        }
    }

    /// Jump to a slide. Out-of-range indices are rejected and leave the
    /// position unchanged.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.total {
            self.current = index;
            true
        } else {
            log::warn!(
                "Ignoring jump to slide {} in a deck of {}",
                index + 1,
                self.total
            );
            false
        }
    }

    /// Adopt a new slide count after the deck was replaced, keeping the
    /// position when it is still valid.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        if self.current >= total {
            self.current = 0;
        }
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.total
    }

    pub fn handle_key(&mut self, key: NavKey) -> KeyOutcome {
        match key {
            NavKey::ArrowRight | NavKey::Space => {
                self.next();
                KeyOutcome::Consumed
            }
            NavKey::ArrowLeft => {
                self.previous();
                KeyOutcome::Consumed
            }
            NavKey::Other => KeyOutcome::Ignored,
        }
    }
}
