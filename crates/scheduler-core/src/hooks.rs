//! Named hook channels fired around grading.

use std::collections::BTreeMap;

use review_domain::Card;

/// Hook channels exposed by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HookPoint {
    /// Fired before a grade is processed; skipped on interval previews.
    BeforeRepetition,
    /// Fired after a grade has been committed.
    AfterRepetition,
}

/// A registered hook callable.
pub type Hook = Box<dyn FnMut(&Card)>;

/// Collection of named channels, each carrying hooks run in registration
/// order.
#[derive(Default)]
pub struct HookRegistry {
    channels: BTreeMap<HookPoint, Vec<Hook>>,
}

impl HookRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a hook to the given channel.
    pub fn register(&mut self, point: HookPoint, hook: Hook) {
        self.channels.entry(point).or_default().push(hook);
    }

    /// Fires every hook registered on the channel.
    pub(crate) fn run(&mut self, point: HookPoint, card: &Card) {
        if let Some(hooks) = self.channels.get_mut(&point) {
            for hook in hooks.iter_mut() {
                hook(card);
            }
        }
    }
}
