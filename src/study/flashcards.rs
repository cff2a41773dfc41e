use std::{
    collections::BTreeSet,
    fmt,
    sync::Arc,
    time::{
        Duration,
        Instant,
    },
};

use rand::seq::SliceRandom;

use super::swipe::SwipeDirection;
use crate::{
    core::RadicalRecord,
    radicals::RadicalTable,
};

pub const DEFAULT_AUTOPLAY_PERIOD: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Strokes(u8),
    Popular,
    All,
    Random,
    Difficult,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Strokes(1) => write!(f, "1 stroke"),
            Group::Strokes(n) => write!(f, "{} strokes", n),
            Group::Popular => write!(f, "Popular"),
            Group::All => write!(f, "All"),
            Group::Random => write!(f, "Random"),
            Group::Difficult => write!(f, "Difficult"),
        }
    }
}

/// Cursor over one group of radicals, with an optional autoplay deadline.
/// Driven by the UI loop through `tick`.
#[derive(Debug, Clone)]
pub struct Flashcards {
    radicals: Arc<RadicalTable>,
    group: Group,
    order: Vec<u32>,
    index: usize,
    period: Duration,
    next_advance: Option<Instant>, // Some while autoplay is on
}

impl Flashcards {
    pub fn new(radicals: Arc<RadicalTable>, period: Duration) -> Self {
        let order = radicals.all_ids();
        Self { radicals, group: Group::All, order, index: 0, period, next_advance: None }
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn order(&self) -> &[u32] {
        &self.order
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.order.len()
    }

    pub fn current_id(&self) -> Option<u32> {
        self.order.get(self.index).copied()
    }

    pub fn current(&self) -> Option<&RadicalRecord> {
        self.current_id().and_then(|id| self.radicals.get(id))
    }

    fn ids_for(&self, group: Group, difficult: &BTreeSet<u32>) -> Vec<u32> {
        match group {
            Group::Strokes(n) => self.radicals.ids_with_strokes(n),
            Group::Popular => self.radicals.popular_ids(),
            Group::All => self.radicals.all_ids(),
            Group::Random => {
                let mut ids = self.radicals.all_ids();
                ids.shuffle(&mut rand::rng());
                ids
            }
            Group::Difficult => {
                self.radicals.all_ids().into_iter().filter(|id| difficult.contains(id)).collect()
            }
        }
    }

    /// Switches group, back to the first card, and stops autoplay.
    /// Selecting the random group always reshuffles.
    pub fn select_group(&mut self, group: Group, difficult: &BTreeSet<u32>) {
        self.order = self.ids_for(group, difficult);
        self.group = group;
        self.index = 0;
        self.next_advance = None;
    }

    /// Rebuilds the difficult group after the bookmark set changed, keeping
    /// the position when possible.
    pub fn refresh_difficult(&mut self, difficult: &BTreeSet<u32>) {
        if self.group != Group::Difficult {
            return;
        }
        let current = self.current_id();
        self.order = self.ids_for(Group::Difficult, difficult);
        self.index = current
            .and_then(|id| self.order.iter().position(|&o| o == id))
            .unwrap_or(0)
            .min(self.order.len().saturating_sub(1));
    }

    pub fn first(&mut self) {
        self.index = 0;
    }

    pub fn next(&mut self) {
        let total = self.total();
        if total > 0 {
            self.index = (self.index + 1) % total;
        }
    }

    pub fn prev(&mut self) {
        let total = self.total();
        if total > 0 {
            self.index = (self.index + total - 1) % total;
        }
    }

    pub fn go_to(&mut self, index: usize) {
        let total = self.total();
        if total > 0 {
            self.index = index % total;
        }
    }

    pub fn apply_swipe(&mut self, direction: SwipeDirection) {
        match direction {
            SwipeDirection::Left => self.next(),
            SwipeDirection::Right => self.prev(),
        }
    }

    pub fn is_autoplaying(&self) -> bool {
        self.next_advance.is_some()
    }

    pub fn set_autoplay(&mut self, enabled: bool, now: Instant) {
        self.next_advance = enabled.then(|| now + self.period);
    }

    pub fn toggle_autoplay(&mut self, now: Instant) {
        self.set_autoplay(!self.is_autoplaying(), now);
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// Advances once when the autoplay deadline has passed. Returns whether
    /// the card changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.next_advance {
            Some(deadline) if now >= deadline => {
                self.next();
                self.next_advance = Some(now + self.period);
                true
            }
            _ => false,
        }
    }

    /// Time left before the next automatic advance.
    pub fn time_until_advance(&self, now: Instant) -> Option<Duration> {
        self.next_advance.map(|deadline| deadline.saturating_duration_since(now))
    }
}
