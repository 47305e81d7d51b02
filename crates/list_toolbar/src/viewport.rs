//! Viewport width notification and the sort affordance chosen from it.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

pub const DEFAULT_MOBILE_BREAKPOINT: u32 = 769;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAffordance {
    /// Compact sort menu shown on narrow viewports.
    Mobile,
    /// Sortable column headers.
    Standard,
}

pub fn select_affordance(width: u32, threshold: u32) -> SortAffordance {
    if width < threshold {
        SortAffordance::Mobile
    } else {
        SortAffordance::Standard
    }
}

/// Publishes the current viewport width to presenters.
pub struct Viewport {
    width: watch::Sender<u32>,
}

impl Viewport {
    pub fn new(width: u32) -> Self {
        let (width, _) = watch::channel(width);
        Self { width }
    }

    pub fn width(&self) -> u32 {
        *self.width.borrow()
    }

    pub fn resize(&self, width: u32) -> bool {
        self.width.send_if_modified(|current| {
            if *current == width {
                false
            } else {
                *current = width;
                true
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.width.subscribe()
    }
}

/// Picks which of the two equivalent sort widgets to show. Never touches the
/// sort itself.
pub struct SortPresenter {
    width: watch::Receiver<u32>,
    threshold: u32,
    last: SortAffordance,
}

impl SortPresenter {
    pub fn new(width: watch::Receiver<u32>, threshold: u32) -> Self {
        let last = select_affordance(*width.borrow(), threshold);
        Self {
            width,
            threshold,
            last,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn current(&self) -> SortAffordance {
        select_affordance(*self.width.borrow(), self.threshold)
    }

    /// Resolves when the affordance flips; `None` once the viewport is gone.
    pub async fn changed(&mut self) -> Option<SortAffordance> {
        loop {
            self.width.changed().await.ok()?;
            let width = *self.width.borrow_and_update();
            let next = select_affordance(width, self.threshold);
            if next != self.last {
                debug!(width, affordance = ?next, "viewport: sort affordance changed");
                self.last = next;
                return Some(next);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/viewport_tests.rs"]
mod tests;
