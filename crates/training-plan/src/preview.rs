use crate::estimate::MeasuredHeights;
use crate::options::PageSetup;
use crate::paginate::{Pagination, paginate};
use crate::store::SessionStore;

/// Keeps the on-screen pagination in step with the store.
///
/// The pagination is recomputed only when the store revision or the measured
/// heights change; otherwise the cached result is returned. Each
/// recomputation replaces the previous result entirely.
#[derive(Debug, Clone)]
pub struct PreviewPager {
    setup: PageSetup,
    stamp: Option<(u64, u64)>,
    pagination: Option<Pagination>,
}

impl PreviewPager {
    pub fn new(setup: PageSetup) -> Self {
        Self {
            setup,
            stamp: None,
            pagination: None,
        }
    }

    pub fn setup(&self) -> &PageSetup {
        &self.setup
    }

    /// Replace the page setup and drop the cached result
    pub fn set_setup(&mut self, setup: PageSetup) {
        self.setup = setup;
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.stamp = None;
        self.pagination = None;
    }

    /// True when the next `pages` call will recompute
    pub fn is_stale(&self, store: &SessionStore, heights: &MeasuredHeights) -> bool {
        self.stamp != Some((store.revision(), heights.generation()))
    }

    pub fn pages(&mut self, store: &SessionStore, heights: &MeasuredHeights) -> &Pagination {
        let stamp = (store.revision(), heights.generation());
        let pagination = match self.pagination.take() {
            Some(cached) if self.stamp == Some(stamp) => cached,
            _ => {
                log::debug!(
                    "Repaginating preview (revision {}, measurements {})",
                    stamp.0,
                    stamp.1
                );
                self.stamp = Some(stamp);
                let budget = self.setup.budget_for(store.session());
                paginate(store.exercises(), heights, &budget)
            }
        };
        self.pagination.insert(pagination)
    }
}

impl Default for PreviewPager {
    fn default() -> Self {
        Self::new(PageSetup::preview())
    }
}
