//! Training session plans: the session model, its store, and the pagination
//! of exercise blocks onto printed or previewed pages.

pub mod constants;
mod estimate;
mod import;
#[cfg(feature = "serde")]
mod io;
mod options;
mod paginate;
mod preview;
mod store;
mod summary;
mod types;

pub use estimate::{EstimateProfile, HeightEstimator, HeightProvider, MeasuredHeights, Unmeasured};
pub use import::{load_exercises_from_csv, parse_exercises};
#[cfg(feature = "serde")]
pub use io::{load_session, save_session};
pub use options::*;
pub use paginate::{PageBudget, PageGroup, PageKind, Pagination, paginate, used_height};
pub use preview::PreviewPager;
pub use store::SessionStore;
pub use summary::*;
pub use types::*;
