//! fleet
//!
//! Status aggregation across many independent working copies.
//!
//! # Pipeline
//!
//! ```text
//! RepositoryLocationSet --resolve--> [RepositoryHandle]
//!     --classify (per handle, DivergenceCalculator per branch pair)-->
//!     [RepositoryStateFlags] --summarize--> FleetCounts
//! ```
//!
//! Every refresh runs the whole pipeline from scratch on the caller's
//! thread. Handles carry no state between refreshes, and a failure in one
//! repository never stops the others from being classified.
//!
//! # Modules
//!
//! - [`locator`] - location set to repository handles
//! - [`divergence`] - ahead/behind counts for a branch pair
//! - [`classify`] - per-repository state flags
//! - [`summary`] - fleet-wide counters and per-category listings
//! - [`report`] - verbose per-repository records, CSV and text output

pub mod classify;
pub mod divergence;
pub mod locator;
pub mod report;
pub mod summary;

pub use classify::{classify, classify_repo, RepositoryStateFlags};
pub use divergence::{calculate_divergence, Divergence, DivergenceCalculator};
pub use locator::{resolve, RepositoryHandle};
pub use report::{collect_all, write_csv, RepositoryReport};
pub use summary::{classify_all, summarize, FleetCounts, FleetDetails};
