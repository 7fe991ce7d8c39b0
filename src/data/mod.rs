//! Signal data models and view-model construction.
//!
//! This module turns raw API records into classified view-models suitable
//! for display.
//!
//! ## Submodules
//!
//! - [`signal`]: Raw records ([`RawSignal`]), the [`Classified`] accessors and
//!   the recursive view-model ([`SignalView`])
//! - [`summary`]: Per-classification counts ([`SignalSummary`])
//!
//! ## Data Flow
//!
//! ```text
//! RawSignal (JSON from the API)
//!        │
//!        ▼
//! SignalView::from_raw()  (recursively, depth-first)
//!        │
//!        ├──▶ Classified::classification() / formatted_value()
//!        │
//!        └──▶ SignalSummary (header counts)
//! ```

pub mod signal;
pub mod summary;

pub use signal::{
    build_views, Classification, Classified, FormattedValue, RawSignal, SignalView,
};
pub use summary::SignalSummary;
