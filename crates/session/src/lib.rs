//! Page-session coordinator for the cross-visitation dashboard page.
//!
//! [`PageSession`] owns the whole filter state of one page instance:
//! periods, fetched entities, derived selections and request status. It
//! merges four asynchronously arriving override sources — URL parameters,
//! persisted per-user preferences, freshly fetched domain data and named
//! presets — into one consistent displayable state.
//!
//! Single-threaded and cooperative: all work happens as reactions on the
//! session's own task; only the service calls suspend. Background tasks
//! (settings-status notifications, preset recombination) are torn down
//! together through one page-scoped cancellation token.

pub mod accumulator;
pub mod fetch;
pub mod presets;
pub mod session;
pub mod settings;
pub mod status;

pub use accumulator::DefaultFilterAccumulator;
pub use session::{PageSession, SessionServices};
pub use settings::PageSettings;
pub use status::{ParamRequestStatus, RequestStatus};
