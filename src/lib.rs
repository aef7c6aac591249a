//! Lodestone: sequence and object utilities with JavaScript value semantics
//!
//! Lodestone provides ordered-sequence and object helpers that behave the way
//! JavaScript's utility belts behave: nullish inputs degrade to empty results,
//! out-of-range reads yield `Undefined`, equality is SameValueZero unless
//! stated otherwise, and the pure/mutating split of every operation is part
//! of its contract. On top of the helpers sits a deterministic chunked work
//! scheduler driven by a virtual clock.
//!
//! # Quick Start
//!
//! ```
//! use lodestone::{partition, seq};
//!
//! let data = seq::range(0, 10);
//! let chunks = partition::chunk(&data, 3);
//! assert_eq!(seq::size(&chunks), 4);
//! assert_eq!(seq::flatten(&chunks), data);
//! ```
//!
//! # Module Overview
//!
//! | Category | Modules |
//! |----------|---------|
//! | **Core** | [`value`], [`error`](Error) |
//! | **Operations** | [`seq`], [`object`], [`partition`] |
//! | **Scheduling** | [`scheduler`] |

pub mod error;
pub mod object;
pub mod partition;
pub mod scheduler;
pub mod seq;
pub mod value;

pub use error::{Error, Result};
pub use value::Value;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
