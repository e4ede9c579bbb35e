//! Domain primitives and services.
//!
//! Purpose: hold the behaviour the adapters expose (greetings, the item
//! listing, the countdown timer) free of HTTP and GraphQL framework types.
//!
//! Public surface:
//! - [`greet`] / [`UserGreeting`]: greeting formatters.
//! - [`TimerService`] / [`TimerStream`] / [`TimerSnapshot`]: countdown producer.
//! - [`Item`] / [`list_items`]: demo item catalogue.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic error payload.
//! - [`TraceId`]: request correlation identifier.

pub mod error;
pub mod greeting;
pub mod items;
pub mod timer;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::greeting::{UserGreeting, greet};
pub use self::items::{Item, ItemListing, list_items};
pub use self::timer::{TimerError, TimerService, TimerSnapshot, TimerStatus, TimerStream};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
