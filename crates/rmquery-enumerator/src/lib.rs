//! # rmquery-enumerator
//!
//! Cursor-based retrieval for resource management services.
//!
//! This crate drives the WS-Enumeration pull protocol (Enumerate, Pull,
//! Release) over a caller-supplied transport and exposes the results in
//! three consumption modes. Filters are produced by [`rmquery`].
//!
//! ## Key Features
//!
//! - **Lazy iteration** - [`SyncSession`] pulls the next page only when needed
//! - **Read-ahead streaming** - [`AsyncSession`] pulls on a worker thread into a bounded queue
//! - **Manual paging** - [`PagedSession`] returns one page per call
//! - **Cursor hygiene** - abandoned or cancelled cursors are released exactly once
//!
//! ## Quick Start
//!
//! ```ignore
//! use rmquery::{ComparisonOperator, XPathBuilder};
//! use rmquery_enumerator::{EnumerationClient, SearchRequest};
//!
//! let query = XPathBuilder::new(&schema, "Person")?
//!     .predicate("Department", ComparisonOperator::Equals, "Sales")?
//!     .build()?;
//!
//! let client = EnumerationClient::new(transport);
//! for person in client.search(&SearchRequest::new(&query), decode_person)? {
//!     println!("{}", person?.display_name);
//! }
//! ```
//!
//! ## With Configuration
//!
//! ```ignore
//! use rmquery_enumerator::{EnumerationClient, EnumerationConfig};
//!
//! let config = EnumerationConfig::builder()
//!     .with_page_size(100)
//!     .with_queue_capacity(250)
//!     .with_include_count(true)
//!     .build();
//!
//! let client = EnumerationClient::with_config(transport, config);
//! let mut stream = client.search_streaming(&request, decode_person)?;
//! let first_ten: Vec<_> = stream.by_ref().take(10).collect();
//! stream.cancel();
//! ```
//!
//! ## Session Lifecycle
//!
//! | Event | Sync / Paged | Async |
//! |-------|--------------|-------|
//! | End of sequence | no Release | no Release |
//! | Dropped early | Release | worker cancelled, Release |
//! | `cancel()` | n/a | Release after current page |
//! | Pull fault | error yielded once, Release | error queued once, Release |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  rmquery-enumerator                       │
//! │                                                           │
//! │  EnumerationClient                                        │
//! │  ├── SearchRequest → Enumerate (EnumerationTransport)    │
//! │  ├── Cursor: owns the context, Pull, Release on drop     │
//! │  └── Sessions: Sync / Async (worker + queue) / Paged     │
//! │                                                           │
//! │  Dependencies:                                            │
//! │  ├── rmquery           - filter dialect compiler         │
//! │  └── crossbeam-channel - bounded worker queue            │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cancel;
mod client;
mod config;
mod error;
mod protocol;
mod request;
mod session;
mod traits;

// Public re-exports
pub use cancel::CancellationToken;
pub use client::EnumerationClient;
pub use config::{
    effective_page_size, EnumerationConfig, EnumerationConfigBuilder, DEFAULT_QUEUE_CAPACITY,
};
pub use error::{EnumerationError, EnumerationResult};
pub use protocol::{
    EnumerateRequest, EnumerateResponse, EnumerationContext, Page, PullResponse, SortAttribute,
    DEFAULT_PAGE_SIZE,
};
pub use request::SearchRequest;
pub use session::{AsyncSession, PagedSession, SyncSession};
pub use traits::{EnumerationTransport, RawRecords, RecordDecoder};
