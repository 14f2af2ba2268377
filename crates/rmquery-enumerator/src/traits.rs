//! Traits for the collaborators an enumeration needs.
//!
//! This module defines the [`EnumerationTransport`] trait, implemented by
//! whatever speaks the wire protocol, and [`RecordDecoder`], which turns raw
//! page items into caller records.
//!
//! # Architecture Note
//!
//! This crate does not build envelopes, authenticate or translate faults.
//! A transport does all of that and hands back already-parsed responses.
//!
//! # Example: Implementing EnumerationTransport over a SOAP client
//!
//! ```ignore
//! use rmquery_enumerator::{
//!     EnumerateRequest, EnumerateResponse, EnumerationContext, EnumerationResult,
//!     EnumerationTransport, PullResponse,
//! };
//!
//! impl EnumerationTransport for SoapClient {
//!     type Item = XmlElement;
//!
//!     fn enumerate(&self, request: &EnumerateRequest) -> EnumerationResult<EnumerateResponse<XmlElement>> {
//!         let body = self.enumerate_body(&request.filter_envelope(), request.max_elements);
//!         self.call("Enumerate", body).and_then(parse_enumerate_response)
//!     }
//!
//!     fn pull(&self, context: &EnumerationContext, max_elements: u32) -> EnumerationResult<PullResponse<XmlElement>> {
//!         self.call("Pull", self.pull_body(context.as_str(), max_elements))
//!             .and_then(parse_pull_response)
//!     }
//!
//!     fn release(&self, context: EnumerationContext) -> EnumerationResult<()> {
//!         self.call("Release", self.release_body(context.as_str())).map(|_| ())
//!     }
//! }
//! ```

use std::sync::Arc;

use crate::error::EnumerationResult;
use crate::protocol::{EnumerateRequest, EnumerateResponse, EnumerationContext, PullResponse};

/// The three calls of the pull protocol.
///
/// Implementations must be callable from a streaming worker thread, hence
/// `Send + Sync`. A single context is never presented to two calls at once.
pub trait EnumerationTransport: Send + Sync {
    /// Raw record type carried in pages.
    type Item: Send + 'static;

    /// Starts a filtered cursor and returns its first page.
    fn enumerate(
        &self,
        request: &EnumerateRequest,
    ) -> EnumerationResult<EnumerateResponse<Self::Item>>;

    /// Fetches the next page. `context` must be the most recently issued one.
    fn pull(
        &self,
        context: &EnumerationContext,
        max_elements: u32,
    ) -> EnumerationResult<PullResponse<Self::Item>>;

    /// Discards a cursor on the server.
    fn release(&self, context: EnumerationContext) -> EnumerationResult<()>;
}

impl<T: EnumerationTransport + ?Sized> EnumerationTransport for Arc<T> {
    type Item = T::Item;

    fn enumerate(
        &self,
        request: &EnumerateRequest,
    ) -> EnumerationResult<EnumerateResponse<Self::Item>> {
        (**self).enumerate(request)
    }

    fn pull(
        &self,
        context: &EnumerationContext,
        max_elements: u32,
    ) -> EnumerationResult<PullResponse<Self::Item>> {
        (**self).pull(context, max_elements)
    }

    fn release(&self, context: EnumerationContext) -> EnumerationResult<()> {
        (**self).release(context)
    }
}

/// Converts one raw page item into a caller record.
///
/// Closures of the form `Fn(I) -> EnumerationResult<T>` implement this
/// trait, so most callers never name it.
pub trait RecordDecoder<I>: Send + Sync {
    /// Decoded record type.
    type Output;

    /// Decodes one item. Called once per item, in server order.
    fn decode(&self, item: I) -> EnumerationResult<Self::Output>;
}

impl<I, T, F> RecordDecoder<I> for F
where
    F: Fn(I) -> EnumerationResult<T> + Send + Sync,
{
    type Output = T;

    fn decode(&self, item: I) -> EnumerationResult<T> {
        self(item)
    }
}

/// Decoder that yields raw items unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawRecords;

impl<I> RecordDecoder<I> for RawRecords {
    type Output = I;

    fn decode(&self, item: I) -> EnumerationResult<I> {
        Ok(item)
    }
}
