//! API client library for cinegate.
//!
//! Provides the OMDb search/detail client and the catalog record
//! types shared by the gateway and the client-side store.

/// OMDb API client.
pub mod omdb;
