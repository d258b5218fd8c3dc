// SPDX-License-Identifier: MPL-2.0
//! `photo_swipe` is a swipe-to-sort review engine for photo libraries.
//!
//! Photos are paged in from an external library in fixed-size batches, each
//! one is swiped into a bucket, swipes can be undone, and the buckets are
//! finally committed as album additions or a batch delete.
//!
//! The library, its preview decoder and its album store are ports
//! ([`application::port`]); [`infrastructure`] provides an in-memory library
//! and a directory-backed one.

#![doc(html_root_url = "https://docs.rs/photo_swipe/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{Error, Result};
