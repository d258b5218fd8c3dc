// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`buffer`], [`loader`]: Ordered review buffer and the batch loader
//!   filling it
//! - [`session`], [`undo`]: Cursor, swipe routing and bounded undo
//! - [`commit`]: Turning buckets into album mutations
//! - [`controller`]: Single owner wiring the above to the ports
//! - [`query`], [`album_edit`]: Album overview and album editing
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - Binaries and front ends drive the [`controller::ReviewController`]
//!
//! # Example
//!
//! ```ignore
//! let library = Arc::new(MemoryLibrary::with_photos(&["a", "b", "c"]));
//! let mut review =
//!     ReviewController::open(&*library, &*library, library.clone(), &Config::default()).await?;
//!
//! review.swipe(GestureVector::new(-150.0, 0.0))?;
//! let report = review.commit(&*library).await;
//! ```

pub mod album_edit;
pub mod buffer;
pub mod commit;
pub mod controller;
pub mod loader;
pub mod port;
pub mod query;
pub mod session;
pub mod undo;
