//! # comove
//!
//! Batch pipeline computing rolling co-movement of irregular entity return
//! panels against a shared market reference series.
//!
//! This crate provides a unified interface to the comove component
//! ecosystem. Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Core type definitions and column schema
//! - `math`: Rolling statistics and interpolation kernels
//! - `resample`: Business-day grid alignment with fill strategies
//! - `store`: Partitioned parquet persistence
//! - `rolling`: Per-entity rolling correlation
//! - `pipeline`: End-to-end orchestration and dataset generation
//! - `cli`: The `comove` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! // With default features (all components):
//! use comove::pipeline;
//! use comove::store;
//!
//! // Or with specific features only:
//! // [dependencies]
//! // comove = { version = "0.1", default-features = false, features = ["rolling"] }
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use comove_primitives as primitives;
#[cfg(feature = "math")]
#[doc(inline)]
pub use comove_math as math;
#[cfg(feature = "resample")]
#[doc(inline)]
pub use comove_resample as resample;
#[cfg(feature = "store")]
#[doc(inline)]
pub use comove_store as store;
#[cfg(feature = "rolling")]
#[doc(inline)]
pub use comove_rolling as rolling;
#[cfg(feature = "pipeline")]
#[doc(inline)]
pub use comove_pipeline as pipeline;
