#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/comove-rs/comove/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod correlate;
pub use correlate::CorrelationEngine;

mod error;
pub use error::RollingError;
