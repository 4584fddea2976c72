#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/comove-rs/comove/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod calendar;
pub use calendar::Frequency;

mod strategy;
pub use strategy::FillStrategy;

mod resample;
pub use resample::ResampleEngine;

mod error;
pub use error::ResampleError;
