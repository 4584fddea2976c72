#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/comove-rs/comove/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod rolling;
pub use rolling::rolling_pearson;

mod interpolate;
pub use interpolate::interpolate_linear;

mod error;
pub use error::MathError;
