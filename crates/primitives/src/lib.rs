#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/comove-rs/comove/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod entity;
pub use entity::EntityId;

mod observation;
pub use observation::{EntityReturn, ReferenceReturn};

pub mod schema;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
