#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/comove-rs/comove/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{
    DEFAULT_PARTITION_COUNT, DEFAULT_WINDOW, ENTITY_RETURNS_FILE, MARKET_RETURNS_FILE,
    PipelineConfig, RESULT_FILE, STORE_DIR,
};

pub mod dataset;

mod panel;
pub use panel::{entity_frame, load_entity_panel, load_reference, reference_frame};

mod pipeline;
pub use pipeline::{PipelineReport, run_pipeline};

mod error;
pub use error::PipelineError;
