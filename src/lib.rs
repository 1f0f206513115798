//! Japanese→English machine translation with bracket-aware normalization
//!
//! Translation itself is delegated to an engine behind the
//! [`MachineTranslator`] trait. This crate owns the text handling around it:
//! escape decoding, input cleanup, bracket detection and output cleanup.

pub mod config;
pub mod mt;
pub mod normalize;

pub use config::{EngineConfig, ServerConfig};
pub use mt::{Ja2En, MachineTranslator, MockMode, MockTranslator, MtError, MtResult, RemoteEngine};
pub use normalize::{
    PreFiltered, decode_escapes, post_filter, pre_filter, split_sentences, wrap_if_bracketed,
};
