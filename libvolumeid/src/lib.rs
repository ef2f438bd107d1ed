//! Cached byte access and identifier formatting for block device probing.
//!
//! A filesystem parser holds a [`ProbeState`] over an open byte source and asks
//! it for byte ranges with [`ProbeState::get_bytes`]. Labels and UUIDs found in
//! those bytes are normalized into a [`ProbeResult`].

pub mod config;
pub mod probe;
pub mod result;
pub mod util;
pub mod volume_id;


use thiserror::Error;

pub use crate::{
    config::ProbeConfig,
    probe::ProbeState,
    result::{PartitionResult, ProbeResult, UsageType},
    util::Endianness,
    volume_id::{UuidFormat, VolumeId32, VolumeId64, VolumeUuid},
};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeIdError {
    #[error("Requested bytes are not available")]
    NotAvailable,
    #[error("Invalid probe configuration: {0}")]
    InvalidConfig(&'static str),
}
