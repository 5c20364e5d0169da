//! Two-pulley **synchronous belt drive** layout: tooth-count selection,
//! pitch/root/tip radius derivation, the external-tangent belt path with
//! arc-length frames along it, belt element counts, and engineering
//! diagnostics, plus a CSV summary export.
//!
//! The happy path is [`layout::plan_drive`]: hand it a
//! [`config::DriveConfig`] and get back a [`layout::DriveLayout`] carrying
//! both pulleys, the closed path, sampled frames, and any warnings.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for multithreading
//! - **serde**: serialize/deserialize configuration and results

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod export;
pub mod float_types;
pub mod frame;
pub mod layout;
pub mod links;
pub mod pair;
pub mod path;
pub mod pulley;
pub mod ratio;
pub mod validate;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use config::{CenterDistanceSource, DriveConfig, ToothSelection};
pub use errors::{BeltError, BeltResult, GeometryError, ValidationIssue};
pub use layout::{DriveLayout, plan_drive};
pub use path::BeltPath;
pub use pulley::{BeltGeometry, PulleyRole, PulleySpec};
pub use ratio::{RatioSearch, RatioSolution};
