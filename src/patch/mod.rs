//! Patch module - resolve placeholder links in diagram SVG output
//!
//! Diagram renderers emit cross-reference links as
//! <a href="\ref" xlink:href="\ref"><text>Name</text></a>
//! This module turns them into real links, or into a click handler that
//! reports the name to the hosting page when it cannot be resolved.

pub mod api;
pub mod label;
pub mod locate;
pub mod patcher;
pub mod scan;
pub mod sentinel;
pub mod tag;

pub use patcher::{
    AnchorOutcome, AnchorPatcher, AnchorStatus, FileReport, PatchOptions, PatchReport, WriteMode,
};
