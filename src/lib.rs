//! refpatch - resolve placeholder cross-reference links in diagram SVG output
//!
//! refpatch provides:
//! - Anchor patching for `href="\ref"` / `xlink:href="\ref"` placeholders
//! - A resolver trait plus a JSON reference table implementation
//! - A unified result model with jsonl/json/md/raw output

pub mod core;
pub mod error;
pub mod logging;
pub mod patch;
pub mod resolve;

pub use error::{PatchError, RefTableError};
pub use patch::{AnchorPatcher, PatchOptions, PatchReport};
pub use resolve::{RefResolver, RefTable, RefTarget, ResolveContext};
