//! URL hygiene for the crawler
//!
//! This module provides URL canonicalization, relative resolution,
//! admission filtering, and origin comparison. All functions are pure;
//! admission and robots decisions stay with the caller.

mod admit;
mod normalize;
mod origin;

pub use admit::{admissible, same_origin};
pub use normalize::{canonicalize, resolve};
pub use origin::origin_key;
