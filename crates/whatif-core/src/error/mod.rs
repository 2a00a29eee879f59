//! Error types for the What If gateway
//!
//! Every fallible operation in `whatif-core` returns [`WhatIfResult`]. Provider
//! failures are classified into an [`ErrorKind`] so the usage monitor can count
//! them without keeping the full error around.

mod classifiers;
mod constructors;
mod conversions;
mod types;

pub use classifiers::ErrorKind;
pub use types::{WhatIfError, WhatIfResult};
