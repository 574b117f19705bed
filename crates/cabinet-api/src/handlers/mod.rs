// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`health`]: Liveness probe
//! - [`users`]: User listing and lookup
//! - [`documents`]: Per-owner document listing

mod documents;
mod health;
mod users;

pub use documents::*;
pub use health::*;
pub use users::*;
