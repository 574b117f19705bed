// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! - [`GateMiddleware`]: token verification and access rules

mod gate;

pub use gate::{target_segment, Gate, GateLayer, GateMiddleware, GateOutcome, DEFAULT_AUTH_HEADER};
