// Copyright (c) The dotnet-explorer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for dotnet-explorer: turn raw `dotnet test` artifacts
//! into the answers a test explorer needs.
//!
//! Two independent pieces live here. [`results`] reads a TRX report and
//! correlates its outcome records with its test definitions, producing fully
//! named [`TestResult`](results::TestResult) records. [`context`] maps a
//! cursor position in a source document to the test method or test class at
//! that position, so "run the test under the cursor" knows what to run.

pub mod context;
pub mod errors;
pub mod results;

/// Re-export of the TRX report model consumed by [`results`].
pub use quick_trx;
