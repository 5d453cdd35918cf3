// Copyright (c) The dotnet-explorer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read Visual Studio TRX test reports in Rust.
//!
//! TRX is the XML report format written by VSTest-based runners such as
//! `dotnet test --logger trx`. This crate reads the two sections that test
//! tooling cares about, executed-test outcome records and declared-test
//! definitions, into a [`TestRun`] and skips over everything else.

mod errors;
mod parse;
mod report;

pub use errors::*;
pub use report::*;
