// Copyright (c) The dotnet-explorer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Map a cursor position in a source document to the test at that position.
//!
//! Editors hand over a tree of document symbols; [`flatten_symbols`] turns it
//! into a flat sequence of [`TestSymbol`] values with qualified names, and
//! [`find_test_in_context`] picks the test method or test class whose range
//! contains the cursor.

mod resolve;
mod symbols;

pub use resolve::*;
pub use symbols::*;
