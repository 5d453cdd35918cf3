// Copyright (c) The dotnet-explorer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// An error that occurs while parsing a [`TestRun`](crate::TestRun).
///
/// These are structural failures that reject the whole document. Content the
/// model doesn't know about is skipped, and missing attributes or absent
/// optional elements degrade to empty values rather than erroring.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The document is not well-formed XML.
    #[error("malformed XML in TRX report")]
    Xml(#[from] quick_xml::Error),

    /// The input contains no XML elements at all.
    #[error("input contains no XML elements")]
    NoRootElement,

    /// The document ended while an element was still open.
    #[error("document ended before `{element}` was closed")]
    UnclosedElement {
        /// The name of the innermost element left open.
        element: String,
    },
}
