// Copyright (c) The dotnet-explorer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by explorer-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// An error that occurs while loading test results from a TRX file.
///
/// Returned by [`parse_results_file`](crate::results::parse_results_file).
/// Either variant abandons the whole file: a report that cannot be read or
/// decoded never produces a partial result list.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseResultsError {
    /// The results file could not be read.
    #[error("failed to read test results at `{path}`")]
    Read {
        /// The path that could not be read.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// The results file is not a well-formed TRX report.
    #[error("failed to parse test results at `{path}`")]
    Parse {
        /// The path that failed to parse.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: quick_trx::ParseError,
    },
}
