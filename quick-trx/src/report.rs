// Copyright (c) The dotnet-explorer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{errors::ParseError, parse::parse_test_run};
use std::io::BufRead;

/// The contents of a TRX report relevant to test tooling.
///
/// A TRX file records each executed test twice: once as an outcome record
/// carrying the result, and once as a definition carrying the names. The two
/// are linked by an opaque test identifier. `TestRun` holds both sections
/// verbatim and leaves joining them to the caller.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TestRun {
    /// The outcome records (`UnitTestResult` elements), in document order.
    pub results: Vec<UnitTestResult>,

    /// The test definitions (`UnitTest` elements), in document order.
    pub definitions: Vec<UnitTest>,
}

impl TestRun {
    /// Parses a TRX report from a buffered reader.
    ///
    /// Parsing is lenient about content: elements and attributes outside the
    /// model are skipped, and missing attributes come back as empty strings.
    /// It is strict about structure: input that is not well-formed XML, or not
    /// XML at all, is rejected with a [`ParseError`].
    pub fn parse(input: impl BufRead) -> Result<Self, ParseError> {
        parse_test_run(input)
    }

    /// Parses a TRX report from a string.
    pub fn parse_str(input: &str) -> Result<Self, ParseError> {
        Self::parse(input.as_bytes())
    }
}

/// The outcome of one executed test: a `UnitTestResult` element.
///
/// Only the identifier carries meaning for correlation. The other fields are
/// runner-produced text, passed through unmodified.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UnitTestResult {
    /// The runner-assigned test identifier, linking this record to a
    /// [`UnitTest`] definition. Empty if the attribute is missing.
    pub test_id: String,

    /// The outcome string as the runner wrote it, such as `Passed`, `Failed`
    /// or `NotExecuted`. Empty if the attribute is missing.
    pub outcome: String,

    /// The failure or diagnostic message. Empty if the record has no
    /// `Message` element.
    pub message: String,

    /// The stack trace for a failed test. Empty if the record has no
    /// `StackTrace` element.
    pub stack_trace: String,
}

/// The definition of one declared test: a `UnitTest` element.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UnitTest {
    /// The test identifier referenced by [`UnitTestResult::test_id`]. Empty
    /// if the attribute is missing.
    pub id: String,

    /// The method descriptor naming the test, if the definition has a
    /// `TestMethod` child.
    pub test_method: Option<TestMethod>,
}

/// The method descriptor of a test definition: a `TestMethod` element.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TestMethod {
    /// The fully qualified name of the class declaring the test. Empty if
    /// the attribute is missing.
    pub class_name: String,

    /// The name of the test method within that class. Empty if the attribute
    /// is missing.
    pub name: String,
}
