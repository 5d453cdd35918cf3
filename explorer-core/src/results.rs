// Copyright (c) The dotnet-explorer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read TRX reports and correlate outcomes with test names.
//!
//! A TRX report stores each executed test in two places: an outcome record
//! keyed by an opaque test identifier, and a definition mapping that
//! identifier to the class and method names. Display surfaces need both
//! halves at once, so this module joins them into flat [`TestResult`]
//! records, preserving the report's outcome order.

use crate::errors::ParseResultsError;
use camino::Utf8Path;
use indexmap::IndexMap;
use quick_trx::{TestMethod, TestRun};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tracing::debug;

/// One executed test, with its outcome and its names joined together.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// The runner-assigned test identifier. Only ever used as a join key.
    pub id: String,

    /// The outcome string as the runner wrote it, such as `Passed`, `Failed`
    /// or `NotExecuted`.
    pub outcome: String,

    /// The failure or diagnostic message, empty if the record carried none.
    pub message: String,

    /// The stack trace, empty if the record carried none.
    pub stack_trace: String,

    /// The fully qualified name of the class declaring the test. `None` if
    /// the identifier matched no definition with a method descriptor.
    pub class_name: Option<String>,

    /// The name of the test method within that class. `None` if the
    /// identifier matched no definition with a method descriptor.
    pub method_name: Option<String>,
}

impl TestResult {
    /// Returns the fully qualified `Class.Method` name, or `None` for a
    /// result whose identifier was never correlated to a definition.
    pub fn full_name(&self) -> Option<String> {
        match (&self.class_name, &self.method_name) {
            (Some(class_name), Some(method_name)) => Some(format!("{class_name}.{method_name}")),
            _ => None,
        }
    }
}

/// Joins a report's outcome records with its test definitions.
///
/// Returns one [`TestResult`] per outcome record, in the report's order. A
/// record whose identifier matches no definition, or a definition with no
/// method descriptor, keeps `class_name` and `method_name` unset. Duplicate
/// definitions for one identifier keep the last one, and definitions without
/// a matching record are dropped.
pub fn correlate(test_run: &TestRun) -> Vec<TestResult> {
    // The whole lookup is built before any record is named, so a record is
    // never observed with one name filled in and the other missing.
    let names: IndexMap<&str, &TestMethod> = test_run
        .definitions
        .iter()
        .filter_map(|definition| {
            definition
                .test_method
                .as_ref()
                .map(|method| (definition.id.as_str(), method))
        })
        .collect();

    test_run
        .results
        .iter()
        .map(|record| {
            let method = names.get(record.test_id.as_str());
            TestResult {
                id: record.test_id.clone(),
                outcome: record.outcome.clone(),
                message: record.message.clone(),
                stack_trace: record.stack_trace.clone(),
                class_name: method.map(|method| method.class_name.clone()),
                method_name: method.map(|method| method.name.clone()),
            }
        })
        .collect()
}

/// Parses a TRX report and correlates it in one step.
pub fn parse_results(input: impl BufRead) -> Result<Vec<TestResult>, quick_trx::ParseError> {
    let test_run = TestRun::parse(input)?;
    Ok(correlate(&test_run))
}

/// Reads a TRX file and returns its correlated results.
///
/// # Errors
///
/// Returns [`ParseResultsError::Read`] if the file cannot be read, and
/// [`ParseResultsError::Parse`] if its contents are not a well-formed TRX
/// report.
pub async fn parse_results_file(path: &Utf8Path) -> Result<Vec<TestResult>, ParseResultsError> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|error| ParseResultsError::Read {
            path: path.to_owned(),
            error,
        })?;
    let test_run =
        TestRun::parse(contents.as_slice()).map_err(|error| ParseResultsError::Parse {
            path: path.to_owned(),
            error,
        })?;
    let results = correlate(&test_run);
    let named = results.iter().filter(|result| result.class_name.is_some()).count();
    debug!(
        "parsed {} results from `{path}` ({named} named, {} definitions)",
        results.len(),
        test_run.definitions.len(),
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    static TWO_TEST_REPORT: &str = indoc! {r#"
        <?xml version="1.0" encoding="utf-8"?>
        <TestRun xmlns="http://microsoft.com/schemas/VisualStudio/TeamTest/2010">
          <Results>
            <UnitTestResult testId="a1" outcome="Passed" />
            <UnitTestResult testId="a2" outcome="Failed"><Output><ErrorInfo><Message>boom</Message><StackTrace>at Tests.B()</StackTrace></ErrorInfo></Output></UnitTestResult>
          </Results>
          <TestDefinitions>
            <UnitTest id="a1"><TestMethod className="Tests" name="A" /></UnitTest>
            <UnitTest id="a2"><TestMethod className="Tests" name="B" /></UnitTest>
          </TestDefinitions>
        </TestRun>
    "#};

    fn named_result(
        id: &str,
        outcome: &str,
        message: &str,
        stack_trace: &str,
        class_name: &str,
        method_name: &str,
    ) -> TestResult {
        TestResult {
            id: id.to_owned(),
            outcome: outcome.to_owned(),
            message: message.to_owned(),
            stack_trace: stack_trace.to_owned(),
            class_name: Some(class_name.to_owned()),
            method_name: Some(method_name.to_owned()),
        }
    }

    fn unresolved_result(id: &str, outcome: &str) -> TestResult {
        TestResult {
            id: id.to_owned(),
            outcome: outcome.to_owned(),
            message: String::new(),
            stack_trace: String::new(),
            class_name: None,
            method_name: None,
        }
    }

    #[test]
    fn correlates_ids_to_names() {
        let results = parse_results(TWO_TEST_REPORT.as_bytes()).unwrap();
        assert_eq!(
            results,
            vec![
                named_result("a1", "Passed", "", "", "Tests", "A"),
                named_result("a2", "Failed", "boom", "at Tests.B()", "Tests", "B"),
            ],
        );
    }

    #[test]
    fn unmatched_id_stays_unresolved() {
        let input = r#"<TestRun><Results><UnitTestResult testId="ghost" outcome="Passed" /></Results><TestDefinitions><UnitTest id="a1"><TestMethod className="Tests" name="A" /></UnitTest></TestDefinitions></TestRun>"#;
        let results = parse_results(input.as_bytes()).unwrap();
        assert_eq!(results, vec![unresolved_result("ghost", "Passed")]);
        assert_eq!(results[0].full_name(), None);
    }

    #[test]
    fn definition_without_method_descriptor_resolves_nothing() {
        let input = r#"<TestRun><Results><UnitTestResult testId="a1" outcome="Passed" /></Results><TestDefinitions><UnitTest id="a1" /></TestDefinitions></TestRun>"#;
        let results = parse_results(input.as_bytes()).unwrap();
        assert_eq!(results, vec![unresolved_result("a1", "Passed")]);
    }

    #[test]
    fn duplicate_definitions_keep_the_last_one() {
        let input = r#"<TestRun><Results><UnitTestResult testId="a1" outcome="Passed" /></Results><TestDefinitions><UnitTest id="a1"><TestMethod className="Old" name="First" /></UnitTest><UnitTest id="a1"><TestMethod className="New" name="Second" /></UnitTest></TestDefinitions></TestRun>"#;
        let results = parse_results(input.as_bytes()).unwrap();
        assert_eq!(
            results,
            vec![named_result("a1", "Passed", "", "", "New", "Second")],
        );
    }

    #[test]
    fn results_keep_report_order() {
        let input = r#"<TestRun><Results><UnitTestResult testId="z" outcome="Failed" /><UnitTestResult testId="a" outcome="Passed" /><UnitTestResult testId="m" outcome="Passed" /></Results></TestRun>"#;
        let results = parse_results(input.as_bytes()).unwrap();
        let ids: Vec<&str> = results.iter().map(|result| result.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn shared_definition_names_every_matching_record() {
        // Data-driven tests produce several outcome records with one id.
        let input = r#"<TestRun><Results><UnitTestResult testId="a1" outcome="Passed" /><UnitTestResult testId="a1" outcome="Failed" /></Results><TestDefinitions><UnitTest id="a1"><TestMethod className="Tests" name="Rows" /></UnitTest></TestDefinitions></TestRun>"#;
        let results = parse_results(input.as_bytes()).unwrap();
        assert_eq!(
            results,
            vec![
                named_result("a1", "Passed", "", "", "Tests", "Rows"),
                named_result("a1", "Failed", "", "", "Tests", "Rows"),
            ],
        );
    }

    #[test]
    fn full_name_joins_class_and_method() {
        let result = named_result("a1", "Passed", "", "", "Calculator.Tests.MathTests", "Adds");
        assert_eq!(
            result.full_name().as_deref(),
            Some("Calculator.Tests.MathTests.Adds"),
        );
    }

    #[test]
    fn empty_report_correlates_to_nothing() {
        let results = parse_results("<TestRun></TestRun>".as_bytes()).unwrap();
        assert_eq!(results, Vec::<TestResult>::new());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let results = parse_results(TWO_TEST_REPORT.as_bytes()).unwrap();
        assert_eq!(
            serde_json::to_value(&results[1]).unwrap(),
            json!({
                "id": "a2",
                "outcome": "Failed",
                "message": "boom",
                "stackTrace": "at Tests.B()",
                "className": "Tests",
                "methodName": "B",
            }),
        );
    }

    #[tokio::test]
    async fn reads_results_from_disk() {
        let dir = camino_tempfile::tempdir().unwrap();
        let path = dir.path().join("results.trx");
        std::fs::write(&path, TWO_TEST_REPORT).unwrap();

        let results = parse_results_file(&path).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].full_name().as_deref(), Some("Tests.A"));
    }

    #[tokio::test]
    async fn missing_file_reports_a_read_error() {
        let dir = camino_tempfile::tempdir().unwrap();
        let path = dir.path().join("never-written.trx");

        let err = parse_results_file(&path).await.unwrap_err();
        assert!(
            matches!(err, ParseResultsError::Read { path: ref p, .. } if p == &path),
            "got {err:?}",
        );
    }

    #[tokio::test]
    async fn non_xml_file_reports_a_parse_error() {
        let dir = camino_tempfile::tempdir().unwrap();
        let path = dir.path().join("results.trx");
        std::fs::write(&path, "test run went fine, trust me").unwrap();

        let err = parse_results_file(&path).await.unwrap_err();
        assert!(
            matches!(
                err,
                ParseResultsError::Parse {
                    error: quick_trx::ParseError::NoRootElement,
                    ..
                },
            ),
            "got {err:?}",
        );
    }
}
