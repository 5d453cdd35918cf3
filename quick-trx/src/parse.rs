// Copyright (c) The dotnet-explorer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::ParseError,
    report::{TestMethod, TestRun, UnitTest, UnitTestResult},
};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use std::io::BufRead;

const UNIT_TEST_RESULT_TAG: &[u8] = b"UnitTestResult";
const UNIT_TEST_TAG: &[u8] = b"UnitTest";
const TEST_METHOD_TAG: &[u8] = b"TestMethod";
const MESSAGE_TAG: &[u8] = b"Message";
const STACK_TRACE_TAG: &[u8] = b"StackTrace";

pub(crate) fn parse_test_run(input: impl BufRead) -> Result<TestRun, ParseError> {
    let mut reader = Reader::from_reader(input);
    let mut parser = TrxParser::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            event => parser.handle_event(event)?,
        }
        buf.clear();
    }
    parser.finish()
}

/// Which text-bearing element is being captured.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TextKind {
    Message,
    StackTrace,
}

impl TextKind {
    fn tag(self) -> &'static [u8] {
        match self {
            TextKind::Message => MESSAGE_TAG,
            TextKind::StackTrace => STACK_TRACE_TAG,
        }
    }
}

/// An in-progress text capture. Runs from the `Message` or `StackTrace` start
/// tag to the matching end tag, gathering all text in between, nested
/// elements included.
#[derive(Debug)]
struct TextCapture {
    kind: TextKind,
    /// Number of open elements surrounding the captured element, used to
    /// recognize its end tag.
    depth: usize,
    text: String,
}

#[derive(Debug, Default)]
struct ResultBuilder {
    test_id: String,
    outcome: String,
    message: Option<String>,
    stack_trace: Option<String>,
}

impl ResultBuilder {
    fn build(self) -> UnitTestResult {
        UnitTestResult {
            test_id: self.test_id,
            outcome: self.outcome,
            message: self.message.unwrap_or_default(),
            stack_trace: self.stack_trace.unwrap_or_default(),
        }
    }
}

#[derive(Debug)]
struct DefinitionBuilder {
    id: String,
    test_method: Option<TestMethod>,
    /// Number of open elements surrounding the `UnitTest` element, used to
    /// recognize direct children.
    depth: usize,
}

impl DefinitionBuilder {
    fn build(self) -> UnitTest {
        UnitTest {
            id: self.id,
            test_method: self.test_method,
        }
    }
}

/// Streaming parser state.
///
/// Outcome records nest in real reports: a data-driven test wraps one
/// `UnitTestResult` per data row in `InnerResults` under the parent record.
/// Every record is kept in start-tag document order, and `open_results` holds
/// the indices of those whose elements are still open, so a `Message` or
/// `StackTrace` anywhere in a record's subtree can be handed to it. Each
/// record takes the first matching element in its subtree and ignores later
/// ones.
#[derive(Debug, Default)]
struct TrxParser {
    /// Names of the currently open elements, outermost first.
    open_elements: Vec<String>,
    results: Vec<ResultBuilder>,
    /// Indices into `results` for elements still open, outermost first.
    open_results: Vec<usize>,
    definitions: Vec<DefinitionBuilder>,
    /// Indices into `definitions` for elements still open, outermost first.
    open_definitions: Vec<usize>,
    capture: Option<TextCapture>,
    saw_element: bool,
}

impl TrxParser {
    fn handle_event(&mut self, event: Event<'_>) -> Result<(), ParseError> {
        match event {
            Event::Start(tag) => {
                self.saw_element = true;
                if self.capture.is_none() {
                    self.open_element(&tag, false)?;
                }
                self.open_elements
                    .push(String::from_utf8_lossy(tag.name().as_ref()).into_owned());
            }
            Event::Empty(tag) => {
                self.saw_element = true;
                if self.capture.is_none() {
                    self.open_element(&tag, true)?;
                }
            }
            Event::End(tag) => {
                self.open_elements.pop();
                self.close_element(tag.name().as_ref());
            }
            Event::Text(text) => {
                if let Some(capture) = &mut self.capture {
                    capture.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(cdata) => {
                if let Some(capture) = &mut self.capture {
                    capture
                        .text
                        .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            // XML declarations, comments, processing instructions and
            // doctypes carry nothing the model needs.
            _ => {}
        }
        Ok(())
    }

    /// Handles a start or self-closing tag. Never called while a text capture
    /// is active: markup inside `Message` or `StackTrace` is opaque text.
    fn open_element(&mut self, tag: &BytesStart<'_>, is_empty: bool) -> Result<(), ParseError> {
        match tag.name().as_ref() {
            UNIT_TEST_RESULT_TAG => {
                self.results.push(ResultBuilder {
                    test_id: attr_value(tag, "testId")?,
                    outcome: attr_value(tag, "outcome")?,
                    message: None,
                    stack_trace: None,
                });
                if !is_empty {
                    self.open_results.push(self.results.len() - 1);
                }
            }
            UNIT_TEST_TAG => {
                self.definitions.push(DefinitionBuilder {
                    id: attr_value(tag, "id")?,
                    test_method: None,
                    depth: self.open_elements.len(),
                });
                if !is_empty {
                    self.open_definitions.push(self.definitions.len() - 1);
                }
            }
            TEST_METHOD_TAG => {
                if let Some(&index) = self.open_definitions.last() {
                    let definition = &mut self.definitions[index];
                    // Only a direct child of `UnitTest` names the test, and
                    // the first one wins.
                    if self.open_elements.len() == definition.depth + 1
                        && definition.test_method.is_none()
                    {
                        definition.test_method = Some(TestMethod {
                            class_name: attr_value(tag, "className")?,
                            name: attr_value(tag, "name")?,
                        });
                    }
                }
            }
            MESSAGE_TAG => self.start_capture(TextKind::Message, is_empty),
            STACK_TRACE_TAG => self.start_capture(TextKind::StackTrace, is_empty),
            _ => {}
        }
        Ok(())
    }

    fn start_capture(&mut self, kind: TextKind, is_empty: bool) {
        // Text elements outside any outcome record, such as run-level
        // messages under `ResultSummary`, have nowhere to go.
        if self.open_results.is_empty() {
            return;
        }
        if is_empty {
            self.assign_text(kind, "");
        } else {
            self.capture = Some(TextCapture {
                kind,
                depth: self.open_elements.len(),
                text: String::new(),
            });
        }
    }

    /// Handles an end tag, after it has been popped off `open_elements`.
    fn close_element(&mut self, name: &[u8]) {
        if let Some(capture) = &self.capture {
            if self.open_elements.len() == capture.depth && name == capture.kind.tag() {
                let TextCapture { kind, text, .. } =
                    self.capture.take().expect("capture was just checked");
                self.assign_text(kind, &text);
            }
            // Any other end tag is markup nested within the captured text.
            return;
        }

        match name {
            UNIT_TEST_RESULT_TAG => {
                self.open_results.pop();
            }
            UNIT_TEST_TAG => {
                self.open_definitions.pop();
            }
            _ => {}
        }
    }

    /// Hands captured text to every open record that has not yet seen an
    /// element of this kind. Captures finish in document order, so each
    /// record ends up with the first `Message` and `StackTrace` in its
    /// subtree.
    fn assign_text(&mut self, kind: TextKind, text: &str) {
        for &index in &self.open_results {
            let builder = &mut self.results[index];
            let slot = match kind {
                TextKind::Message => &mut builder.message,
                TextKind::StackTrace => &mut builder.stack_trace,
            };
            if slot.is_none() {
                *slot = Some(text.to_owned());
            }
        }
    }

    fn finish(self) -> Result<TestRun, ParseError> {
        let TrxParser {
            open_elements,
            results,
            definitions,
            saw_element,
            ..
        } = self;
        if !saw_element {
            return Err(ParseError::NoRootElement);
        }
        if let Some(element) = open_elements.into_iter().next_back() {
            return Err(ParseError::UnclosedElement { element });
        }
        Ok(TestRun {
            results: results.into_iter().map(ResultBuilder::build).collect(),
            definitions: definitions.into_iter().map(DefinitionBuilder::build).collect(),
        })
    }
}

fn attr_value(tag: &BytesStart<'_>, name: &str) -> Result<String, quick_xml::Error> {
    match tag.try_get_attribute(name).map_err(quick_xml::Error::from)? {
        Some(attribute) => Ok(attribute
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned()),
        None => Ok(String::new()),
    }
}
