// Copyright (c) The dotnet-explorer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::context::{Position, SymbolKind, SymbolProvider, TestSymbol};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The test target resolved from a cursor position.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunContext {
    /// The qualified name to hand to the runner: a single test's full name,
    /// or a class name under which every test is meant.
    pub test_name: String,

    /// True when the target is one test method, false when it is a whole
    /// test class.
    pub is_single_test: bool,
}

/// Selects the test target containing `position`.
///
/// Candidates are the symbols whose range contains the position, kept in the
/// order given. Any method-kind candidate beats any class-kind candidate: a
/// cursor inside a method body sits inside the enclosing class too, and the
/// method is the more specific thing to run. Within a kind the first
/// candidate wins. No other kind is ever selected, so `None` comes back for
/// a cursor outside every method and class. That is an ordinary outcome, not
/// an error.
pub fn resolve_test_context(symbols: &[TestSymbol], position: Position) -> Option<TestRunContext> {
    let in_range: Vec<&TestSymbol> = symbols
        .iter()
        .filter(|symbol| symbol.range.contains(position))
        .collect();

    if let Some(method) = in_range
        .iter()
        .find(|symbol| symbol.kind == SymbolKind::Method)
    {
        return Some(TestRunContext {
            test_name: method.full_name.clone(),
            is_single_test: true,
        });
    }

    in_range
        .iter()
        .find(|symbol| symbol.kind == SymbolKind::Class)
        .map(|class| TestRunContext {
            test_name: class.full_name.clone(),
            is_single_test: false,
        })
}

/// Finds the test target at `position` in `document`.
///
/// Asks `provider` for the document's symbols and resolves them with
/// [`resolve_test_context`]. The symbol request is the only suspending step.
pub async fn find_test_in_context<P>(
    provider: &P,
    document: &Utf8Path,
    position: Position,
) -> Option<TestRunContext>
where
    P: SymbolProvider + ?Sized,
{
    let symbols = provider.document_symbols(document).await;
    let context = resolve_test_context(&symbols, position);
    match &context {
        Some(context) if context.is_single_test => {
            debug!("resolved test `{}` at {position} in `{document}`", context.test_name);
        }
        Some(context) => {
            debug!(
                "resolved test class `{}` at {position} in `{document}`",
                context.test_name,
            );
        }
        None => debug!("no test found at {position} in `{document}`"),
    }
    context
}
