// Copyright (c) The dotnet-explorer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt};

/// A zero-based line and column in a source document.
///
/// Positions order line first, then column, so `Ord` agrees with reading
/// order.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct Position {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based column within the line.
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text, from `start` to `end`.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Range {
    /// The first position in the range.
    pub start: Position,
    /// The last position in the range.
    pub end: Position,
}

impl Range {
    /// Creates a new range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Returns true if `position` lies within this range.
    ///
    /// Both boundaries are inclusive: a cursor sitting exactly on the first
    /// or last position of a symbol still counts as inside it.
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

/// The kind of construct a document symbol describes.
///
/// Unknown kinds deserialize as [`Other`](Self::Other), so symbol payloads
/// from editors with richer kind vocabularies still load.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    /// A namespace declaration.
    Namespace,
    /// A class declaration.
    Class,
    /// A method declaration.
    Method,
    /// A property declaration.
    Property,
    /// Any other construct. Never selected as a test target.
    Other,
}

impl<'de> Deserialize<'de> for SymbolKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let kind = String::deserialize(deserializer)?;
        Ok(match kind.as_str() {
            "namespace" => SymbolKind::Namespace,
            "class" => SymbolKind::Class,
            "method" => SymbolKind::Method,
            "property" => SymbolKind::Property,
            _ => SymbolKind::Other,
        })
    }
}

/// A node in the nested symbol tree an editor reports for a document.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DocumentSymbol {
    /// The symbol's own, unqualified name.
    pub name: String,
    /// What kind of construct this symbol is.
    pub kind: SymbolKind,
    /// The source span of the whole construct, children included.
    pub range: Range,
    /// Symbols nested within this one.
    #[serde(default)]
    pub children: Vec<DocumentSymbol>,
}

/// A flattened document symbol with its qualified name, the unit of context
/// resolution.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSymbol {
    /// The dot-joined qualified name, such as `Ns.Class.Method`. For a test
    /// method this is the name the runner filters on.
    pub full_name: String,
    /// The qualified name of the enclosing symbol, `None` at the top level.
    pub parent_name: Option<String>,
    /// What kind of construct this symbol is.
    pub kind: SymbolKind,
    /// The source span of the whole construct.
    pub range: Range,
}

/// Produces the flattened symbols of a source document.
///
/// Implementations typically ask the editor or a language service for the
/// document's symbol tree and hand it to [`flatten_symbols`]. The order of
/// the returned sequence is the provider's own; resolution prefers earlier
/// symbols when several of the same kind contain a position. A provider with
/// nothing to offer returns an empty vector.
#[async_trait]
pub trait SymbolProvider: Send + Sync {
    /// Returns every symbol of `document`, flattened to a sequence.
    async fn document_symbols(&self, document: &Utf8Path) -> Vec<TestSymbol>;
}

/// Flattens a symbol tree into the sequence consumed by context resolution.
///
/// Symbols come out in depth-first document order, parents before children.
/// Each symbol's qualified name extends its parent's with a `.` separator,
/// and a method's trailing `(argument list)` is dropped so overload syntax
/// never leaks into run-target names.
pub fn flatten_symbols(symbols: &[DocumentSymbol]) -> Vec<TestSymbol> {
    let mut flattened = Vec::new();
    flatten_into(symbols, None, &mut flattened);
    flattened
}

fn flatten_into(symbols: &[DocumentSymbol], parent: Option<&str>, out: &mut Vec<TestSymbol>) {
    for symbol in symbols {
        let name = match symbol.kind {
            SymbolKind::Method => strip_method_arguments(&symbol.name),
            _ => Cow::Borrowed(symbol.name.as_str()),
        };
        let full_name = match parent {
            Some(parent) => format!("{parent}.{name}"),
            None => name.into_owned(),
        };
        out.push(TestSymbol {
            full_name: full_name.clone(),
            parent_name: parent.map(str::to_owned),
            kind: symbol.kind,
            range: symbol.range,
        });
        flatten_into(&symbol.children, Some(&full_name), out);
    }
}

/// Drops the parenthesized argument list from a method name, turning
/// `Adds(int a, int b)` into `Adds`. Everything from the first `(` through
/// the last `)` goes.
fn strip_method_arguments(name: &str) -> Cow<'_, str> {
    match (name.find('('), name.rfind(')')) {
        (Some(open), Some(close)) if open < close => {
            if close == name.len() - 1 {
                Cow::Borrowed(&name[..open])
            } else {
                Cow::Owned(format!("{}{}", &name[..open], &name[close + 1..]))
            }
        }
        _ => Cow::Borrowed(name),
    }
}
