//! Go package clause and import extraction.
//!
//! Only the file header matters: the `package` clause and the import
//! declarations that follow it. Extraction stops at the first other
//! declaration, so syntax errors in function bodies never fail a scan, while
//! a broken header always does.

// Tree-sitter returns usize for positions; files never reach u32::MAX lines.
#![allow(clippy::cast_possible_truncation)]

use std::path::Path;

use crate::error::{Error, Result};

/// Go grammar node kinds used during extraction.
mod node_kinds {
    pub const SOURCE_FILE: &str = "source_file";
    pub const COMMENT: &str = "comment";
    pub const ERROR: &str = "ERROR";

    pub const PACKAGE_CLAUSE: &str = "package_clause";
    pub const PACKAGE_IDENTIFIER: &str = "package_identifier";

    pub const IMPORT_DECLARATION: &str = "import_declaration";
    pub const IMPORT_SPEC: &str = "import_spec";
    pub const IMPORT_SPEC_LIST: &str = "import_spec_list";
}

/// Header of a Go source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoFileHeader {
    /// Name from the `package` clause
    pub package: String,
    /// Import paths, in source order, without quotes
    pub imports: Vec<String>,
}

/// Reusable tree-sitter parser configured for Go.
pub struct GoParser {
    parser: tree_sitter::Parser,
}

impl GoParser {
    /// Create a parser with the Go grammar loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parser`] if the grammar is incompatible with the
    /// linked tree-sitter runtime.
    pub fn new() -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| Error::Parser(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse the header of one Go file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the file has no `package` clause, or if the
    /// package clause or an import declaration is malformed.
    pub fn parse_header(&mut self, path: &Path, source: &str) -> Result<GoFileHeader> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::parse(path, "tree-sitter produced no syntax tree"))?;

        extract_header(&tree, source.as_bytes()).map_err(|message| Error::parse(path, message))
    }
}

fn extract_header(
    tree: &tree_sitter::Tree,
    content: &[u8],
) -> std::result::Result<GoFileHeader, String> {
    use node_kinds::{COMMENT, ERROR, IMPORT_DECLARATION, PACKAGE_CLAUSE, SOURCE_FILE};

    let root = tree.root_node();
    if root.kind() != SOURCE_FILE {
        return Err(format!("{}: not a Go source file", position(&root)));
    }

    let mut package = None;
    let mut imports = Vec::new();
    // End of the last header element whose terminator has not been seen yet
    let mut unterminated: Option<usize> = None;

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == COMMENT {
            if let Some(end) = unterminated {
                // A comment spanning lines acts as a newline
                let ends_statement = content[child.byte_range()].contains(&b'\n')
                    || terminated_between(content, end, child.start_byte());
                unterminated = (!ends_statement).then_some(child.end_byte());
            }
            continue;
        }
        if let Some(end) = unterminated.take() {
            if !terminated_between(content, end, child.start_byte()) {
                return Err(format!(
                    "{}: expected ';', found {}",
                    position(&child),
                    first_token(&child, content)
                ));
            }
        }

        match child.kind() {
            PACKAGE_CLAUSE if package.is_none() => {
                if child.has_error() {
                    return Err(syntax_error(&child, "package clause"));
                }
                package = Some(package_name(&child, content)?);
            }
            kind if package.is_none() => {
                return Err(format!(
                    "{}: expected 'package', found {kind}",
                    position(&child)
                ));
            }
            IMPORT_DECLARATION => {
                if child.has_error() {
                    return Err(syntax_error(&child, "import declaration"));
                }
                collect_import_specs(&child, content, &mut imports)?;
            }
            ERROR if starts_header_keyword(&child, content) => {
                return Err(syntax_error(&child, "file header"));
            }
            _ => break,
        }

        if content[..child.end_byte()].last() != Some(&b';') {
            unterminated = Some(child.end_byte());
        }
    }

    let package = package.ok_or_else(|| "expected 'package', found end of file".to_string())?;
    Ok(GoFileHeader { package, imports })
}

fn package_name(node: &tree_sitter::Node, content: &[u8]) -> std::result::Result<String, String> {
    use node_kinds::PACKAGE_IDENTIFIER;

    let mut cursor = node.walk();
    let identifier = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == PACKAGE_IDENTIFIER)
        .ok_or_else(|| format!("{}: package clause has no name", position(node)))?;

    node_text(&identifier, content).map(ToString::to_string)
}

fn collect_import_specs(
    node: &tree_sitter::Node,
    content: &[u8],
    imports: &mut Vec<String>,
) -> std::result::Result<(), String> {
    use node_kinds::{IMPORT_SPEC, IMPORT_SPEC_LIST};

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            IMPORT_SPEC => imports.push(import_path(&child, content)?),
            IMPORT_SPEC_LIST => collect_import_specs(&child, content, imports)?,
            _ => {}
        }
    }
    Ok(())
}

/// Import path of an `import_spec`, with the string delimiters removed.
fn import_path(spec: &tree_sitter::Node, content: &[u8]) -> std::result::Result<String, String> {
    let literal = spec
        .child_by_field_name("path")
        .ok_or_else(|| format!("{}: missing import path", position(spec)))?;
    let text = node_text(&literal, content)?;

    let path = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .or_else(|| text.strip_prefix('`').and_then(|t| t.strip_suffix('`')))
        .ok_or_else(|| format!("{}: malformed import path {text}", position(&literal)))?;

    if !is_valid_import_path(path) {
        return Err(format!("{}: invalid import path {text}", position(&literal)));
    }
    Ok(path.to_string())
}

/// Characters the Go toolchain refuses in import paths.
const ILLEGAL_IMPORT_CHARS: &str = "!\"#$%&'()*,:;<=>?[\\]^`{|}\u{FFFD}";

/// Non-empty, and only graphic, non-space characters outside
/// [`ILLEGAL_IMPORT_CHARS`]. Escape sequences are not decoded, so a path
/// spelled with `\` escapes is rejected.
fn is_valid_import_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .chars()
            .all(|c| !c.is_control() && !c.is_whitespace() && !ILLEGAL_IMPORT_CHARS.contains(c))
}

/// Whether the source between `start` and `end` ends a Go statement.
fn terminated_between(content: &[u8], start: usize, end: usize) -> bool {
    content
        .get(start..end)
        .is_some_and(|gap| gap.iter().any(|&b| b == b'\n' || b == b';'))
}

/// First whitespace-separated token of a node, for error messages.
fn first_token<'a>(node: &tree_sitter::Node, content: &'a [u8]) -> &'a str {
    node_text(node, content)
        .ok()
        .and_then(|text| text.split_whitespace().next())
        .unwrap_or_else(|| node.kind())
}

/// Whether an error node is a broken `package` or `import` rather than a
/// broken declaration further down.
fn starts_header_keyword(node: &tree_sitter::Node, content: &[u8]) -> bool {
    node_text(node, content).is_ok_and(|text| {
        let text = text.trim_start();
        text.starts_with("import") || text.starts_with("package")
    })
}

fn node_text<'a>(
    node: &tree_sitter::Node,
    content: &'a [u8],
) -> std::result::Result<&'a str, String> {
    std::str::from_utf8(&content[node.byte_range()])
        .map_err(|_| format!("{}: invalid UTF-8", position(node)))
}

fn syntax_error(node: &tree_sitter::Node, what: &str) -> String {
    format!("{}: syntax error in {what}", position(node))
}

/// `line:column`, both 1-indexed.
fn position(node: &tree_sitter::Node) -> String {
    let start = node.start_position();
    format!("{}:{}", start.row as u32 + 1, start.column as u32 + 1)
}
