//! Structural scanner: heuristic method/class boundary detection.
//!
//! This is not a parse. Signature word tables and a brace/indent depth trace
//! are enough to place boundaries deterministically, and the scanner must
//! terminate on any input. Unbalanced braces clamp the depth at zero and mark
//! the unit as a partial analysis instead of aborting it.

use crate::config::ScannerConfig;
use crate::core::{Language, ScanError, ScanErrorKind, SourceUnit};

/// Candidate method span, 1-based inclusive lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodBoundary {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    /// Brace/indent depth of the method body's top level.
    pub body_depth: u32,
    /// Index into `ScanOutcome::classes` of the innermost enclosing class.
    pub class_index: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassBoundary {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// Everything downstream needs from one unit: boundaries, the blanked code
/// text (comments and string contents spaced out) and the per-line depth
/// trace.
#[derive(Clone, Debug)]
pub struct ScanOutcome {
    pub methods: Vec<MethodBoundary>,
    pub classes: Vec<ClassBoundary>,
    pub code_lines: Vec<String>,
    pub depth_trace: Vec<u32>,
    pub errors: Vec<ScanError>,
    pub partial: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Class,
    Method,
}

struct OpenScope {
    kind: ScopeKind,
    name: String,
    start_line: usize,
    decl_depth: u32,
    class_index: Option<usize>,
    opened: bool,
}

/// Pure function of text + config: same input, same boundaries.
pub fn scan_unit(unit: &SourceUnit, config: &ScannerConfig) -> ScanOutcome {
    let code_lines = blank_noncode(&unit.content);

    if unit.language == Language::Python {
        scan_by_indent(config, code_lines)
    } else {
        scan_by_braces(unit, config, code_lines)
    }
}

fn scan_by_braces(unit: &SourceUnit, config: &ScannerConfig, code_lines: Vec<String>) -> ScanOutcome {
    let mut methods = Vec::new();
    let mut classes: Vec<ClassBoundary> = Vec::new();
    let mut depth_trace = Vec::with_capacity(code_lines.len());
    let mut stack: Vec<OpenScope> = Vec::new();
    let mut depth: u32 = 0;
    let mut ambiguous = false;

    for (idx, code) in code_lines.iter().enumerate() {
        let line_no = idx + 1;
        let trimmed = code.trim();

        if let Some(name) = detect_class(trimmed, config) {
            stack.push(OpenScope {
                kind: ScopeKind::Class,
                name,
                start_line: line_no,
                decl_depth: depth,
                class_index: None,
                opened: false,
            });
        } else if let Some(name) = detect_method(trimmed, config) {
            let class_index = enclosing_class(&stack);
            stack.push(OpenScope {
                kind: ScopeKind::Method,
                name,
                start_line: line_no,
                decl_depth: depth,
                class_index,
                opened: false,
            });
        }

        let mut line_max = depth;
        for ch in code.chars() {
            match ch {
                '{' => {
                    depth += 1;
                    line_max = line_max.max(depth);
                    if let Some(top) = stack.last_mut() {
                        if !top.opened && depth == top.decl_depth + 1 {
                            top.opened = true;
                            if top.kind == ScopeKind::Class {
                                top.class_index = Some(classes.len());
                                classes.push(ClassBoundary {
                                    name: top.name.clone(),
                                    start_line: top.start_line,
                                    end_line: top.start_line,
                                });
                            }
                        }
                    }
                }
                '}' => {
                    if depth == 0 {
                        // Close brace with no matching open: clamp and degrade.
                        ambiguous = true;
                    } else {
                        depth -= 1;
                        while let Some(top) = stack.last() {
                            if depth > top.decl_depth {
                                break;
                            }
                            let scope = stack.pop().expect("scope stack non-empty");
                            if scope.opened {
                                close_scope(scope, line_no, &mut methods, &mut classes);
                            }
                            // A declaration that never opened a body cannot
                            // open one once depth fell back past it.
                        }
                    }
                }
                ';' => {
                    // Bodyless declaration (prototype, trait signature).
                    if let Some(top) = stack.last() {
                        if !top.opened && depth == top.decl_depth {
                            stack.pop();
                        }
                    }
                }
                _ => {}
            }
        }

        // Maximum depth reached on the line, so single-line blocks still
        // register in nesting calculations.
        depth_trace.push(line_max);
    }

    if depth != 0 {
        ambiguous = true;
    }

    // Scopes still open at end-of-file close on the last line.
    let last_line = code_lines.len().max(1);
    while let Some(scope) = stack.pop() {
        if scope.opened {
            close_scope(scope, last_line, &mut methods, &mut classes);
        }
    }

    let mut errors = Vec::new();
    if ambiguous {
        errors.push(ScanError::new(
            ScanErrorKind::StructuralAmbiguity,
            unit.path.clone(),
            "unbalanced braces; unit analyzed with depth clamped at zero",
        ));
    }

    methods.sort_by(|a, b| (a.start_line, &a.name).cmp(&(b.start_line, &b.name)));

    ScanOutcome {
        methods,
        classes,
        code_lines,
        depth_trace,
        partial: ambiguous,
        errors,
    }
}

fn close_scope(
    scope: OpenScope,
    end_line: usize,
    methods: &mut Vec<MethodBoundary>,
    classes: &mut [ClassBoundary],
) {
    match scope.kind {
        ScopeKind::Method => methods.push(MethodBoundary {
            name: scope.name,
            start_line: scope.start_line,
            end_line,
            body_depth: scope.decl_depth + 1,
            class_index: scope.class_index,
        }),
        ScopeKind::Class => {
            if let Some(index) = scope.class_index {
                classes[index].end_line = end_line;
            }
        }
    }
}

fn enclosing_class(stack: &[OpenScope]) -> Option<usize> {
    stack
        .iter()
        .rev()
        .find(|s| s.kind == ScopeKind::Class && s.opened)
        .and_then(|s| s.class_index)
}

/// Indent-mode scan for brace-free languages. Depth is the indent-stack
/// level; a scope runs until the first non-blank line back at or below the
/// declaration indent.
fn scan_by_indent(config: &ScannerConfig, code_lines: Vec<String>) -> ScanOutcome {
    struct IndentScope {
        kind: ScopeKind,
        name: String,
        start_line: usize,
        indent: usize,
        depth: u32,
        last_body_line: usize,
        class_index: Option<usize>,
    }

    let mut methods = Vec::new();
    let mut classes: Vec<ClassBoundary> = Vec::new();
    let mut depth_trace = Vec::with_capacity(code_lines.len());
    let mut stack: Vec<IndentScope> = Vec::new();
    let mut indent_stack: Vec<usize> = vec![0];

    for (idx, code) in code_lines.iter().enumerate() {
        let line_no = idx + 1;
        let trimmed = code.trim();

        if trimmed.is_empty() {
            depth_trace.push(indent_stack.len() as u32 - 1);
            continue;
        }

        let indent = indent_width(code);

        while indent < *indent_stack.last().expect("indent stack never empty")
            && indent_stack.len() > 1
        {
            indent_stack.pop();
        }
        if indent > *indent_stack.last().expect("indent stack never empty") {
            indent_stack.push(indent);
        }
        let depth = indent_stack.len() as u32 - 1;

        // Close scopes whose body ended above this line.
        while let Some(top) = stack.last() {
            if indent <= top.indent {
                let scope = stack.pop().expect("scope stack non-empty");
                match scope.kind {
                    ScopeKind::Method => methods.push(MethodBoundary {
                        name: scope.name,
                        start_line: scope.start_line,
                        end_line: scope.last_body_line,
                        body_depth: scope.depth + 1,
                        class_index: scope.class_index,
                    }),
                    ScopeKind::Class => {
                        if let Some(index) = scope.class_index {
                            classes[index].end_line = scope.last_body_line;
                        }
                    }
                }
            } else {
                break;
            }
        }

        for scope in stack.iter_mut() {
            scope.last_body_line = line_no;
        }

        if let Some(name) = detect_class(trimmed, config) {
            let class_index = classes.len();
            classes.push(ClassBoundary {
                name: name.clone(),
                start_line: line_no,
                end_line: line_no,
            });
            stack.push(IndentScope {
                kind: ScopeKind::Class,
                name,
                start_line: line_no,
                indent,
                depth,
                last_body_line: line_no,
                class_index: Some(class_index),
            });
        } else if let Some(name) = detect_method(trimmed, config) {
            let class_index = stack
                .iter()
                .rev()
                .find(|s| s.kind == ScopeKind::Class)
                .and_then(|s| s.class_index);
            stack.push(IndentScope {
                kind: ScopeKind::Method,
                name,
                start_line: line_no,
                indent,
                depth,
                last_body_line: line_no,
                class_index,
            });
        }

        depth_trace.push(depth);
    }

    while let Some(scope) = stack.pop() {
        match scope.kind {
            ScopeKind::Method => methods.push(MethodBoundary {
                name: scope.name,
                start_line: scope.start_line,
                end_line: scope.last_body_line,
                body_depth: scope.depth + 1,
                class_index: scope.class_index,
            }),
            ScopeKind::Class => {
                if let Some(index) = scope.class_index {
                    classes[index].end_line = scope.last_body_line;
                }
            }
        }
    }

    methods.sort_by(|a, b| (a.start_line, &a.name).cmp(&(b.start_line, &b.name)));

    ScanOutcome {
        methods,
        classes,
        code_lines,
        depth_trace,
        partial: false,
        errors: Vec::new(),
    }
}

fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// Blank out comments and string-literal contents so brace counting and
/// token scans never trip over them. Block comments may span lines.
pub fn blank_noncode(content: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut in_block_comment = false;

    for line in content.lines() {
        let mut out = String::with_capacity(line.len());
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            if in_block_comment {
                if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                    in_block_comment = false;
                    out.push(' ');
                    out.push(' ');
                    i += 2;
                } else {
                    out.push(' ');
                    i += 1;
                }
                continue;
            }

            let ch = chars[i];
            match ch {
                '/' if chars.get(i + 1) == Some(&'/') => break,
                '#' => break,
                '/' if chars.get(i + 1) == Some(&'*') => {
                    in_block_comment = true;
                    out.push(' ');
                    out.push(' ');
                    i += 2;
                }
                '"' => {
                    out.push('"');
                    i += 1;
                    while i < chars.len() {
                        if chars[i] == '\\' {
                            out.push(' ');
                            out.push(' ');
                            i += 2;
                        } else if chars[i] == '"' {
                            out.push('"');
                            i += 1;
                            break;
                        } else {
                            out.push(' ');
                            i += 1;
                        }
                    }
                }
                // A single quote opens a char literal only when it closes
                // within char-literal distance (one char, or one escape).
                // A lifetime tick has no nearby closing quote and stays code.
                '\'' => {
                    let close = if chars.get(i + 1) == Some(&'\\') {
                        i + 3
                    } else {
                        i + 2
                    };
                    if chars.get(close) == Some(&'\'') {
                        out.push('\'');
                        for _ in i + 1..close {
                            out.push(' ');
                        }
                        out.push('\'');
                        i = close + 1;
                    } else {
                        out.push('\'');
                        i += 1;
                    }
                }
                _ => {
                    out.push(ch);
                    i += 1;
                }
            }
        }

        result.push(out);
    }

    if result.is_empty() {
        result.push(String::new());
    }

    result
}

fn leading_word(line: &str) -> &str {
    let end = line
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    &line[..end]
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn clean_identifier(token: &str) -> &str {
    let end = token
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(token.len());
    &token[..end]
}

fn matches_any(word: &str, table: &[String]) -> bool {
    table.iter().any(|t| t == word)
}

/// Class/struct/impl-style declaration: optional modifiers, then a class
/// keyword, then a name.
fn detect_class(trimmed: &str, config: &ScannerConfig) -> Option<String> {
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let mut idx = 0;
    while idx < tokens.len() && matches_any(clean_identifier(tokens[idx]), &config.modifiers) {
        idx += 1;
    }

    let keyword = clean_identifier(tokens.get(idx)?);
    if !matches_any(keyword, &config.class_keywords) {
        return None;
    }

    // `impl Trait for Type` names the type, not the trait.
    let name_token = if keyword == "impl" {
        match tokens.iter().position(|t| *t == "for") {
            Some(pos) => tokens.get(pos + 1)?,
            None => tokens.get(idx + 1)?,
        }
    } else {
        tokens.get(idx + 1)?
    };

    let name = clean_identifier(name_token);
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

/// Method signature heuristic: modifier/keyword prefix (or a bare
/// return-type prefix) followed by an identifier and `(`. Control-flow
/// keywords and call-shaped lines are rejected.
fn detect_method(trimmed: &str, config: &ScannerConfig) -> Option<String> {
    if trimmed.is_empty() {
        return None;
    }

    let word = leading_word(trimmed);
    if word.is_empty()
        || matches_any(word, &config.control_keywords)
        || matches_any(word, &config.class_keywords)
    {
        return None;
    }

    // A class declaration with modifiers stripped is not a method.
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let mut idx = 0;
    while idx < tokens.len() && matches_any(clean_identifier(tokens[idx]), &config.modifiers) {
        idx += 1;
    }
    if let Some(token) = tokens.get(idx) {
        if matches_any(clean_identifier(token), &config.class_keywords) {
            return None;
        }
    }

    let paren = trimmed.find('(')?;
    let (name, name_start) = identifier_before(trimmed, paren)?;
    if matches_any(&name, &config.control_keywords) {
        return None;
    }

    let prefix = &trimmed[..name_start];
    let keyword_led = matches_any(word, &config.method_keywords)
        || matches_any(word, &config.modifiers);

    if keyword_led {
        // Assignment or call shape after a modifier (`static x = foo()`)
        // is not a signature.
        if prefix.chars().any(|c| matches!(c, '=' | '.')) {
            return None;
        }
        return Some(name);
    }

    // Return-type style (`int foo(`): the name must not be the first word
    // (that shape is a call) and the prefix must look like a type, not an
    // expression.
    if name == word || trimmed.ends_with(';') {
        return None;
    }
    if prefix
        .chars()
        .any(|c| matches!(c, '=' | '.' | ',' | '(' | ')' | '"' | '\'' | '+' | '-' | '!'))
    {
        return None;
    }

    Some(name)
}

/// Identifier ending just before byte offset `end`, with its start offset.
/// Skips whitespace and a balanced generic suffix (`foo<T>(` names `foo`).
fn identifier_before(line: &str, end: usize) -> Option<(String, usize)> {
    let bytes = line.as_bytes();
    let mut pos = end;

    while pos > 0 && (bytes[pos - 1] as char).is_whitespace() {
        pos -= 1;
    }

    if pos > 0 && bytes[pos - 1] == b'>' {
        let mut angle = 0i32;
        while pos > 0 {
            match bytes[pos - 1] {
                b'>' => angle += 1,
                b'<' => angle -= 1,
                _ => {}
            }
            pos -= 1;
            if angle == 0 {
                break;
            }
        }
        // The byte walk may have stopped inside a multi-byte character.
        while pos > 0 && !line.is_char_boundary(pos) {
            pos -= 1;
        }
    }

    let tail = &line[..pos];
    let start = tail
        .rfind(|c: char| !(c.is_alphanumeric() || c == '_'))
        .map(|p| p + 1)
        .unwrap_or(0);
    let name = &tail[start..];

    if is_identifier(name) {
        Some((name.to_string(), start))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SourceUnit;
    use std::path::PathBuf;

    fn scan(source: &str, file: &str) -> ScanOutcome {
        let unit = SourceUnit::new(PathBuf::from(file), source.to_string());
        scan_unit(&unit, &ScannerConfig::default())
    }

    #[test]
    fn finds_rust_method_span() {
        let outcome = scan("pub fn alpha(x: u32) -> u32 {\n    x + 1\n}\n", "lib.rs");
        assert_eq!(outcome.methods.len(), 1);
        let m = &outcome.methods[0];
        assert_eq!(m.name, "alpha");
        assert_eq!((m.start_line, m.end_line), (1, 3));
        assert!(!outcome.partial);
    }

    #[test]
    fn method_inside_class_gets_class_index() {
        let source = "class Account {\n    public int balance() {\n        return 1;\n    }\n}\n";
        let outcome = scan(source, "Account.java");
        assert_eq!(outcome.classes.len(), 1);
        assert_eq!(outcome.classes[0].name, "Account");
        assert_eq!(outcome.methods.len(), 1);
        assert_eq!(outcome.methods[0].class_index, Some(0));
    }

    #[test]
    fn control_keywords_are_not_methods() {
        let source = "fn outer() {\n    if (ready) {\n        while (more) {\n        }\n    }\n}\n";
        let outcome = scan(source, "lib.rs");
        assert_eq!(outcome.methods.len(), 1);
        assert_eq!(outcome.methods[0].name, "outer");
    }

    #[test]
    fn unbalanced_braces_degrade_not_abort() {
        let outcome = scan("fn broken() {\n    if x {\n}\n", "bad.rs");
        assert!(outcome.partial);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].kind, ScanErrorKind::StructuralAmbiguity);
    }

    #[test]
    fn stray_close_brace_clamps_at_zero() {
        let outcome = scan("}\nfn ok() {\n    1;\n}\n", "bad.rs");
        assert!(outcome.partial);
        assert_eq!(outcome.methods.len(), 1);
        assert_eq!(outcome.methods[0].name, "ok");
    }

    #[test]
    fn braces_in_strings_and_comments_are_ignored() {
        let source = "fn quoted() {\n    let s = \"{{{\"; // }}}\n}\n";
        let outcome = scan(source, "lib.rs");
        assert!(!outcome.partial);
        assert_eq!(outcome.methods[0].end_line, 3);
    }

    #[test]
    fn trait_signatures_without_body_are_dropped() {
        let source = "trait Store {\n    fn get(&self) -> u32;\n    fn put(&self, v: u32);\n}\n";
        let outcome = scan(source, "lib.rs");
        assert!(outcome.methods.is_empty());
    }

    #[test]
    fn lifetime_ticks_are_not_char_literals() {
        let outcome = scan("fn f<'a>(x: &'a str) -> &'a str {\n    x\n}\n", "lib.rs");
        assert_eq!(outcome.methods.len(), 1);
        assert_eq!(outcome.methods[0].name, "f");
    }

    #[test]
    fn python_def_span_by_indent() {
        let source = "class Greeter:\n    def greet(self):\n        if ready:\n            print(1)\n\ndef free():\n    pass\n";
        let outcome = scan(source, "mod.py");
        assert_eq!(outcome.classes.len(), 1);
        assert_eq!(outcome.methods.len(), 2);
        let greet = outcome.methods.iter().find(|m| m.name == "greet").unwrap();
        assert_eq!((greet.start_line, greet.end_line), (2, 4));
        assert_eq!(greet.class_index, Some(0));
        let free = outcome.methods.iter().find(|m| m.name == "free").unwrap();
        assert_eq!(free.class_index, None);
    }

    #[test]
    fn same_input_same_boundaries() {
        let source = "fn a() {\n    if x { y(); }\n}\nfn b() {\n}\n";
        let first = scan(source, "lib.rs");
        let second = scan(source, "lib.rs");
        assert_eq!(first.methods, second.methods);
        assert_eq!(first.depth_trace, second.depth_trace);
    }
}
