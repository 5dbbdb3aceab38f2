//! Building syntax fragments from statement text.
//!
//! [`FragmentBuilder`] is driven bottom-up by a host parser (or a test):
//! leaves are located by searching the text from a cursor that only moves
//! forward, and composite nodes derive their spans from their children plus
//! the punctuation around them (parentheses, brackets, argument lists,
//! statement keywords).
//!
//! ```ignore
//! let mut b = FragmentBuilder::new("if (a?.b) {}");
//! let a = b.identifier("a")?;
//! let access = b.property(a, "b")?; // optional: true
//! let block = b.block(Vec::new())?;
//! let stmt = b.if_statement(access, block, None)?;
//! let fragment = b.finish(stmt)?;
//! ```

use crate::syntax::{
    BinaryOperator, FragmentError, LiteralKind, NodeId, NodeKind, PrefixOperator, SyntaxFragment,
    SyntaxNode,
};
use std::sync::Arc;
use tscond_common::Span;

type BuildResult = Result<NodeId, FragmentError>;

pub struct FragmentBuilder {
    text: Arc<str>,
    nodes: Vec<SyntaxNode>,
    cursor: u32,
}

impl FragmentBuilder {
    pub fn new(text: &str) -> Self {
        FragmentBuilder {
            text: text.into(),
            nodes: Vec::new(),
            cursor: 0,
        }
    }

    /// Offset from which the next leaf is searched.
    #[inline]
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn span(&self, id: NodeId) -> Result<Span, FragmentError> {
        self.nodes
            .get(id.0 as usize)
            .map(|node| node.span)
            .ok_or_else(|| FragmentError::Unparseable {
                reason: format!("unknown node {}", id.0),
            })
    }

    pub fn finish(self, root: NodeId) -> Result<SyntaxFragment, FragmentError> {
        SyntaxFragment::from_parts(self.text, self.nodes, root)
    }

    fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.cursor = self.cursor.max(span.end);
        self.nodes.push(SyntaxNode {
            kind,
            span,
            parent: None,
        });
        id
    }

    // =========================================================================
    // Leaves
    // =========================================================================

    pub fn identifier(&mut self, name: &str) -> BuildResult {
        let span = self.find_token(name, self.cursor)?;
        Ok(self.push(NodeKind::Identifier, span))
    }

    pub fn literal(&mut self, kind: LiteralKind, token: &str) -> BuildResult {
        let span = self.find_token(token, self.cursor)?;
        Ok(self.push(NodeKind::Literal(kind), span))
    }

    pub fn number(&mut self, token: &str) -> BuildResult {
        self.literal(LiteralKind::Number, token)
    }

    /// `token` includes the quotes.
    pub fn string(&mut self, token: &str) -> BuildResult {
        self.literal(LiteralKind::String, token)
    }

    /// `true`, `false`, `null` or `undefined`.
    pub fn keyword_literal(&mut self, keyword: &str) -> BuildResult {
        let kind = match keyword {
            "true" => LiteralKind::True,
            "false" => LiteralKind::False,
            "null" => LiteralKind::Null,
            "undefined" => LiteralKind::Undefined,
            other => {
                return Err(FragmentError::Unparseable {
                    reason: format!("`{other}` is not a keyword literal"),
                });
            }
        };
        self.literal(kind, keyword)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn parenthesized(&mut self, expression: NodeId) -> BuildResult {
        let inner = self.span(expression)?;
        let open = self.expect_before('(', inner.start)?;
        let close = self.expect_after(')', inner.end)?;
        Ok(self.push(
            NodeKind::Parenthesized { expression },
            Span::new(open, close + 1),
        ))
    }

    pub fn binary(&mut self, left: NodeId, token: &str, right: NodeId) -> BuildResult {
        let op = BinaryOperator::from_token(token).ok_or_else(|| FragmentError::Unparseable {
            reason: format!("unknown binary operator `{token}`"),
        })?;
        let l = self.span(left)?;
        let r = self.span(right)?;
        let between = self.slice(l.end, r.start);
        if between.trim() != token {
            return Err(FragmentError::TokenNotFound {
                token: token.to_string(),
                from: l.end,
            });
        }
        Ok(self.push(
            NodeKind::Binary { op, left, right },
            Span::new(l.start, r.end),
        ))
    }

    pub fn prefix(&mut self, token: &str, operand: NodeId) -> BuildResult {
        let op = PrefixOperator::from_token(token).ok_or_else(|| FragmentError::Unparseable {
            reason: format!("unknown prefix operator `{token}`"),
        })?;
        let inner = self.span(operand)?;
        let head = self.slice(0, inner.start).trim_end();
        if !head.ends_with(token) {
            return Err(FragmentError::TokenNotFound {
                token: token.to_string(),
                from: inner.start,
            });
        }
        let start = (head.len() - token.len()) as u32;
        Ok(self.push(
            NodeKind::Prefix { op, operand },
            Span::new(start, inner.end),
        ))
    }

    pub fn conditional(&mut self, condition: NodeId, when_true: NodeId, when_false: NodeId) -> BuildResult {
        let c = self.span(condition)?;
        let t = self.span(when_true)?;
        let f = self.span(when_false)?;
        if self.slice(c.end, t.start).trim() != "?" || self.slice(t.end, f.start).trim() != ":" {
            return Err(FragmentError::TokenNotFound {
                token: "?".to_string(),
                from: c.end,
            });
        }
        Ok(self.push(
            NodeKind::Conditional {
                condition,
                when_true,
                when_false,
            },
            Span::new(c.start, f.end),
        ))
    }

    /// `object.name` or `object?.name`.
    pub fn property(&mut self, object: NodeId, name: &str) -> BuildResult {
        let o = self.span(object)?;
        let name_span = self.find_token(name, o.end)?;
        let optional = match self.slice(o.end, name_span.start).trim() {
            "." => false,
            "?." => true,
            _ => {
                return Err(FragmentError::TokenNotFound {
                    token: ".".to_string(),
                    from: o.end,
                });
            }
        };
        let name = self.push(NodeKind::Identifier, name_span);
        Ok(self.push(
            NodeKind::PropertyAccess {
                object,
                name,
                optional,
            },
            Span::new(o.start, name_span.end),
        ))
    }

    /// `object[index]` or `object?.[index]`.
    pub fn element(&mut self, object: NodeId, index: NodeId) -> BuildResult {
        let o = self.span(object)?;
        let i = self.span(index)?;
        let open = self.expect_before('[', i.start)?;
        let optional = match self.slice(o.end, open).trim() {
            "" => false,
            "?." => true,
            _ => {
                return Err(FragmentError::TokenNotFound {
                    token: "[".to_string(),
                    from: o.end,
                });
            }
        };
        let close = self.expect_after(']', i.end)?;
        Ok(self.push(
            NodeKind::ElementAccess {
                object,
                index,
                optional,
            },
            Span::new(o.start, close + 1),
        ))
    }

    /// `callee(args)` or `callee?.(args)`.
    pub fn call(&mut self, callee: NodeId, args: Vec<NodeId>) -> BuildResult {
        let c = self.span(callee)?;
        let (open, optional) = self.open_arguments(c.end)?;
        let close = self.close_arguments(open, &args)?;
        Ok(self.push(
            NodeKind::Call {
                callee,
                args,
                optional,
            },
            Span::new(c.start, close + 1),
        ))
    }

    pub fn new_expression(&mut self, callee: NodeId, args: Vec<NodeId>) -> BuildResult {
        let c = self.span(callee)?;
        let keyword = self.find_token_before("new", c.start)?;
        let end = match self.open_arguments(c.end) {
            Ok((open, _)) => self.close_arguments(open, &args)? + 1,
            Err(_) if args.is_empty() => c.end,
            Err(err) => return Err(err),
        };
        Ok(self.push(
            NodeKind::New { callee, args },
            Span::new(keyword.start, end),
        ))
    }

    pub fn await_expression(&mut self, operand: NodeId) -> BuildResult {
        let inner = self.span(operand)?;
        let keyword = self.find_token_before("await", inner.start)?;
        Ok(self.push(
            NodeKind::Await { operand },
            Span::new(keyword.start, inner.end),
        ))
    }

    /// `x => body`, `(x, y) => body` or `() => body`.
    pub fn arrow(&mut self, params: Vec<NodeId>, body: NodeId) -> BuildResult {
        let b = self.span(body)?;
        let arrow = self.find_token_before("=>", b.start)?;
        let parenthesized = matches!(self.prev_non_ws(arrow.start), Some((_, ')')));
        let start = match params.first() {
            Some(&first) => {
                let first = self.span(first)?;
                if parenthesized {
                    self.expect_before('(', first.start)?
                } else {
                    first.start
                }
            }
            None => {
                let close = self.expect_before(')', arrow.start)?;
                self.expect_before('(', close)?
            }
        };
        Ok(self.push(
            NodeKind::Arrow { params, body },
            Span::new(start, b.end),
        ))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn block(&mut self, statements: Vec<NodeId>) -> BuildResult {
        let (open, close) = match (statements.first(), statements.last()) {
            (Some(&first), Some(&last)) => {
                let first = self.span(first)?;
                let last = self.span(last)?;
                (
                    self.expect_before('{', first.start)?,
                    self.expect_after('}', last.end)?,
                )
            }
            _ => {
                let open = self.find_token("{", self.cursor)?.start;
                (open, self.expect_after('}', open + 1)?)
            }
        };
        Ok(self.push(
            NodeKind::Block { statements },
            Span::new(open, close + 1),
        ))
    }

    pub fn return_statement(&mut self, expression: Option<NodeId>) -> BuildResult {
        let (start, end) = match expression {
            Some(expression) => {
                let e = self.span(expression)?;
                (self.find_token_before("return", e.start)?.start, e.end)
            }
            None => {
                let keyword = self.find_token("return", self.cursor)?;
                (keyword.start, keyword.end)
            }
        };
        let end = self.include_semicolon(end);
        Ok(self.push(NodeKind::Return { expression }, Span::new(start, end)))
    }

    pub fn if_statement(
        &mut self,
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    ) -> BuildResult {
        let c = self.span(condition)?;
        let open = self.expect_before('(', c.start)?;
        let keyword = self.find_token_before("if", open)?;
        let end = self.span(else_branch.unwrap_or(then_branch))?.end;
        Ok(self.push(
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            },
            Span::new(keyword.start, end),
        ))
    }

    pub fn while_statement(&mut self, condition: NodeId, body: NodeId) -> BuildResult {
        let c = self.span(condition)?;
        let open = self.expect_before('(', c.start)?;
        let keyword = self.find_token_before("while", open)?;
        let end = self.span(body)?.end;
        Ok(self.push(
            NodeKind::While { condition, body },
            Span::new(keyword.start, end),
        ))
    }

    pub fn do_while(&mut self, body: NodeId, condition: NodeId) -> BuildResult {
        let b = self.span(body)?;
        let c = self.span(condition)?;
        let keyword = self.find_token_before("do", b.start)?;
        let close = self.expect_after(')', c.end)?;
        let end = self.include_semicolon(close + 1);
        Ok(self.push(
            NodeKind::DoWhile { body, condition },
            Span::new(keyword.start, end),
        ))
    }

    pub fn for_statement(
        &mut self,
        initializer: Option<NodeId>,
        condition: Option<NodeId>,
        incrementor: Option<NodeId>,
        body: NodeId,
    ) -> BuildResult {
        let anchor = initializer.or(condition).or(incrementor).unwrap_or(body);
        let keyword = self.find_token_before("for", self.span(anchor)?.start)?;
        let end = self.span(body)?.end;
        Ok(self.push(
            NodeKind::For {
                initializer,
                condition,
                incrementor,
                body,
            },
            Span::new(keyword.start, end),
        ))
    }

    pub fn expression_statement(&mut self, expression: NodeId) -> BuildResult {
        let e = self.span(expression)?;
        let end = self.include_semicolon(e.end);
        Ok(self.push(
            NodeKind::ExpressionStatement { expression },
            Span::new(e.start, end),
        ))
    }

    /// `let name = initializer;` (also `const`/`var`). `name` must be an identifier node.
    pub fn variable_declaration(&mut self, name: NodeId, initializer: Option<NodeId>) -> BuildResult {
        let n = self.span(name)?;
        let keyword = ["const", "let", "var"]
            .into_iter()
            .filter_map(|keyword| self.find_token_before(keyword, n.start).ok())
            .max_by_key(|span| span.start)
            .ok_or_else(|| FragmentError::TokenNotFound {
                token: "let".to_string(),
                from: n.start,
            })?;
        let end = match initializer {
            Some(initializer) => self.span(initializer)?.end,
            None => n.end,
        };
        let end = self.include_semicolon(end);
        Ok(self.push(
            NodeKind::VariableDeclaration { name, initializer },
            Span::new(keyword.start, end),
        ))
    }

    /// A node the walker does not inspect, covering its children.
    pub fn other(&mut self, children: Vec<NodeId>) -> BuildResult {
        let mut span: Option<Span> = None;
        for &child in &children {
            let child = self.span(child)?;
            span = Some(span.map_or(child, |span| span.cover(child)));
        }
        let span = span.ok_or_else(|| FragmentError::Unparseable {
            reason: "other node without children".to_string(),
        })?;
        Ok(self.push(NodeKind::Other { children }, span))
    }

    // =========================================================================
    // Token search
    // =========================================================================

    fn slice(&self, start: u32, end: u32) -> &str {
        self.text.get(start as usize..end as usize).unwrap_or("")
    }

    fn find_token(&self, token: &str, from: u32) -> Result<Span, FragmentError> {
        let mut start = from as usize;
        while let Some(pos) = self.text.get(start..).and_then(|rest| rest.find(token)) {
            let begin = start + pos;
            let end = begin + token.len();
            if self.is_token_boundary(begin, end, token) {
                return Ok(Span::new(begin as u32, end as u32));
            }
            start = begin + token.chars().next().map_or(1, char::len_utf8);
        }
        Err(FragmentError::TokenNotFound {
            token: token.to_string(),
            from,
        })
    }

    fn find_token_before(&self, token: &str, before: u32) -> Result<Span, FragmentError> {
        let mut end = before as usize;
        while let Some(pos) = self.text.get(..end).and_then(|head| head.rfind(token)) {
            if self.is_token_boundary(pos, pos + token.len(), token) {
                return Ok(Span::new(pos as u32, (pos + token.len()) as u32));
            }
            end = pos;
        }
        Err(FragmentError::TokenNotFound {
            token: token.to_string(),
            from: before,
        })
    }

    /// Word-like tokens must not be part of a longer identifier.
    fn is_token_boundary(&self, begin: usize, end: usize, token: &str) -> bool {
        let starts_word = token.chars().next().is_some_and(is_word_char);
        let ends_word = token.chars().next_back().is_some_and(is_word_char);
        if starts_word && self.text[..begin].chars().next_back().is_some_and(is_word_char) {
            return false;
        }
        if ends_word && self.text[end..].chars().next().is_some_and(is_word_char) {
            return false;
        }
        true
    }

    fn prev_non_ws(&self, before: u32) -> Option<(u32, char)> {
        self.text
            .get(..before as usize)?
            .char_indices()
            .rev()
            .find(|(_, c)| !c.is_whitespace())
            .map(|(i, c)| (i as u32, c))
    }

    fn next_non_ws(&self, from: u32) -> Option<(u32, char)> {
        self.text
            .get(from as usize..)?
            .char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .map(|(i, c)| (from + i as u32, c))
    }

    fn expect_before(&self, expected: char, before: u32) -> Result<u32, FragmentError> {
        match self.prev_non_ws(before) {
            Some((pos, c)) if c == expected => Ok(pos),
            _ => Err(FragmentError::TokenNotFound {
                token: expected.to_string(),
                from: before,
            }),
        }
    }

    fn expect_after(&self, expected: char, from: u32) -> Result<u32, FragmentError> {
        match self.next_non_ws(from) {
            Some((pos, c)) if c == expected => Ok(pos),
            _ => Err(FragmentError::TokenNotFound {
                token: expected.to_string(),
                from,
            }),
        }
    }

    fn include_semicolon(&self, end: u32) -> u32 {
        match self.next_non_ws(end) {
            Some((pos, ';')) => pos + 1,
            _ => end,
        }
    }

    /// Position of the `(` opening an argument list after `from`, and whether
    /// it is preceded by `?.`.
    fn open_arguments(&self, from: u32) -> Result<(u32, bool), FragmentError> {
        match self.next_non_ws(from) {
            Some((pos, '(')) => Ok((pos, false)),
            Some((pos, '?')) if self.slice(pos, pos + 2) == "?." => {
                Ok((self.expect_after('(', pos + 2)?, true))
            }
            _ => Err(FragmentError::TokenNotFound {
                token: "(".to_string(),
                from,
            }),
        }
    }

    fn close_arguments(&self, open: u32, args: &[NodeId]) -> Result<u32, FragmentError> {
        let from = match args.last() {
            Some(&last) => self.span(last)?.end,
            None => open + 1,
        };
        match self.next_non_ws(from) {
            Some((pos, ')')) => Ok(pos),
            Some((pos, ',')) => self.expect_after(')', pos + 1),
            _ => Err(FragmentError::TokenNotFound {
                token: ")".to_string(),
                from,
            }),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_match_whole_words() {
        let mut b = FragmentBuilder::new("if (i) {}");
        let i = b.identifier("i").expect("identifier");
        assert_eq!(b.span(i).expect("span"), Span::new(4, 5));
    }

    #[test]
    fn optional_flag_comes_from_text() {
        let mut b = FragmentBuilder::new("a?.b.c");
        let a = b.identifier("a").expect("a");
        let ab = b.property(a, "b").expect("a?.b");
        let abc = b.property(ab, "c").expect("a?.b.c");
        let fragment = b.finish(abc).expect("fragment");
        assert!(matches!(
            fragment.kind(ab),
            Some(NodeKind::PropertyAccess { optional: true, .. })
        ));
        assert!(matches!(
            fragment.kind(abc),
            Some(NodeKind::PropertyAccess { optional: false, .. })
        ));
        assert_eq!(fragment.text(abc), "a?.b.c");
    }

    #[test]
    fn binary_requires_operator_between_operands() {
        let mut b = FragmentBuilder::new("a && b");
        let a = b.identifier("a").expect("a");
        let bb = b.identifier("b").expect("b");
        assert!(matches!(
            b.binary(a, "||", bb),
            Err(FragmentError::TokenNotFound { .. })
        ));
        assert!(b.binary(a, "&&", bb).is_ok());
    }

    #[test]
    fn statement_spans_include_keywords_and_semicolons() {
        let mut b = FragmentBuilder::new("while (x) { y; }");
        let x = b.identifier("x").expect("x");
        let y = b.identifier("y").expect("y");
        let y_stmt = b.expression_statement(y).expect("y;");
        let block = b.block(vec![y_stmt]).expect("block");
        let stmt = b.while_statement(x, block).expect("while");
        let fragment = b.finish(stmt).expect("fragment");
        assert_eq!(fragment.span(stmt), Some(Span::new(0, 16)));
        assert_eq!(fragment.text(y_stmt), "y;");
        assert_eq!(fragment.text(block), "{ y; }");
    }

    #[test]
    fn arrow_inside_call_does_not_take_call_parenthesis() {
        let mut b = FragmentBuilder::new("arr.filter(x => true)");
        let arr = b.identifier("arr").expect("arr");
        let filter = b.property(arr, "filter").expect("filter");
        let x = b.identifier("x").expect("x");
        let body = b.keyword_literal("true").expect("true");
        let arrow = b.arrow(vec![x], body).expect("arrow");
        let call = b.call(filter, vec![arrow]).expect("call");
        let fragment = b.finish(call).expect("fragment");
        assert_eq!(fragment.text(arrow), "x => true");
        assert_eq!(fragment.text(call), "arr.filter(x => true)");
    }
}
