//! Syntax fragments.
//!
//! A [`SyntaxFragment`] is the minimal standalone tree a syntax provider
//! returns for one statement's source text. Spans are byte offsets relative
//! to that text. The walker only needs expression shapes, statement tests
//! and parent links, so the node set is small and closed.

use smallvec::SmallVec;
use std::sync::Arc;
use thiserror::Error;
use tscond_common::{ComparisonOperator, Span};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

// =============================================================================
// Operators
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Comparison(ComparisonOperator),
    /// `&&`
    And,
    /// `||`
    Or,
    /// `??`
    Coalesce,
    /// `=`
    Assign,
    /// `&&=`
    AndAssign,
    /// `||=`
    OrAssign,
    /// `??=`
    CoalesceAssign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
    In,
    InstanceOf,
    Comma,
}

impl BinaryOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comparison(op) => op.as_str(),
            Self::And => "&&",
            Self::Or => "||",
            Self::Coalesce => "??",
            Self::Assign => "=",
            Self::AndAssign => "&&=",
            Self::OrAssign => "||=",
            Self::CoalesceAssign => "??=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Exp => "**",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
            Self::In => "in",
            Self::InstanceOf => "instanceof",
            Self::Comma => ",",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        if let Some(op) = ComparisonOperator::from_token(token) {
            return Some(Self::Comparison(op));
        }
        Some(match token {
            "&&" => Self::And,
            "||" => Self::Or,
            "??" => Self::Coalesce,
            "=" => Self::Assign,
            "&&=" => Self::AndAssign,
            "||=" => Self::OrAssign,
            "??=" => Self::CoalesceAssign,
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Rem,
            "**" => Self::Exp,
            "&" => Self::BitAnd,
            "|" => Self::BitOr,
            "^" => Self::BitXor,
            "<<" => Self::Shl,
            ">>" => Self::Shr,
            ">>>" => Self::UShr,
            "in" => Self::In,
            "instanceof" => Self::InstanceOf,
            "," => Self::Comma,
            _ => return None,
        })
    }

    pub const fn comparison(self) -> Option<ComparisonOperator> {
        match self {
            Self::Comparison(op) => Some(op),
            _ => None,
        }
    }

    /// `&&` or `||`.
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// `&&=`, `||=` or `??=`.
    pub const fn is_logical_assignment(self) -> bool {
        matches!(self, Self::AndAssign | Self::OrAssign | Self::CoalesceAssign)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrefixOperator {
    /// `!`
    Not,
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `~`
    BitNot,
    TypeOf,
    Void,
}

impl PrefixOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Minus => "-",
            Self::Plus => "+",
            Self::BitNot => "~",
            Self::TypeOf => "typeof",
            Self::Void => "void",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "!" => Self::Not,
            "-" => Self::Minus,
            "+" => Self::Plus,
            "~" => Self::BitNot,
            "typeof" => Self::TypeOf,
            "void" => Self::Void,
            _ => return None,
        })
    }
}

// =============================================================================
// Nodes
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Number,
    String,
    BigInt,
    True,
    False,
    Null,
    Undefined,
    Template,
    RegExp,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Identifier,
    Literal(LiteralKind),
    Parenthesized {
        expression: NodeId,
    },
    Binary {
        op: BinaryOperator,
        left: NodeId,
        right: NodeId,
    },
    Prefix {
        op: PrefixOperator,
        operand: NodeId,
    },
    Conditional {
        condition: NodeId,
        when_true: NodeId,
        when_false: NodeId,
    },
    PropertyAccess {
        object: NodeId,
        name: NodeId,
        optional: bool,
    },
    ElementAccess {
        object: NodeId,
        index: NodeId,
        optional: bool,
    },
    Call {
        callee: NodeId,
        args: Vec<NodeId>,
        optional: bool,
    },
    New {
        callee: NodeId,
        args: Vec<NodeId>,
    },
    Await {
        operand: NodeId,
    },
    Arrow {
        params: Vec<NodeId>,
        body: NodeId,
    },
    Block {
        statements: Vec<NodeId>,
    },
    Return {
        expression: Option<NodeId>,
    },
    If {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    While {
        condition: NodeId,
        body: NodeId,
    },
    DoWhile {
        body: NodeId,
        condition: NodeId,
    },
    For {
        initializer: Option<NodeId>,
        condition: Option<NodeId>,
        incrementor: Option<NodeId>,
        body: NodeId,
    },
    ExpressionStatement {
        expression: NodeId,
    },
    VariableDeclaration {
        name: NodeId,
        initializer: Option<NodeId>,
    },
    Other {
        children: Vec<NodeId>,
    },
}

impl NodeKind {
    /// Child nodes in source order.
    pub fn children(&self) -> SmallVec<[NodeId; 4]> {
        let mut out = SmallVec::new();
        match self {
            NodeKind::Identifier | NodeKind::Literal(_) => {}
            NodeKind::Parenthesized { expression } => out.push(*expression),
            NodeKind::Binary { left, right, .. } => out.extend([*left, *right]),
            NodeKind::Prefix { operand, .. } | NodeKind::Await { operand } => out.push(*operand),
            NodeKind::Conditional {
                condition,
                when_true,
                when_false,
            } => out.extend([*condition, *when_true, *when_false]),
            NodeKind::PropertyAccess { object, name, .. } => out.extend([*object, *name]),
            NodeKind::ElementAccess { object, index, .. } => out.extend([*object, *index]),
            NodeKind::Call { callee, args, .. } | NodeKind::New { callee, args } => {
                out.push(*callee);
                out.extend(args.iter().copied());
            }
            NodeKind::Arrow { params, body } => {
                out.extend(params.iter().copied());
                out.push(*body);
            }
            NodeKind::Block { statements } => out.extend(statements.iter().copied()),
            NodeKind::Return { expression } => out.extend(expression.iter().copied()),
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                out.extend([*condition, *then_branch]);
                out.extend(else_branch.iter().copied());
            }
            NodeKind::While { condition, body } => out.extend([*condition, *body]),
            NodeKind::DoWhile { body, condition } => out.extend([*body, *condition]),
            NodeKind::For {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                out.extend(initializer.iter().copied());
                out.extend(condition.iter().copied());
                out.extend(incrementor.iter().copied());
                out.push(*body);
            }
            NodeKind::ExpressionStatement { expression } => out.push(*expression),
            NodeKind::VariableDeclaration { name, initializer } => {
                out.push(*name);
                out.extend(initializer.iter().copied());
            }
            NodeKind::Other { children } => out.extend(children.iter().copied()),
        }
        out
    }

    /// `if`, `while`, `do`/`while` or `for`.
    pub fn is_conditional_statement(&self) -> bool {
        matches!(
            self,
            NodeKind::If { .. } | NodeKind::While { .. } | NodeKind::DoWhile { .. } | NodeKind::For { .. }
        )
    }

    /// `while`, `do`/`while` or `for`.
    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            NodeKind::While { .. } | NodeKind::DoWhile { .. } | NodeKind::For { .. }
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Byte span relative to the fragment text.
    pub span: Span,
    pub parent: Option<NodeId>,
}

// =============================================================================
// Fragment
// =============================================================================

/// Syntax tree for one statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxFragment {
    text: Arc<str>,
    nodes: Vec<SyntaxNode>,
    root: NodeId,
}

impl SyntaxFragment {
    /// Assemble a fragment from parts; parent links are recomputed from `root`.
    pub fn from_parts(
        text: Arc<str>,
        mut nodes: Vec<SyntaxNode>,
        root: NodeId,
    ) -> Result<Self, FragmentError> {
        if text.is_empty() {
            return Err(FragmentError::EmptyText);
        }
        if root.0 as usize >= nodes.len() {
            return Err(FragmentError::Unparseable {
                reason: format!("root node {} is out of range", root.0),
            });
        }
        for node in &mut nodes {
            node.parent = None;
        }

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let children = nodes[id.0 as usize].kind.children();
            for child in children {
                let Some(node) = nodes.get_mut(child.0 as usize) else {
                    return Err(FragmentError::Unparseable {
                        reason: format!("node {} refers to missing child {}", id.0, child.0),
                    });
                };
                if node.parent.is_some() || child == root {
                    return Err(FragmentError::Unparseable {
                        reason: format!("node {} has more than one parent", child.0),
                    });
                }
                node.parent = Some(id);
                stack.push(child);
            }
        }

        Ok(SyntaxFragment { text, nodes, root })
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The statement text.
    #[inline]
    pub fn source(&self) -> &str {
        &self.text
    }

    pub fn node(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|node| &node.kind)
    }

    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.node(id).map(|node| node.span)
    }

    /// Source text of `id`, or `""` for an unknown node.
    pub fn text(&self, id: NodeId) -> &str {
        self.span(id)
            .and_then(|span| span.slice(&self.text))
            .unwrap_or("")
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> SmallVec<[NodeId; 4]> {
        self.kind(id).map(NodeKind::children).unwrap_or_default()
    }

    /// All nodes with their ids.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SyntaxNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Descend through parenthesized expressions.
    pub fn skip_parentheses(&self, mut id: NodeId) -> NodeId {
        while let Some(NodeKind::Parenthesized { expression }) = self.kind(id) {
            id = *expression;
        }
        id
    }

    /// Nearest ancestor that is not a parenthesized expression.
    pub fn parent_skipping_parentheses(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id)?;
        while let Some(NodeKind::Parenthesized { .. }) = self.kind(current) {
            current = self.parent(current)?;
        }
        Some(current)
    }
}

// =============================================================================
// Provider
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error("statement text is empty")]
    EmptyText,
    #[error("cannot parse statement: {reason}")]
    Unparseable { reason: String },
    #[error("token `{token}` not found near offset {from}")]
    TokenNotFound { token: String, from: u32 },
}

/// Turns one statement's source text into a [`SyntaxFragment`].
pub trait SyntaxProvider {
    fn parse_statement(&self, text: &str) -> Result<SyntaxFragment, FragmentError>;
}

impl<F> SyntaxProvider for F
where
    F: Fn(&str) -> Result<SyntaxFragment, FragmentError>,
{
    fn parse_statement(&self, text: &str) -> Result<SyntaxFragment, FragmentError> {
        self(text)
    }
}
