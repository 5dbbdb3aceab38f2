//! Typed IR and syntax fragments
//!
//! The two views of a statement the condition analyzer reconciles:
//!
//! - **Value/statement IR** (`ir`): a read-only arena lowered by the host,
//!   with def-use links from local uses to their reaching assignments
//! - **Syntax fragments** (`syntax`, `fragment`): a small per-statement tree
//!   with parent links, spans relative to the statement text
//! - **Correspondence** (`correspondence`): node-to-value pairing by span
//! - **Literal text** (`literals`): literal types read from token text

pub mod correspondence;
pub mod fragment;
pub mod ir;
pub mod literals;
pub mod syntax;

pub use correspondence::SiteMap;
pub use fragment::FragmentBuilder;
pub use ir::{
    ArithmeticOp, Body, ConstValue, InvokeFlags, InvokeKind, IrStatement, IrValue, LocalFlags,
    SourceExpression, StatementData, StmtId, UnaryOp, ValueData, ValueId,
};
pub use literals::syntax_literal_type;
pub use syntax::{
    BinaryOperator, FragmentError, LiteralKind, NodeId, NodeKind, PrefixOperator, SyntaxFragment,
    SyntaxNode, SyntaxProvider,
};
