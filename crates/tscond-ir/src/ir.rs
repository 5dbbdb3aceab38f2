//! Value/statement IR.
//!
//! A [`Body`] is a read-only arena of values and statements lowered from one
//! function body by the host. Values reference each other by [`ValueId`];
//! each `Local` use points at its single reaching assignment, so the graph
//! doubles as a def-use chain.
//!
//! ```text
//! s0: x = 1                    Assign(Local x, Constant 1)
//! s1: if (x) {}                If(ConditionExpr(!=, Local x -> s0, Constant 0, implicit))
//! ```
//!
//! Every statement carries the [`SourceExpression`] it was lowered from.
//! Temporaries introduced by lowering carry an empty source text.

use bitflags::bitflags;
use smallvec::SmallVec;
use std::sync::Arc;
use tscond_common::{ComparisonOperator, Span};
use tscond_types::TypeId;

// =============================================================================
// Handles
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StmtId(pub u32);

// =============================================================================
// Values
// =============================================================================

/// Value of an IR constant.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstValue {
    String(Arc<str>),
    Number(f64),
    /// Decimal digits without the `n` suffix.
    BigInt(Arc<str>),
    Boolean(bool),
    Null,
    Undefined,
    /// A non-primitive constant (regular expression, class reference, ...);
    /// resolves to its declared type.
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
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
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
    BitNot,
    Void,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LocalFlags: u8 {
        /// The local is assigned exactly once (`const`, or a `let` never written again).
        const NEVER_REASSIGNED = 1 << 0;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InvokeFlags: u8 {
        /// The callee is an `async` function.
        const ASYNC = 1 << 0;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvokeKind {
    /// `base.method(args)`
    Instance,
    /// `Class.method(args)`, e.g. `Promise.resolve(x)`
    Static { class: Arc<str> },
    /// `method(args)`, e.g. `Boolean(x)`
    Function,
}

#[derive(Clone, Debug, PartialEq)]
pub enum IrValue {
    Constant {
        value: ConstValue,
        ty: TypeId,
    },
    /// A use of a local. `decl` is the single reaching assignment; `None`
    /// means the local is bound outside the body (a parameter or a captured
    /// variable), and `ty` is its declared type.
    Local {
        name: Arc<str>,
        decl: Option<StmtId>,
        ty: Option<TypeId>,
        flags: LocalFlags,
    },
    BinaryOp {
        op: ArithmeticOp,
        left: ValueId,
        right: ValueId,
        ty: Option<TypeId>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: ValueId,
    },
    /// A comparison. `implicit` marks truthiness tests lowered from `if (x)`.
    ConditionExpr {
        op: ComparisonOperator,
        left: ValueId,
        right: ValueId,
        implicit: bool,
    },
    FieldRef {
        base: Option<ValueId>,
        field: Arc<str>,
        ty: Option<TypeId>,
    },
    Invoke {
        kind: InvokeKind,
        base: Option<ValueId>,
        method: Arc<str>,
        args: Vec<ValueId>,
        return_type: Option<TypeId>,
        flags: InvokeFlags,
    },
    New {
        class_type: TypeId,
        args: Vec<ValueId>,
    },
    ArrayRef {
        base: ValueId,
        index: ValueId,
    },
    TypeOf {
        operand: ValueId,
    },
    Await {
        inner: ValueId,
    },
    Parameter {
        index: u32,
        declared_type: TypeId,
    },
}

impl IrValue {
    /// Values this value reads.
    pub fn operands(&self) -> SmallVec<[ValueId; 4]> {
        let mut out = SmallVec::new();
        match self {
            IrValue::Constant { .. } | IrValue::Local { .. } | IrValue::Parameter { .. } => {}
            IrValue::BinaryOp { left, right, .. } | IrValue::ConditionExpr { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            IrValue::UnaryOp { operand, .. } | IrValue::TypeOf { operand } => out.push(*operand),
            IrValue::Await { inner } => out.push(*inner),
            IrValue::FieldRef { base, .. } => out.extend(base.iter().copied()),
            IrValue::Invoke { base, args, .. } => {
                out.extend(base.iter().copied());
                out.extend(args.iter().copied());
            }
            IrValue::New { args, .. } => out.extend(args.iter().copied()),
            IrValue::ArrayRef { base, index } => {
                out.push(*base);
                out.push(*index);
            }
        }
        out
    }

    /// A primitive constant.
    pub fn is_primitive_constant(&self) -> bool {
        matches!(self, IrValue::Constant { value, .. } if *value != ConstValue::Other)
    }

    pub fn is_numeric_constant(&self) -> bool {
        matches!(
            self,
            IrValue::Constant {
                value: ConstValue::Number(_) | ConstValue::BigInt(_),
                ..
            }
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValueData {
    pub value: IrValue,
    /// Absolute source span the value was lowered from.
    pub span: Option<Span>,
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IrStatement {
    Assign { left: ValueId, right: ValueId },
    If { condition: ValueId },
    InvokeStmt { expr: ValueId },
}

impl IrStatement {
    pub fn operands(&self) -> SmallVec<[ValueId; 2]> {
        match *self {
            IrStatement::Assign { left, right } => SmallVec::from_slice(&[left, right]),
            IrStatement::If { condition } => SmallVec::from_slice(&[condition]),
            IrStatement::InvokeStmt { expr } => SmallVec::from_slice(&[expr]),
        }
    }
}

/// The source a statement was lowered from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceExpression {
    /// Absolute byte span in the file.
    pub span: Span,
    /// 1-based line of `span.start`.
    pub line: u32,
    /// 1-based column of `span.start`.
    pub column: u32,
    pub text: Arc<str>,
}

impl SourceExpression {
    pub fn new(start: u32, line: u32, column: u32, text: &str) -> Self {
        SourceExpression {
            span: Span::at(start, text.len() as u32),
            line,
            column,
            text: text.into(),
        }
    }

    /// Source of a temporary introduced by lowering.
    pub fn synthetic(start: u32) -> Self {
        SourceExpression {
            span: Span::at(start, 0),
            line: 1,
            column: 1,
            text: "".into(),
        }
    }

    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatementData {
    pub stmt: IrStatement,
    pub source: SourceExpression,
}

// =============================================================================
// Body
// =============================================================================

/// Arena of values and statements for one body.
#[derive(Clone, Debug, Default)]
pub struct Body {
    values: Vec<ValueData>,
    statements: Vec<StatementData>,
}

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, id: ValueId) -> Option<&ValueData> {
        self.values.get(id.0 as usize)
    }

    pub fn statement(&self, id: StmtId) -> Option<&StatementData> {
        self.statements.get(id.0 as usize)
    }

    /// Statement ids in program order.
    pub fn statement_ids(&self) -> impl Iterator<Item = StmtId> + '_ {
        (0..self.statements.len() as u32).map(StmtId)
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    pub fn add_value(&mut self, value: IrValue, span: Option<Span>) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(ValueData { value, span });
        id
    }

    pub fn add_statement(&mut self, stmt: IrStatement, source: SourceExpression) -> StmtId {
        let id = StmtId(self.statements.len() as u32);
        self.statements.push(StatementData { stmt, source });
        id
    }

    pub fn constant(&mut self, value: ConstValue, ty: TypeId, span: Option<Span>) -> ValueId {
        self.add_value(IrValue::Constant { value, ty }, span)
    }

    /// A local use whose reaching assignment is `decl`.
    pub fn local(
        &mut self,
        name: &str,
        decl: Option<StmtId>,
        ty: Option<TypeId>,
        span: Option<Span>,
    ) -> ValueId {
        self.add_value(
            IrValue::Local {
                name: name.into(),
                decl,
                ty,
                flags: LocalFlags::empty(),
            },
            span,
        )
    }

    /// A `const`-like local use.
    pub fn const_local(
        &mut self,
        name: &str,
        decl: Option<StmtId>,
        ty: Option<TypeId>,
        span: Option<Span>,
    ) -> ValueId {
        self.add_value(
            IrValue::Local {
                name: name.into(),
                decl,
                ty,
                flags: LocalFlags::NEVER_REASSIGNED,
            },
            span,
        )
    }

    pub fn condition(
        &mut self,
        op: ComparisonOperator,
        left: ValueId,
        right: ValueId,
        span: Option<Span>,
    ) -> ValueId {
        self.add_value(
            IrValue::ConditionExpr {
                op,
                left,
                right,
                implicit: false,
            },
            span,
        )
    }

    /// The `x != 0` test lowered from `if (x)`.
    pub fn truthiness_test(&mut self, operand: ValueId, span: Option<Span>) -> ValueId {
        let zero = self.add_value(
            IrValue::Constant {
                value: ConstValue::Number(0.0),
                ty: TypeId::NUMBER,
            },
            None,
        );
        self.add_value(
            IrValue::ConditionExpr {
                op: ComparisonOperator::StrictNotEqual,
                left: operand,
                right: zero,
                implicit: true,
            },
            span,
        )
    }

    pub fn assign(&mut self, left: ValueId, right: ValueId, source: SourceExpression) -> StmtId {
        self.add_statement(IrStatement::Assign { left, right }, source)
    }

    pub fn if_stmt(&mut self, condition: ValueId, source: SourceExpression) -> StmtId {
        self.add_statement(IrStatement::If { condition }, source)
    }

    pub fn invoke_stmt(&mut self, expr: ValueId, source: SourceExpression) -> StmtId {
        self.add_statement(IrStatement::InvokeStmt { expr }, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operands_follow_structure() {
        let mut body = Body::new();
        let base = body.local("arr", None, None, None);
        let callback = body.local("cb", None, None, None);
        let call = body.add_value(
            IrValue::Invoke {
                kind: InvokeKind::Instance,
                base: Some(base),
                method: "filter".into(),
                args: vec![callback],
                return_type: None,
                flags: InvokeFlags::empty(),
            },
            None,
        );
        let data = body.value(call).expect("value");
        assert_eq!(data.value.operands().as_slice(), &[base, callback]);
    }

    #[test]
    fn truthiness_test_is_implicit() {
        let mut body = Body::new();
        let x = body.local("x", None, Some(TypeId::STRING), None);
        let test = body.truthiness_test(x, Some(Span::new(4, 5)));
        let Some(ValueData {
            value: IrValue::ConditionExpr { left, implicit, .. },
            span,
        }) = body.value(test)
        else {
            panic!("expected condition");
        };
        assert_eq!(*left, x);
        assert!(*implicit);
        assert_eq!(*span, Some(Span::new(4, 5)));
    }

    #[test]
    fn synthetic_sources_have_no_text() {
        assert!(SourceExpression::synthetic(10).is_synthetic());
        let source = SourceExpression::new(10, 2, 1, "x = 1;");
        assert_eq!(source.span, Span::new(10, 16));
        assert!(!source.is_synthetic());
    }
}
