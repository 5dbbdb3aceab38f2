//! Constrained-type resolution.
//!
//! Maps an IR value to the narrowest type the analyzer can prove for it,
//! following local uses back to their reaching assignments. Resolution is
//! bounded twice:
//!
//! - **Definition depth** (`ResolveLimits::max_depth`): how many reaching
//!   assignments may be chained. Past it the answer is "unknown".
//! - **Value nesting** (`RecursionProfile::ValueNesting`): structural
//!   recursion through operands, so malformed IR cannot loop.
//!
//! Answers computed after either bound was hit are never memoized.

use crate::session::AnalysisSession;
use tracing::trace;
use tscond_common::ComparisonOperator;
use tscond_ir::{
    Body, ConstValue, InvokeFlags, InvokeKind, IrStatement, IrValue, LocalFlags, NodeId, StmtId,
    UnaryOp, ValueId,
};
use tscond_types::comparison::string_to_number;
use tscond_types::recursion::{DepthCounter, RecursionProfile};
use tscond_types::{
    DomainValue, LiteralValue, TypeData, TypeId, TypeInterner, display_literal,
    evaluate_comparison, is_literal_type, literal_domain_value, strip_aliases,
};

// =============================================================================
// Limits
// =============================================================================

/// What a resolution that hit a bound returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OnExceeded {
    /// No type; the site is not reported.
    #[default]
    Unresolved,
    /// The `unknown` type.
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveLimits {
    pub max_depth: u32,
    pub on_exceeded: OnExceeded,
}

impl ResolveLimits {
    pub const fn from_profile(profile: RecursionProfile) -> Self {
        ResolveLimits {
            max_depth: profile.max_depth(),
            on_exceeded: OnExceeded::Unresolved,
        }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn with_on_exceeded(mut self, on_exceeded: OnExceeded) -> Self {
        self.on_exceeded = on_exceeded;
        self
    }
}

impl Default for ResolveLimits {
    fn default() -> Self {
        Self::from_profile(RecursionProfile::ConstrainedType)
    }
}

// =============================================================================
// Site context
// =============================================================================

/// The syntax site a resolution is made for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SiteContext {
    pub node: NodeId,
    /// Literal type of `y` when the site is the assignment `x = y`.
    pub assigned_literal: Option<TypeId>,
    /// Condition value of the `if` statement being analyzed.
    pub if_condition: Option<ValueId>,
}

impl SiteContext {
    pub fn new(node: NodeId) -> Self {
        SiteContext {
            node,
            assigned_literal: None,
            if_condition: None,
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

pub struct ConstrainedTypeResolver<'a> {
    types: &'a TypeInterner,
    body: &'a Body,
    limits: ResolveLimits,
    definitions: DepthCounter,
    nesting: DepthCounter,
}

impl<'a> ConstrainedTypeResolver<'a> {
    pub fn new(types: &'a TypeInterner, body: &'a Body) -> Self {
        Self::with_limits(types, body, ResolveLimits::default())
    }

    pub fn with_limits(types: &'a TypeInterner, body: &'a Body, limits: ResolveLimits) -> Self {
        ConstrainedTypeResolver {
            types,
            body,
            limits,
            definitions: DepthCounter::new(limits.max_depth),
            nesting: DepthCounter::with_profile(RecursionProfile::ValueNesting),
        }
    }

    pub fn limits(&self) -> ResolveLimits {
        self.limits
    }

    /// Constrained type of `value` at `site`, memoized in `session`.
    pub fn resolve(
        &mut self,
        session: &mut AnalysisSession,
        value: ValueId,
        site: &SiteContext,
    ) -> Option<TypeId> {
        let key = (value, site.node);
        if let Some(cached) = session.cached_resolution(key) {
            trace!(value = value.0, site = site.node.0, "resolution cache hit");
            return cached;
        }

        self.definitions.reset();
        self.nesting.reset();
        let result = self.resolve_value(value, site);
        if self.definitions.is_exceeded() || self.nesting.is_exceeded() {
            trace!(value = value.0, ?result, "resolution truncated, not memoized");
        } else {
            session.store_resolution(key, result);
        }
        result
    }

    fn exceeded(&self) -> Option<TypeId> {
        match self.limits.on_exceeded {
            OnExceeded::Unresolved => None,
            OnExceeded::Unknown => Some(TypeId::UNKNOWN),
        }
    }

    fn resolve_value(&mut self, value: ValueId, site: &SiteContext) -> Option<TypeId> {
        if !self.nesting.enter() {
            trace!(value = value.0, "value nesting limit reached");
            return self.exceeded();
        }
        let result = self.resolve_value_inner(value, site);
        self.nesting.leave();
        result
    }

    fn resolve_value_inner(&mut self, value: ValueId, site: &SiteContext) -> Option<TypeId> {
        let Some(data) = self.body.value(value) else {
            trace!(value = value.0, "dangling value");
            return None;
        };
        match &data.value {
            IrValue::Constant { value, ty } => Some(self.constant_type(value, *ty)),
            IrValue::Local {
                decl, ty, flags, ..
            } => match decl {
                None => *ty,
                Some(decl) => self.resolve_definition(*decl, *flags, site),
            },
            IrValue::Parameter { declared_type, .. } => Some(*declared_type),
            IrValue::ConditionExpr {
                op,
                left,
                right,
                implicit,
            } => self.resolve_condition(value, *op, *left, *right, *implicit, site),
            IrValue::TypeOf { .. } => Some(TypeId::STRING),
            IrValue::New { class_type, args } => {
                if let [arg] = args.as_slice()
                    && let Some(literal) = self.resolve_value(*arg, site)
                    && self.types.literal_value(literal).is_some()
                {
                    return Some(literal);
                }
                Some(*class_type)
            }
            IrValue::FieldRef { base, field, ty } => match ty {
                Some(ty) => Some(*ty),
                None => {
                    let base = self.resolve_value((*base)?, site)?;
                    self.field_type(base, field)
                }
            },
            IrValue::Await { inner } => self.resolve_value(*inner, site),
            IrValue::Invoke {
                kind,
                base,
                method,
                args,
                return_type,
                flags,
            } => self.resolve_invoke(kind, *base, method, args, *return_type, *flags, site),
            IrValue::ArrayRef { base, index } => self.resolve_element(*base, *index, site),
            IrValue::UnaryOp { op, operand } => self.resolve_unary(*op, *operand, site),
            IrValue::BinaryOp { ty, .. } => *ty,
        }
    }

    fn constant_type(&self, value: &ConstValue, declared: TypeId) -> TypeId {
        match value {
            ConstValue::String(s) => self.types.literal_string(s),
            ConstValue::Number(n) => self.types.literal_number(*n),
            ConstValue::BigInt(digits) => self.types.literal_bigint(digits),
            ConstValue::Boolean(b) => self.types.literal_boolean(*b),
            ConstValue::Null => TypeId::NULL,
            ConstValue::Undefined => TypeId::UNDEFINED,
            ConstValue::Other => declared,
        }
    }

    // -------------------------------------------------------------------------
    // Definitions
    // -------------------------------------------------------------------------

    fn resolve_definition(
        &mut self,
        decl: StmtId,
        use_flags: LocalFlags,
        site: &SiteContext,
    ) -> Option<TypeId> {
        if !self.definitions.enter() {
            trace!(
                stmt = decl.0,
                max_depth = self.definitions.max_depth(),
                "definition depth ceiling reached"
            );
            return self.exceeded();
        }
        let result = match self.body.statement(decl).map(|data| &data.stmt) {
            Some(IrStatement::Assign { left, right }) => {
                self.resolve_assign(*left, *right, use_flags, site)
            }
            Some(IrStatement::InvokeStmt { expr }) => self.resolve_value(*expr, site),
            Some(IrStatement::If { .. }) | None => None,
        };
        self.definitions.leave();
        result
    }

    fn resolve_assign(
        &mut self,
        left: ValueId,
        right: ValueId,
        use_flags: LocalFlags,
        site: &SiteContext,
    ) -> Option<TypeId> {
        let (declared, left_flags) = match self.body.value(left).map(|data| &data.value) {
            Some(IrValue::Local { ty, flags, .. }) => (*ty, *flags),
            Some(IrValue::FieldRef { ty, .. }) => (*ty, LocalFlags::empty()),
            _ => (None, LocalFlags::empty()),
        };

        if (left_flags | use_flags).contains(LocalFlags::NEVER_REASSIGNED)
            && let Some(right_ty) = self.resolve_value(right, site)
            && is_literal_type(self.types, right_ty)
        {
            return Some(right_ty);
        }

        match declared {
            Some(ty) if ty != TypeId::UNKNOWN => Some(ty),
            _ => self.resolve_value(right, site),
        }
    }

    // -------------------------------------------------------------------------
    // Comparisons
    // -------------------------------------------------------------------------

    fn resolve_condition(
        &mut self,
        value: ValueId,
        op: ComparisonOperator,
        left: ValueId,
        right: ValueId,
        implicit: bool,
        site: &SiteContext,
    ) -> Option<TypeId> {
        let left_ty = match site.assigned_literal {
            Some(literal) => Some(literal),
            None => self.resolve_value(left, site),
        };

        if implicit
            && site.if_condition == Some(value)
            && left_ty.is_some_and(|ty| self.is_function(ty))
        {
            return Some(TypeId::BOOLEAN_TRUE);
        }
        if implicit {
            return left_ty;
        }

        let right_ty = self.resolve_value(right, site);
        if let (Some(l), Some(r)) = (left_ty, right_ty)
            && let Some(outcome) = evaluate_comparison(self.types, op, l, r)
        {
            return Some(self.types.literal_boolean(outcome));
        }
        Some(TypeId::BOOLEAN)
    }

    fn is_function(&self, ty: TypeId) -> bool {
        matches!(
            self.types.lookup(strip_aliases(self.types, ty)),
            Some(TypeData::Function(_))
        )
    }

    // -------------------------------------------------------------------------
    // Members
    // -------------------------------------------------------------------------

    fn field_type(&self, base: TypeId, field: &str) -> Option<TypeId> {
        let base = strip_aliases(self.types, base);
        match self.types.lookup(base)? {
            TypeData::Class(_) => self.types.class_shape_of(base)?.field(field),
            TypeData::Array(_) | TypeData::Tuple(_) if field == "length" => Some(TypeId::NUMBER),
            TypeData::Intrinsic(_) | TypeData::Literal(_) if field == "length" => {
                Some(TypeId::NUMBER)
            }
            _ => None,
        }
    }

    fn method_return(&self, base: TypeId, method: &str) -> Option<(TypeId, bool)> {
        let shape = self.types.class_shape_of(strip_aliases(self.types, base))?;
        let signature = self.types.function_shape(shape.method(method)?)?;
        Some((signature.return_type, signature.is_async()))
    }

    fn resolve_invoke(
        &mut self,
        kind: &InvokeKind,
        base: Option<ValueId>,
        method: &str,
        args: &[ValueId],
        return_type: Option<TypeId>,
        flags: InvokeFlags,
        site: &SiteContext,
    ) -> Option<TypeId> {
        if let [arg] = args
            && let Some(wrapper) = Wrapper::of(kind, method)
            && let Some(arg_ty) = self.resolve_value(*arg, site)
            && let Some(folded) = wrapper.fold(self.types, arg_ty)
        {
            trace!(method, "folded wrapper call");
            return Some(folded);
        }

        let mut is_async = flags.contains(InvokeFlags::ASYNC);
        let declared = match return_type {
            Some(ty) => Some(ty),
            None if *kind == InvokeKind::Instance => {
                let base = self.resolve_value(base?, site)?;
                let (ty, shape_async) = self.method_return(base, method)?;
                is_async |= shape_async;
                Some(ty)
            }
            None => None,
        };

        match declared {
            Some(TypeId::VOID) if is_async => Some(self.types.unclear("Promise<void>")),
            other => other,
        }
    }

    fn resolve_element(&mut self, base: ValueId, index: ValueId, site: &SiteContext) -> Option<TypeId> {
        let base = self.resolve_value(base, site)?;
        let Some(TypeData::Tuple(list)) = self.types.lookup(strip_aliases(self.types, base)) else {
            return None;
        };
        let Some(IrValue::Constant {
            value: ConstValue::Number(n),
            ..
        }) = self.body.value(index).map(|data| &data.value)
        else {
            return None;
        };
        if n.fract() != 0.0 || *n < 0.0 {
            return None;
        }
        self.types.type_list(list).get(*n as usize).copied()
    }

    fn resolve_unary(&mut self, op: UnaryOp, operand: ValueId, site: &SiteContext) -> Option<TypeId> {
        match op {
            UnaryOp::Not => {
                let operand = self.resolve_value(operand, site);
                let value = operand.and_then(|ty| literal_domain_value(self.types, ty));
                Some(match value {
                    Some(value) => self.types.literal_boolean(!domain_truthy(&value)),
                    None => TypeId::BOOLEAN,
                })
            }
            UnaryOp::Negate => {
                let operand = self.resolve_value(operand, site);
                match operand.and_then(|ty| self.types.literal_value(ty)) {
                    Some(LiteralValue::Number(n)) => Some(self.types.literal_number(-n.value())),
                    Some(LiteralValue::BigInt(digits)) => {
                        let negated = match digits.strip_prefix('-') {
                            Some(positive) => positive.to_string(),
                            None => format!("-{digits}"),
                        };
                        Some(self.types.literal_bigint(&negated))
                    }
                    _ => Some(TypeId::NUMBER),
                }
            }
            UnaryOp::Void => Some(TypeId::UNDEFINED),
            UnaryOp::Plus | UnaryOp::BitNot => Some(TypeId::NUMBER),
        }
    }
}

fn domain_truthy(value: &DomainValue) -> bool {
    match value {
        DomainValue::Literal(literal) => !literal.is_falsy(),
        DomainValue::Null | DomainValue::Undefined => false,
    }
}

// =============================================================================
// Wrapper idioms
// =============================================================================

/// Calls whose result is a fixed conversion of their single argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Wrapper {
    /// `Promise.resolve(x)`
    PromiseResolve,
    Boolean,
    String,
    Number,
    BigInt,
}

impl Wrapper {
    fn of(kind: &InvokeKind, method: &str) -> Option<Self> {
        match kind {
            InvokeKind::Static { class } if &**class == "Promise" && method == "resolve" => {
                Some(Wrapper::PromiseResolve)
            }
            InvokeKind::Function => match method {
                "Boolean" => Some(Wrapper::Boolean),
                "String" => Some(Wrapper::String),
                "Number" => Some(Wrapper::Number),
                "BigInt" => Some(Wrapper::BigInt),
                _ => None,
            },
            _ => None,
        }
    }

    /// Literal result of calling the wrapper on a literal-domain argument.
    fn fold(self, types: &TypeInterner, arg: TypeId) -> Option<TypeId> {
        let value = literal_domain_value(types, arg)?;
        match self {
            Wrapper::PromiseResolve => Some(arg),
            Wrapper::Boolean => Some(types.literal_boolean(domain_truthy(&value))),
            Wrapper::String => {
                let text = match &value {
                    DomainValue::Literal(LiteralValue::String(s)) => s.to_string(),
                    DomainValue::Literal(LiteralValue::BigInt(digits)) => digits.to_string(),
                    DomainValue::Literal(literal) => display_literal(literal),
                    DomainValue::Null => "null".to_string(),
                    DomainValue::Undefined => "undefined".to_string(),
                };
                Some(types.literal_string(&text))
            }
            Wrapper::Number => {
                let n = match &value {
                    DomainValue::Literal(LiteralValue::String(s)) => string_to_number(s),
                    DomainValue::Literal(LiteralValue::Number(n)) => n.value(),
                    DomainValue::Literal(LiteralValue::BigInt(digits)) => digits.parse().ok()?,
                    DomainValue::Literal(LiteralValue::Boolean(b)) => f64::from(u8::from(*b)),
                    DomainValue::Null => 0.0,
                    DomainValue::Undefined => f64::NAN,
                };
                Some(types.literal_number(n))
            }
            Wrapper::BigInt => {
                let digits = match &value {
                    DomainValue::Literal(LiteralValue::BigInt(digits)) => digits.to_string(),
                    DomainValue::Literal(LiteralValue::Number(n))
                        if n.value().is_finite() && n.value().fract() == 0.0 =>
                    {
                        format!("{:.0}", n.value())
                    }
                    DomainValue::Literal(LiteralValue::Boolean(b)) => u8::from(*b).to_string(),
                    DomainValue::Literal(LiteralValue::String(s)) => {
                        s.trim().parse::<i128>().ok()?.to_string()
                    }
                    // BigInt(null) and BigInt(undefined) throw.
                    DomainValue::Null | DomainValue::Undefined => return None,
                    DomainValue::Literal(LiteralValue::Number(_)) => return None,
                };
                Some(types.literal_bigint(&digits))
            }
        }
    }
}
