//! Nullable boolean and relational logic lowering.
//!
//! VB lifts `AndAlso`, `OrElse`, eager `And`/`Or` and comparisons over
//! nullable operands to three-valued logic: a comparison with `Nothing` is
//! `Nothing`, `Nothing AndAlso False` is `False`, and in an `If` condition a
//! `Nothing` result counts as false. C# lifted operators differ (`==` on
//! nullables is never null, `&&` does not accept `bool?`), so these
//! expressions are restated with explicit `HasValue` checks, pattern
//! captures and conditionals.
//!
//! ## Boolean context
//!
//! ```vb
//! If a AndAlso b Then
//! ```
//! Becomes:
//! ```csharp
//! if (a == true && b == true)
//! ```
//!
//! ## Tri-state result
//!
//! ```vb
//! res = a AndAlso b
//! ```
//! Becomes:
//! ```csharp
//! res = a == false ? false : !b.HasValue ? null : b.Value ? a : false;
//! ```
//!
//! ## Relational
//!
//! ```vb
//! res = x < y
//! ```
//! Becomes:
//! ```csharp
//! res = x.HasValue && y.HasValue ? x < y : null;
//! ```
//!
//! Operands that are not safely reusable are evaluated exactly once: they
//! are captured with `is var argN` / `is { } argN` and the capture is used
//! from then on.

use crate::boolean_context::can_convert_to_boolean;
use crate::null_flow::{KnownNullability, nullability_within_boolean_expression};
use crate::purity::{is_pure, is_safely_reusable};
use crate::temp_names::TempNames;
use smallvec::SmallVec;
use tracing::{debug, trace};
use vbcs_common::LoweringOptions;
use vbcs_semantic::{SemanticOracle, TypeInfo};
use vbcs_syntax::{BinaryOperator, CsExpr, CsPattern, NodeArena, NodeIndex, PathEntry};

/// A converted expression plus whether it is known to be non-null even though
/// the source expression has a nullable type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoweredExpr {
    pub expr: CsExpr,
    pub proven_not_null: bool,
}

impl LoweredExpr {
    pub fn new(expr: CsExpr) -> Self {
        LoweredExpr {
            expr,
            proven_not_null: false,
        }
    }

    pub fn not_null(expr: CsExpr) -> Self {
        LoweredExpr {
            expr,
            proven_not_null: true,
        }
    }

    pub fn tagged(self) -> Self {
        LoweredExpr {
            proven_not_null: true,
            ..self
        }
    }
}

/// Operators this pass restates.
pub fn is_supported(operator: BinaryOperator) -> bool {
    matches!(
        operator,
        BinaryOperator::Equals
            | BinaryOperator::NotEquals
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterThanOrEqual
            | BinaryOperator::LessThan
            | BinaryOperator::LessThanOrEqual
            | BinaryOperator::AndAlso
            | BinaryOperator::OrElse
            | BinaryOperator::And
            | BinaryOperator::Or
    )
}

/// Lowers one binary expression. Cheap to construct per node.
pub struct NullableLogicLowering<'a> {
    arena: &'a NodeArena,
    oracle: &'a dyn SemanticOracle,
    temps: &'a TempNames,
    options: &'a LoweringOptions,
}

/// Operand facts shared by the operator-specific builders.
struct Operands {
    left: NodeIndex,
    right: NodeIndex,
    lhs: CsExpr,
    rhs: CsExpr,
    lhs_nullable: bool,
    rhs_nullable: bool,
}

impl<'a> NullableLogicLowering<'a> {
    pub fn new(
        arena: &'a NodeArena,
        oracle: &'a dyn SemanticOracle,
        temps: &'a TempNames,
        options: &'a LoweringOptions,
    ) -> Self {
        NullableLogicLowering {
            arena,
            oracle,
            temps,
            options,
        }
    }

    /// Restate `node` for nullable operands.
    ///
    /// `node` is the binary expression being converted, `ancestors` the path
    /// to its parent, `default` the plain C# translation built from `lhs` and
    /// `rhs`. Returns `default` unchanged when the operator is not handled or
    /// an operand's converted type is not nullable.
    #[tracing::instrument(level = "trace", skip_all, fields(node = node.effective.0))]
    pub fn lower_binary(
        &self,
        node: &PathEntry,
        ancestors: &[PathEntry],
        lhs_type: TypeInfo,
        rhs_type: TypeInfo,
        default: CsExpr,
        lhs: LoweredExpr,
        rhs: LoweredExpr,
    ) -> LoweredExpr {
        let Some((left, operator, right)) = self.arena.binary(node.effective) else {
            debug_assert!(false, "lower_binary called on a non-binary node");
            return LoweredExpr::new(default);
        };
        let types = self.oracle.types();
        let converted_nullable =
            |info: TypeInfo| info.converted_type.is_some_and(|ty| types.is_nullable(ty));
        if !is_supported(operator) || !converted_nullable(lhs_type) || !converted_nullable(rhs_type) {
            return LoweredExpr::new(default);
        }

        let lhs_nullable = self.is_nullable(left, &lhs, lhs_type, node, ancestors);
        let rhs_nullable = self.is_nullable(right, &rhs, rhs_type, node, ancestors);
        if !lhs_nullable && !rhs_nullable {
            trace!("both operands known non-null");
            return LoweredExpr::not_null(default);
        }

        let boolean_context = can_convert_to_boolean(self.arena, self.oracle, node.original, ancestors);
        debug!(
            operator = operator.text(),
            lhs_nullable, rhs_nullable, boolean_context, "lowering nullable binary"
        );
        let operands = Operands {
            left,
            right,
            lhs: lhs.expr,
            rhs: rhs.expr,
            lhs_nullable,
            rhs_nullable,
        };

        match operator {
            BinaryOperator::AndAlso => self.and_also(boolean_context, operands),
            BinaryOperator::OrElse => self.or_else(boolean_context, operands),
            BinaryOperator::And | BinaryOperator::Or => {
                if !boolean_context {
                    // C# lifted `&` and `|` on bool? already match VB.
                    return LoweredExpr::new(default);
                }
                if !is_pure(self.arena, self.oracle, right) {
                    return LoweredExpr::not_null(default.equals_true());
                }
                if operator == BinaryOperator::And {
                    self.and_also(true, operands)
                } else {
                    self.or_else(true, operands)
                }
            }
            _ => self.relational(boolean_context, operator, default, operands),
        }
    }

    /// `Type` is nullable, no earlier rewrite proved it non-null, and no
    /// enclosing check proves it either.
    fn is_nullable(
        &self,
        operand: NodeIndex,
        lowered: &LoweredExpr,
        info: TypeInfo,
        parent: &PathEntry,
        ancestors: &[PathEntry],
    ) -> bool {
        if !info.ty.is_some_and(|ty| self.oracle.types().is_nullable(ty)) || lowered.proven_not_null {
            return false;
        }
        if !self.options.simplify_checked_comparisons {
            return true;
        }
        nullability_within_boolean_expression(self.arena, operand, parent, ancestors)
            != Some(KnownNullability::NotNull)
    }

    fn reusable(&self, node: NodeIndex) -> bool {
        is_safely_reusable(self.arena, self.oracle, node)
    }

    fn and_also(&self, boolean_context: bool, o: Operands) -> LoweredExpr {
        let Operands {
            left,
            right,
            lhs,
            rhs,
            lhs_nullable,
            rhs_nullable,
        } = o;

        if boolean_context {
            if !lhs_nullable {
                return LoweredExpr::not_null(lhs.and(rhs.equals_true()));
            }
            if is_pure(self.arena, self.oracle, right) {
                let rhs = if rhs_nullable { rhs.equals_true() } else { rhs };
                return LoweredExpr::not_null(lhs.equals_true().and(rhs));
            }
            if !rhs_nullable {
                // (!l.HasValue || l.Value) && r && l.HasValue
                let (head, name) = if self.reusable(left) {
                    (lhs.clone().has_no_value(), lhs)
                } else {
                    let (pattern, name) = self.pattern_var(lhs);
                    (pattern.and(name.clone().has_no_value()), name)
                };
                let expr = head
                    .or(name.clone().get_value())
                    .and(rhs)
                    .and(name.has_value());
                return LoweredExpr::not_null(expr);
            }
            return LoweredExpr::not_null(self.full_and(left, right, lhs, rhs).equals_true());
        }

        if !lhs_nullable {
            return LoweredExpr::new(CsExpr::conditional(lhs, rhs, self.nullable_false()));
        }
        if !rhs_nullable {
            let (test, name) = self.capture_for_false_test(left, lhs);
            let expr = CsExpr::conditional(
                test,
                self.nullable_false(),
                CsExpr::conditional(rhs, name, self.nullable_false()),
            );
            return LoweredExpr::new(expr);
        }
        LoweredExpr::new(self.full_and(left, right, lhs, rhs))
    }

    /// `l == false ? false : <r has no value> ? null : <r value> ? l : false`
    fn full_and(&self, left: NodeIndex, right: NodeIndex, lhs: CsExpr, rhs: CsExpr) -> CsExpr {
        let (rhs_missing, rhs_value) = if self.reusable(right) {
            (rhs.clone().has_no_value(), rhs.get_value())
        } else {
            // the right capture is named before the left one
            self.negated_pattern_object(rhs)
        };
        let (test, name) = self.capture_for_false_test(left, lhs);
        CsExpr::conditional(
            test,
            self.nullable_false(),
            CsExpr::conditional(
                rhs_missing,
                self.nullable_null(),
                CsExpr::conditional(rhs_value, name, self.nullable_false()),
            ),
        )
    }

    /// `l == false` for reusable `l`, else `l is var n && n == false`, plus
    /// the expression to use for `l` afterwards.
    fn capture_for_false_test(&self, left: NodeIndex, lhs: CsExpr) -> (CsExpr, CsExpr) {
        if self.reusable(left) {
            (lhs.clone().equals_false(), lhs)
        } else {
            let (pattern, name) = self.pattern_var(lhs);
            (pattern.and(name.clone().equals_false()), name)
        }
    }

    fn or_else(&self, boolean_context: bool, o: Operands) -> LoweredExpr {
        let Operands {
            lhs,
            rhs,
            lhs_nullable,
            rhs_nullable,
            ..
        } = o;

        if boolean_context {
            if !lhs_nullable {
                return LoweredExpr::not_null(lhs.or(rhs.equals_true()));
            }
            let rhs = if rhs_nullable { rhs.equals_true() } else { rhs };
            return LoweredExpr::not_null(lhs.equals_true().or(rhs));
        }

        if !lhs_nullable {
            return LoweredExpr::new(CsExpr::conditional(lhs, self.nullable_true(), rhs));
        }

        let (lhs_pattern, lhs_name) = self.pattern_var(lhs);
        let when_false = if !rhs_nullable {
            CsExpr::conditional(rhs, self.nullable_true(), lhs_name.clone())
        } else {
            let (rhs_pattern, rhs_name) = self.negated_pattern_object(rhs);
            CsExpr::conditional(
                rhs_pattern,
                self.nullable_null(),
                CsExpr::conditional(rhs_name, self.nullable_true(), lhs_name.clone()),
            )
        };
        LoweredExpr::new(CsExpr::conditional(
            lhs_pattern.and(lhs_name.equals_true()),
            self.nullable_true(),
            when_false,
        ))
    }

    fn relational(
        &self,
        boolean_context: bool,
        operator: BinaryOperator,
        default: CsExpr,
        o: Operands,
    ) -> LoweredExpr {
        let Operands {
            left,
            right,
            lhs,
            rhs,
            lhs_nullable,
            rhs_nullable,
        } = o;

        if boolean_context {
            // With one side non-null, `==` agrees in both languages; ordering
            // comparisons with a null operand are false in both.
            let equality_safe =
                operator == BinaryOperator::Equals && (!lhs_nullable || !rhs_nullable);
            if equality_safe || operator.is_ordering() {
                return LoweredExpr::not_null(default);
            }
        }

        let CsExpr::Binary {
            operator: cs_operator,
            ..
        } = default
        else {
            debug_assert!(false, "relational default must be a binary expression");
            return LoweredExpr::new(default);
        };

        let mut lhs_name = lhs;
        let mut rhs_name = rhs;
        let lhs_reusable = self.reusable(left);
        let mut rhs_reusable = self.reusable(right);
        // (execution optional, condition)
        let mut conditions: SmallVec<[(bool, CsExpr); 3]> = SmallVec::new();

        if !lhs_reusable && !rhs_reusable {
            // Both sides run once, the right operand before the left.
            let (pattern, name) = self.pattern_var(rhs_name);
            conditions.push((false, pattern));
            rhs_name = name;
            rhs_reusable = true;
        }
        if lhs_nullable || !lhs_reusable {
            let (condition, name) = self.has_value_guard(lhs_name, lhs_reusable);
            conditions.push((lhs_reusable, condition));
            lhs_name = name;
        }
        if rhs_nullable || !rhs_reusable {
            let (condition, name) = self.has_value_guard(rhs_name, rhs_reusable);
            conditions.push((rhs_reusable, condition));
            rhs_name = name;
        }

        // Mandatory captures first; the sort is stable.
        conditions.sort_by_key(|(optional, _)| *optional);
        if boolean_context && operator == BinaryOperator::Equals && lhs_nullable && rhs_nullable {
            // `x == y` is already false when only one side is null
            conditions.pop();
        }

        let comparison = CsExpr::bin(lhs_name, cs_operator, rhs_name);
        let mut iter = conditions.into_iter().map(|(_, condition)| condition);
        let Some(first) = iter.next() else {
            return LoweredExpr::new(comparison);
        };
        let guard = iter.fold(first, CsExpr::and);

        if boolean_context {
            LoweredExpr::not_null(guard.and(comparison))
        } else {
            LoweredExpr::new(CsExpr::conditional(guard, comparison, self.nullable_null()))
        }
    }

    /// `expr.HasValue` for reusable operands, `expr is { } argN` otherwise,
    /// plus the expression to compare afterwards.
    fn has_value_guard(&self, expr: CsExpr, reusable: bool) -> (CsExpr, CsExpr) {
        if reusable {
            (expr.clone().has_value(), expr)
        } else {
            self.pattern_object(expr)
        }
    }

    /// `expr is { } argN ? (castType)conversion(argN) : null`
    ///
    /// Calls a conversion only when the nullable operand has a value.
    pub fn invoke_conversion_when_not_null(
        &self,
        expr: CsExpr,
        conversion: CsExpr,
        cast_type: &str,
    ) -> CsExpr {
        let (pattern, name) = self.pattern_object(expr);
        let invocation = CsExpr::cast(cast_type, CsExpr::call(conversion, vec![name]));
        CsExpr::conditional(pattern, invocation, CsExpr::NullLiteral)
    }

    // =========================================================================
    // Captures and constants
    // =========================================================================

    /// `expr is var argN`
    fn pattern_var(&self, expr: CsExpr) -> (CsExpr, CsExpr) {
        let name = self.temps.next_name();
        (expr.is_pattern(CsPattern::Var(name.clone())), CsExpr::id(name))
    }

    /// `expr is { } argN`
    fn pattern_object(&self, expr: CsExpr) -> (CsExpr, CsExpr) {
        let name = self.temps.next_name();
        (
            expr.is_pattern(CsPattern::NotNullObject(Some(name.clone()))),
            CsExpr::id(name),
        )
    }

    /// `expr is not { } argN`
    fn negated_pattern_object(&self, expr: CsExpr) -> (CsExpr, CsExpr) {
        let name = self.temps.next_name();
        let pattern = CsPattern::Not(Box::new(CsPattern::NotNullObject(Some(name.clone()))));
        (expr.is_pattern(pattern), CsExpr::id(name))
    }

    fn nullable_constant(&self, value: CsExpr) -> CsExpr {
        if self.options.explicit_nullable_casts {
            CsExpr::cast("bool?", value)
        } else {
            value
        }
    }

    fn nullable_null(&self) -> CsExpr {
        self.nullable_constant(CsExpr::NullLiteral)
    }

    fn nullable_true(&self) -> CsExpr {
        self.nullable_constant(CsExpr::BooleanLiteral(true))
    }

    fn nullable_false(&self) -> CsExpr {
        self.nullable_constant(CsExpr::BooleanLiteral(false))
    }
}

#[cfg(test)]
#[path = "../tests/nullable.rs"]
mod tests;
