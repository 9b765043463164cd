use crate::ast::{
    common::{Ident, Span},
    expressions::{Expression, Ownership, ValueExpr},
};

use super::{FnIrBuilder, LoweringContext, LoweringError};

/// An operand that passed the `ow`/`mv` discipline.
///
/// `ow` only ever yields a literal and `mv` only ever yields a variable.
#[derive(Debug, Clone, Copy)]
pub(crate) enum OwnedOperand<'a> {
    Literal { value: u128, span: Span },
    Var(&'a Ident),
}

/// Checks that `expr` is tagged with `ow` or `mv` and that the tag fits the operand.
pub(crate) fn lower_owned_operand<'a>(
    builder: &FnIrBuilder,
    expr: &'a Expression,
    context: LoweringContext,
) -> Result<OwnedOperand<'a>, LoweringError> {
    let Expression::Owned(owned) = expr else {
        return Err(LoweringError::MissingOwnership {
            function: builder.fn_name(),
            context,
            span: expr.get_span(),
        });
    };

    match owned.op {
        Ownership::Ow => match owned.value.as_ref() {
            Expression::Value(ValueExpr::ConstInt(value, span), _) => Ok(OwnedOperand::Literal {
                value: *value,
                span: *span,
            }),
            Expression::Value(ValueExpr::Var(ident), _) => Err(LoweringError::OwnOfVariable {
                function: builder.fn_name(),
                context,
                name: ident.name.clone(),
                span: owned.span,
            }),
            other => Err(LoweringError::OwnOfNonLiteral {
                function: builder.fn_name(),
                context,
                found: other.describe(),
                span: owned.span,
            }),
        },
        Ownership::Mv => match owned.value.as_ref() {
            Expression::Value(ValueExpr::Var(ident), _) => Ok(OwnedOperand::Var(ident)),
            Expression::Value(ValueExpr::ConstInt(value, _), _) => {
                Err(LoweringError::MoveOfLiteral {
                    function: builder.fn_name(),
                    context,
                    value: *value,
                    span: owned.span,
                })
            }
            other => Err(LoweringError::MoveOfNonVariable {
                function: builder.fn_name(),
                context,
                found: other.describe(),
                span: owned.span,
            }),
        },
    }
}
