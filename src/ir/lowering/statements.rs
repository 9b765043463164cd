use tracing::{debug, instrument};

use crate::{
    ast::{
        common::Span,
        expressions::Expression,
        statements::{BlockStmt, LetStmt, ReturnStmt, Statement},
    },
    ir::{ConstData, InstructionKind, InternalError, LocalRef, Operand},
};

use super::{
    FnIrBuilder, LoweringContext, LoweringError,
    expressions::{OwnedOperand, lower_owned_operand},
};

pub(crate) fn lower_statement(
    builder: &mut FnIrBuilder,
    info: &Statement,
) -> Result<(), LoweringError> {
    match info {
        Statement::Let(info) => lower_let(builder, info),
        Statement::Return(info) => lower_return(builder, info),
        Statement::Block(info) => lower_block(builder, info),
        Statement::Expr(expr, span) => Err(LoweringError::UnsupportedStatement {
            function: builder.fn_name(),
            found: if matches!(expr, Expression::FnCall(_)) {
                "function call statement"
            } else {
                "expression statement"
            },
            span: *span,
        }),
    }
}

#[instrument(level = "debug", skip_all, fields(name = %info.name.name))]
fn lower_let(builder: &mut FnIrBuilder, info: &LetStmt) -> Result<(), LoweringError> {
    let operand = lower_owned_operand(
        builder,
        &info.value,
        LoweringContext::Let(info.name.name.clone()),
    )?;

    let kind = match operand {
        OwnedOperand::Literal { value, .. } => {
            builder.declare_local(&info.name, &info.r#type)?;
            InstructionKind::OwnLiteral {
                target: info.name.name.clone(),
                value: ConstData {
                    value,
                    ty: info.r#type.name.clone(),
                },
            }
        }
        OwnedOperand::Var(source) => {
            builder.retract(&source.name);
            builder.declare_local(&info.name, &info.r#type)?;
            InstructionKind::MoveVar {
                target: info.name.name.clone(),
                source: source.name.clone(),
                ty: info.r#type.name.clone(),
            }
        }
    };

    debug!("lowered let binding");
    builder.push(kind, Some(info.span));
    Ok(())
}

#[instrument(level = "debug", skip_all)]
fn lower_return(builder: &mut FnIrBuilder, info: &ReturnStmt) -> Result<(), LoweringError> {
    let operand = lower_owned_operand(builder, &info.value, LoweringContext::Return)?;
    let ty = builder.ret_ty().to_string();

    let operand = match operand {
        OwnedOperand::Literal { value, .. } => Operand::Const(ConstData { value, ty }),
        OwnedOperand::Var(ident) => {
            // The value leaves the function, it must not be dropped at scope exit.
            builder.retract(&ident.name);
            Operand::Local(LocalRef {
                name: ident.name.clone(),
                ty,
            })
        }
    };

    debug!("lowered return of {}", operand);
    builder.push(InstructionKind::Return(operand), Some(info.span));
    Ok(())
}

/// Lowers a block, dropping every local it still owns on exit.
#[instrument(level = "debug", skip_all, fields(depth = builder.scopes.depth()))]
pub(crate) fn lower_block(builder: &mut FnIrBuilder, info: &BlockStmt) -> Result<(), LoweringError> {
    let open = Span::new(info.span.from, info.span.from + 1);
    let close = Span::new(info.span.to.saturating_sub(1), info.span.to);

    builder.push(InstructionKind::BlockStart, Some(open));
    builder.scopes.push();

    for statement in &info.statements {
        lower_statement(builder, statement)?;
    }

    let scope = builder
        .scopes
        .pop()
        .ok_or_else(|| InternalError::ScopeUnderflow {
            function: builder.fn_name(),
        })?;

    let owned = scope.into_items();
    debug!("dropping {} locals at block exit", owned.len());
    for name in owned {
        builder.push(InstructionKind::Drop(name), Some(close));
    }

    builder.push(InstructionKind::BlockEnd, Some(close));
    Ok(())
}
