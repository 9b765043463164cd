use tracing::{debug, instrument};

use crate::{
    ast::functions::FunctionDef,
    ir::{FnBody, InternalError},
};

use super::{FnIrBuilder, LoweringError, statements::lower_block};

/// Lowers a single function into a flat instruction trace.
///
/// The body is lowered like any nested block, so the trace is wrapped in a
/// `BlockStart`/`BlockEnd` pair and locals of the outermost scope get their drops too.
#[instrument(level = "debug", skip_all, fields(name = %func.name.name))]
pub fn lower_function(func: &FunctionDef) -> Result<FnBody, LoweringError> {
    debug!("lowering function {:?}", func.name.name);

    if let Some(param) = func.params.first() {
        return Err(LoweringError::UnsupportedParameters {
            function: func.name.name.clone(),
            span: param.name.span,
        });
    }

    let mut builder = FnIrBuilder::new(func);
    lower_block(&mut builder, &func.body)?;

    if builder.scopes.depth() != 0 {
        return Err(InternalError::UnbalancedScopes {
            function: builder.fn_name(),
            depth: builder.scopes.depth(),
        }
        .into());
    }

    debug!(
        "lowered {} instructions over {} locals",
        builder.body.instructions.len(),
        builder.body.locals.len()
    );
    Ok(builder.body)
}
