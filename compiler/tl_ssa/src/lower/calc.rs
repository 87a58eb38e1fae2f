//! Expression units become `main`:
//!
//! ```text
//! define i32 @main() {
//!   %a = call i64 @calc_read(ptr @.str.0)    ; one per input, in order
//!   ...
//!   call void @calc_write(i64 %result)
//!   ret i32 0
//! }
//! ```

use tl_ir::{DeclId, ExprId};

use crate::builder::FunctionBuilder;
use crate::ir::{Function, IrType};
use crate::CodegenError;

use super::{FnLower, UnitCtx};

const READ: &str = "calc_read";
const WRITE: &str = "calc_write";

pub(super) fn lower_calc(
    cx: &mut UnitCtx<'_>,
    inputs: &[DeclId],
    result: ExprId,
) -> Result<Function, CodegenError> {
    cx.declare_function(READ, IrType::I64, vec![IrType::Ptr], false);
    cx.declare_function(WRITE, IrType::Void, vec![IrType::I64], false);

    let root = cx.unit.root;
    let mut f = FnLower::new(cx, FunctionBuilder::new("main", &[], IrType::I32), root);
    f.set_debug_scope(root);

    for &input in inputs {
        // The runtime prompts with the variable's name.
        let prompt = f.cx.string_constant(f.cx.name(input));
        let prompt = f.b.symbol(&prompt);
        let value = f
            .b
            .call(READ, vec![prompt], IrType::I64)
            .ok_or(CodegenError::Unexpected {
                what: "void input read",
            })?;
        f.bind_scalar(input, IrType::I64, value)?;
    }

    let line = f.cx.line_of(f.cx.ast.expr(result).span);
    f.b.set_line(line);
    let value = f.expr(result)?;
    f.b.call(WRITE, vec![value], IrType::Void);
    let status = f.b.const_int(IrType::I32, 0);
    f.b.terminate_return(Some(status));
    f.finish()
}
