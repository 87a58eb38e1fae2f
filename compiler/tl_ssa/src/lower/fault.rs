//! Division fault path.
//!
//! `DIV` and `MOD` test the divisor first. A zero divisor allocates an
//! `int` exception carrying [`PAYLOAD`] and invokes `__cxa_throw`; the
//! function's landing block catches it, prints a message and returns the
//! zero of the function's result type.
//!
//! ```text
//!   div.zero:  invoke __cxa_throw(...) to unreachable unwind lpad
//!   lpad:      landingpad catch @_ZTIi; selector == typeid(int) ?
//!   lpad.catch: begin_catch, puts, end_catch, ret 0
//!   lpad.resume: resume
//! ```
//!
//! The landing blocks are built once per function, on the first division
//! that needs them.

use crate::builder::FunctionBuilder;
use crate::ir::{BinOp, BlockId, CmpPred, IrType, ValueId};
use crate::CodegenError;

use super::FnLower;

pub(super) const PERSONALITY: &str = "__gxx_personality_v0";
const TYPE_INFO: &str = "_ZTIi";
const MESSAGE: &str = "Divide by zero!";
/// Value stored in the thrown `int`.
const PAYLOAD: i64 = 42;
const PAYLOAD_SIZE: i64 = 4;

/// Landing block and the dead target of every `invoke __cxa_throw`.
#[derive(Copy, Clone)]
pub(super) struct FaultPath {
    landing: BlockId,
    unreachable: BlockId,
}

impl FaultPath {
    /// Every raise site adds an edge into both blocks, so they stay open
    /// until the function is done.
    pub(super) fn seal(self, b: &mut FunctionBuilder) {
        b.seal_block(self.landing);
        b.seal_block(self.unreachable);
    }
}

impl FnLower<'_, '_> {
    /// `lhs op rhs` for `SDiv`/`SRem`, guarded against a zero divisor.
    ///
    /// The guard is skipped only when the divisor is a known nonzero
    /// constant.
    pub(super) fn checked_division(
        &mut self,
        op: BinOp,
        lhs: ValueId,
        rhs: ValueId,
    ) -> Result<ValueId, CodegenError> {
        if self.b.const_value(rhs).is_some_and(|c| c != 0) {
            return Ok(self.b.binary(op, lhs, rhs));
        }
        let zero = self.b.const_int(IrType::I64, 0);
        let is_zero = self.b.cmp(CmpPred::Eq, rhs, zero);
        let fault = self.b.new_block("div.zero");
        let ok = self.b.new_block("div.ok");
        self.b.terminate_branch(is_zero, fault, ok);
        self.b.seal_block(fault);
        self.b.seal_block(ok);

        self.b.position_at(fault);
        self.raise_division_fault()?;

        self.b.position_at(ok);
        Ok(self.b.binary(op, lhs, rhs))
    }

    /// Terminate the current block with the throw.
    fn raise_division_fault(&mut self) -> Result<(), CodegenError> {
        let path = self.fault_path()?;
        let size = self.b.const_int(IrType::I64, PAYLOAD_SIZE);
        let exception = self
            .b
            .call("__cxa_allocate_exception", vec![size], IrType::Ptr)
            .ok_or(CodegenError::Unexpected {
                what: "void exception allocation",
            })?;
        let payload = self.b.const_int(IrType::I32, PAYLOAD);
        // Runtime-owned payload; no alias tag.
        self.b.store(payload, exception, None);
        let type_info = self.b.symbol(TYPE_INFO);
        let null = self.b.null_ptr();
        self.b.terminate_invoke(
            "__cxa_throw",
            vec![exception, type_info, null],
            path.unreachable,
            path.landing,
        );
        Ok(())
    }

    /// The function's landing blocks, built on first use.
    fn fault_path(&mut self) -> Result<FaultPath, CodegenError> {
        if let Some(path) = self.fault {
            return Ok(path);
        }
        tracing::debug!(function = self.b.name(), "building division fault path");
        self.declare_runtime();
        self.b.set_personality(PERSONALITY);

        let resume_at = self.b.current_block();
        let line = self.b.line();
        self.b.set_line(None);

        let landing = self.b.new_block("lpad");
        let handler = self.b.new_block("lpad.catch");
        let resume = self.b.new_block("lpad.resume");
        let unreachable = self.b.new_block("unreachable");

        self.b.position_at(landing);
        let type_info = self.b.symbol(TYPE_INFO);
        let (token, selector) = self.b.landing_pad(type_info);
        let expected = self
            .b
            .call("llvm.eh.typeid.for", vec![type_info], IrType::I32)
            .ok_or(CodegenError::Unexpected {
                what: "void type id",
            })?;
        let matches = self.b.cmp(CmpPred::Eq, selector, expected);
        self.b.terminate_branch(matches, handler, resume);
        self.b.seal_block(handler);
        self.b.seal_block(resume);

        self.b.position_at(handler);
        self.b.call("__cxa_begin_catch", vec![token], IrType::Ptr);
        let message = self.cx.string_constant(MESSAGE);
        let message = self.b.symbol(&message);
        self.b.call("puts", vec![message], IrType::I32);
        self.b.call("__cxa_end_catch", Vec::new(), IrType::Void);
        let ret = self.b.ret_type().clone();
        let sentinel = self.b.zero(&ret);
        self.b.terminate_return(sentinel);

        self.b.position_at(resume);
        self.b.terminate_resume(token);

        self.b.position_at(unreachable);
        self.b.terminate_unreachable();

        self.b.position_at(resume_at);
        self.b.set_line(line);
        let path = FaultPath {
            landing,
            unreachable,
        };
        self.fault = Some(path);
        Ok(path)
    }

    fn declare_runtime(&mut self) {
        let cx = &mut *self.cx;
        cx.declare_function(
            "__cxa_allocate_exception",
            IrType::Ptr,
            vec![IrType::I64],
            false,
        );
        cx.declare_function(
            "__cxa_throw",
            IrType::Void,
            vec![IrType::Ptr, IrType::Ptr, IrType::Ptr],
            false,
        );
        cx.declare_function(PERSONALITY, IrType::I32, Vec::new(), true);
        cx.declare_function("llvm.eh.typeid.for", IrType::I32, vec![IrType::Ptr], false);
        cx.declare_function("__cxa_begin_catch", IrType::Ptr, vec![IrType::Ptr], false);
        cx.declare_function("__cxa_end_catch", IrType::Void, Vec::new(), false);
        cx.declare_function("puts", IrType::I32, vec![IrType::Ptr], false);
        cx.declare_data(TYPE_INFO);
    }
}
