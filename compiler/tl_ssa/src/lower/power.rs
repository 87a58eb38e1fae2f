//! `base ^ exponent`.
//!
//! A constant exponent is expanded: `n <= 0` is `1`, small exponents use
//! a fixed multiplication sequence, larger ones a counted loop. A run-time
//! exponent gets the loop behind an `exponent > 0` guard.

use tl_ir::ExprId;
use tl_sema::fold_integer;

use crate::builder::{FunctionBuilder, Var};
use crate::ir::{BinOp, BlockId, CmpPred, IrType, ValueId};
use crate::CodegenError;

use super::FnLower;

/// Largest exponent expanded into straight-line multiplications.
const UNROLL_LIMIT: i64 = 9;

impl FnLower<'_, '_> {
    /// The exponent is only evaluated when it does not fold.
    pub(super) fn power(&mut self, base: ValueId, exponent: ExprId) -> Result<ValueId, CodegenError> {
        match fold_integer(self.cx.ast, exponent) {
            Some(n) => Ok(self.power_const(base, n)),
            None => {
                let exponent = self.expr(exponent)?;
                Ok(self.power_dynamic(base, exponent))
            }
        }
    }

    fn power_const(&mut self, base: ValueId, n: i64) -> ValueId {
        let mul = |b: &mut FunctionBuilder, l, r| b.binary(BinOp::Mul, l, r);
        match n {
            i64::MIN..=0 => self.b.const_int(IrType::I64, 1),
            1 => base,
            2 => mul(&mut self.b, base, base),
            3 => {
                let square = mul(&mut self.b, base, base);
                mul(&mut self.b, square, base)
            }
            4 => {
                let square = mul(&mut self.b, base, base);
                mul(&mut self.b, square, square)
            }
            5 => {
                let square = mul(&mut self.b, base, base);
                let fourth = mul(&mut self.b, square, square);
                mul(&mut self.b, fourth, base)
            }
            6..=UNROLL_LIMIT => {
                let mut acc = base;
                for _ in 1..n {
                    acc = mul(&mut self.b, acc, base);
                }
                acc
            }
            _ => {
                let count = self.b.const_int(IrType::I64, n);
                self.counted_loop(base, count)
            }
        }
    }

    fn power_dynamic(&mut self, base: ValueId, exponent: ValueId) -> ValueId {
        let result = self.b.fresh_temp();
        let zero = self.b.const_int(IrType::I64, 0);
        let positive = self.b.cmp(CmpPred::Sgt, exponent, zero);
        let looped = self.b.new_block("pow.loop");
        let trivial = self.b.new_block("pow.zero");
        let merge = self.b.new_block("pow.merge");
        self.b.terminate_branch(positive, looped, trivial);
        self.b.seal_block(looped);
        self.b.seal_block(trivial);

        self.b.position_at(trivial);
        let one = self.b.const_int(IrType::I64, 1);
        self.b.write_variable(trivial, result, one);
        self.b.terminate_jump(merge);

        self.b.position_at(looped);
        let value = self.counted_loop(base, exponent);
        let end = self.b.current_block();
        self.b.write_variable(end, result, value);
        self.b.terminate_jump(merge);

        self.b.seal_block(merge);
        self.b.position_at(merge);
        self.b.read_variable(merge, result, &IrType::I64)
    }

    /// `base ^ count` for `count >= 1`, as a loop. Leaves the builder in
    /// the loop's exit block.
    fn counted_loop(&mut self, base: ValueId, count: ValueId) -> ValueId {
        let (acc, remaining) = (self.b.fresh_temp(), self.b.fresh_temp());
        let start = self.b.current_block();
        self.b.write_variable(start, acc, base);
        self.b.write_variable(start, remaining, count);

        let header = self.b.new_block("pow.cond");
        let body = self.b.new_block("pow.body");
        let exit = self.b.new_block("pow.end");
        self.b.terminate_jump(header);

        self.b.position_at(header);
        let one = self.b.const_int(IrType::I64, 1);
        let left = self.b.read_variable(header, remaining, &IrType::I64);
        let more = self.b.cmp(CmpPred::Sgt, left, one);
        self.b.terminate_branch(more, body, exit);
        self.b.seal_block(body);
        self.b.seal_block(exit);

        self.b.position_at(body);
        self.step(body, acc, |b, value| b.binary(BinOp::Mul, value, base));
        self.step(body, remaining, |b, value| b.binary(BinOp::Sub, value, one));
        self.b.terminate_jump(header);
        self.b.seal_block(header);

        self.b.position_at(exit);
        self.b.read_variable(exit, acc, &IrType::I64)
    }

    /// `var := f(var)` inside `block`.
    fn step(
        &mut self,
        block: BlockId,
        var: Var,
        f: impl FnOnce(&mut FunctionBuilder, ValueId) -> ValueId,
    ) {
        let value = self.b.read_variable(block, var, &IrType::I64);
        let next = f(&mut self.b, value);
        self.b.write_variable(block, var, next);
    }
}
