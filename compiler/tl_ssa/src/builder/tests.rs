use pretty_assertions::assert_eq;
use tl_ir::DeclId;

use super::*;
use crate::ir::{InstKind, Terminator, ValueKind};
use crate::verify::verify_function;

const X: Var = Var::Decl(DeclId::new(0));

fn i64_fn() -> FunctionBuilder {
    FunctionBuilder::new("f", &[IrType::I64], IrType::I64)
}

#[test]
fn test_constants_are_interned() {
    let mut b = i64_fn();
    let a = b.const_int(IrType::I64, 7);
    let c = b.const_int(IrType::I64, 7);
    let bit = b.const_int(IrType::I1, 7);
    assert_eq!(a, c);
    assert_ne!(a, bit);
    assert_eq!(b.const_value(a), Some(7));
}

#[test]
fn test_straight_line_has_no_phis() {
    let mut b = i64_fn();
    let p = b.param(0);
    b.write_variable(b.entry_block(), X, p);

    let next = b.new_block("next");
    b.terminate_jump(next);
    b.seal_block(next);
    b.position_at(next);
    let x = b.read_variable(next, X, &IrType::I64);
    assert_eq!(x, p);
    b.terminate_return(Some(x));

    let func = b.finish();
    assert_eq!(func.phi_count(), 0);
    assert_eq!(verify_function(&func), Ok(()));
}

#[test]
fn test_read_before_write_is_undef() {
    let mut b = i64_fn();
    let entry = b.entry_block();
    let x = b.read_variable(entry, X, &IrType::I64);
    b.terminate_return(Some(x));
    let func = b.finish();
    assert_eq!(func.value(x).kind, ValueKind::Undef);
}

/// `entry -> (left | right) -> merge`, with `x` written on each side.
fn diamond(left_value: i64, right_value: i64) -> (Function, ValueId) {
    let mut b = i64_fn();
    let cond = b.const_bool(true);
    let left = b.new_block("left");
    let right = b.new_block("right");
    let merge = b.new_block("merge");
    b.terminate_branch(cond, left, right);
    b.seal_block(left);
    b.seal_block(right);

    for (block, value) in [(left, left_value), (right, right_value)] {
        b.position_at(block);
        let v = b.const_int(IrType::I64, value);
        b.write_variable(block, X, v);
        b.terminate_jump(merge);
    }
    b.seal_block(merge);

    b.position_at(merge);
    let x = b.read_variable(merge, X, &IrType::I64);
    let one = b.const_int(IrType::I64, 1);
    let sum = b.binary(BinOp::Add, x, one);
    b.terminate_return(Some(sum));
    (b.finish(), x)
}

#[test]
fn test_merge_of_distinct_values_keeps_phi() {
    let (func, x) = diamond(1, 2);
    assert_eq!(func.phi_count(), 1);
    let phi = &func.blocks[3].phis[0];
    assert_eq!(phi.dst, x);
    let incoming: Vec<Option<i64>> = phi
        .incoming
        .iter()
        .map(|&(v, _)| func.const_value(v))
        .collect();
    assert_eq!(incoming, vec![Some(1), Some(2)]);
    assert_eq!(verify_function(&func), Ok(()));
}

#[test]
fn test_merge_of_same_value_prunes_phi() {
    let (func, _) = diamond(5, 5);
    assert_eq!(func.phi_count(), 0);
    // The add reads the constant directly.
    let add = func.blocks[3].body.last().unwrap();
    let InstKind::Binary { lhs, .. } = add.kind else {
        panic!("expected add");
    };
    assert_eq!(func.const_value(lhs), Some(5));
    assert_eq!(verify_function(&func), Ok(()));
}

/// `x := p; WHILE ... DO [x := x + 1] END; RETURN x`
fn counting_loop(write_in_body: bool) -> Function {
    let mut b = i64_fn();
    let entry = b.entry_block();
    let p = b.param(0);
    b.write_variable(entry, X, p);

    let header = b.new_block("while.cond");
    let body = b.new_block("while.body");
    let exit = b.new_block("while.end");
    b.terminate_jump(header);

    b.position_at(header);
    let x = b.read_variable(header, X, &IrType::I64);
    let limit = b.const_int(IrType::I64, 10);
    let cond = b.cmp(CmpPred::Slt, x, limit);
    b.terminate_branch(cond, body, exit);
    b.seal_block(body);
    b.seal_block(exit);

    b.position_at(body);
    if write_in_body {
        let x = b.read_variable(body, X, &IrType::I64);
        let one = b.const_int(IrType::I64, 1);
        let next = b.binary(BinOp::Add, x, one);
        b.write_variable(body, X, next);
    }
    b.terminate_jump(header);
    assert!(!b.is_sealed(header));
    b.seal_block(header);

    b.position_at(exit);
    let x = b.read_variable(exit, X, &IrType::I64);
    b.terminate_return(Some(x));
    b.finish()
}

#[test]
fn test_loop_header_phi_merges_init_and_increment() {
    let func = counting_loop(true);
    assert_eq!(func.phi_count(), 1);
    let phi = &func.blocks[1].phis[0];
    assert_eq!(phi.incoming.len(), 2);
    assert_eq!(phi.incoming[0], (func.params[0].value, BlockId::new(0)));
    assert_eq!(phi.incoming[1].1, BlockId::new(2));
    assert_eq!(verify_function(&func), Ok(()));
}

#[test]
fn test_loop_without_write_prunes_incomplete_phi() {
    let func = counting_loop(false);
    assert_eq!(func.phi_count(), 0);
    // The header compare and the return both read the parameter.
    let Terminator::Return(Some(ret)) = func.blocks[3].terminator else {
        panic!("expected return");
    };
    assert_eq!(ret, func.params[0].value);
    let InstKind::Cmp { lhs, .. } = func.blocks[1].body[0].kind else {
        panic!("expected compare");
    };
    assert_eq!(lhs, func.params[0].value);
    assert_eq!(verify_function(&func), Ok(()));
}

#[test]
fn test_nested_loop_cascade_removes_both_phis() {
    let mut b = i64_fn();
    let entry = b.entry_block();
    let seven = b.const_int(IrType::I64, 7);
    b.write_variable(entry, X, seven);
    let flag = b.const_bool(false);

    let outer = b.new_block("outer");
    let inner = b.new_block("inner");
    let inner_body = b.new_block("inner.body");
    let outer_latch = b.new_block("outer.latch");
    let exit = b.new_block("exit");

    b.terminate_jump(outer);
    b.position_at(outer);
    b.terminate_branch(flag, inner, exit);
    b.seal_block(exit);

    b.position_at(inner);
    b.terminate_branch(flag, inner_body, outer_latch);
    b.seal_block(inner_body);
    b.seal_block(outer_latch);

    b.position_at(inner_body);
    let x = b.read_variable(inner_body, X, &IrType::I64);
    let doubled = b.binary(BinOp::Add, x, x);
    b.terminate_jump(inner);
    b.seal_block(inner);

    b.position_at(outer_latch);
    b.terminate_jump(outer);
    b.seal_block(outer);

    b.position_at(exit);
    b.terminate_return(Some(seven));

    let func = b.finish();
    assert_eq!(func.phi_count(), 0);
    let add = func
        .instructions()
        .find(|i| i.dst == Some(doubled))
        .unwrap();
    assert_eq!(add.operands().to_vec(), vec![seven, seven]);
    assert_eq!(verify_function(&func), Ok(()));
}

#[test]
fn test_alloca_lands_in_entry_block() {
    let mut b = i64_fn();
    let other = b.new_block("other");
    b.terminate_jump(other);
    b.seal_block(other);
    b.position_at(other);
    let slot = b.alloca(IrType::Array {
        len: 4,
        elem: Box::new(IrType::I64),
    });
    let zero = b.const_int(IrType::I64, 0);
    b.terminate_return(Some(zero));

    let func = b.finish();
    assert_eq!(func.blocks[0].body[0].dst, Some(slot));
    assert!(func.blocks[1].body.is_empty());
}

#[test]
fn test_finish_patches_unterminated_block() {
    let mut b = FunctionBuilder::new("g", &[], IrType::Void);
    let dangling = b.new_block("dangling");
    b.terminate_jump(dangling);
    b.seal_block(dangling);
    let func = b.finish();
    assert_eq!(func.blocks[1].terminator, Terminator::Unreachable);
}

#[test]
fn test_invoke_records_both_edges() {
    let mut b = FunctionBuilder::new("g", &[], IrType::Void);
    let normal = b.new_block("normal");
    let unwind = b.new_block("unwind");
    b.terminate_invoke("callee", Vec::new(), normal, unwind);
    assert_eq!(b.predecessors(normal), &[BlockId::new(0)]);
    assert_eq!(b.predecessors(unwind), &[BlockId::new(0)]);
}
