use pretty_assertions::assert_eq;
use tl_ir::DeclId;

use super::*;
use crate::builder::{FunctionBuilder, Var};
use crate::ir::{BinOp, IrType, Terminator};

const X: Var = Var::Decl(DeclId::new(0));

/// Diamond whose merge block reads `x`, written differently on each side.
fn diamond() -> Function {
    let mut b = FunctionBuilder::new("f", &[IrType::I1], IrType::I64);
    let cond = b.param(0);
    let left = b.new_block("left");
    let right = b.new_block("right");
    let merge = b.new_block("merge");
    b.terminate_branch(cond, left, right);
    b.seal_block(left);
    b.seal_block(right);
    for (block, value) in [(left, 1), (right, 2)] {
        b.position_at(block);
        let v = b.const_int(IrType::I64, value);
        b.write_variable(block, X, v);
        b.terminate_jump(merge);
    }
    b.seal_block(merge);
    b.position_at(merge);
    let x = b.read_variable(merge, X, &IrType::I64);
    b.terminate_return(Some(x));
    b.finish()
}

#[test]
fn test_well_formed_diamond() {
    assert_eq!(verify_function(&diamond()), Ok(()));
}

#[test]
fn test_missing_phi_operand() {
    let mut func = diamond();
    func.blocks[3].phis[0].incoming.pop();
    assert!(matches!(
        verify_function(&func),
        Err(VerifyError::PhiOperands { block: 3, .. })
    ));
}

#[test]
fn test_missing_successor() {
    let mut func = diamond();
    func.blocks[1].terminator = Terminator::Jump(BlockId::new(42));
    assert!(matches!(
        verify_function(&func),
        Err(VerifyError::MissingSuccessor { target: 42, .. })
    ));
}

#[test]
fn test_use_of_removed_phi() {
    let mut func = diamond();
    let dst = func.blocks[3].phis[0].dst;
    func.blocks[3].phis.clear();
    func.blocks[3].terminator = Terminator::Return(Some(dst));
    assert_eq!(
        verify_function(&func),
        Err(VerifyError::RemovedPhi {
            function: "f".to_owned(),
            block: 3,
            value: dst.raw(),
        })
    );
}

#[test]
fn test_use_outside_defining_branch() {
    let mut b = FunctionBuilder::new("g", &[IrType::I1, IrType::I64], IrType::I64);
    let (cond, p) = (b.param(0), b.param(1));
    let left = b.new_block("left");
    let right = b.new_block("right");
    let merge = b.new_block("merge");
    b.terminate_branch(cond, left, right);
    b.seal_block(left);
    b.seal_block(right);

    b.position_at(left);
    let doubled = b.binary(BinOp::Add, p, p);
    b.terminate_jump(merge);
    b.position_at(right);
    b.terminate_jump(merge);
    b.seal_block(merge);

    b.position_at(merge);
    b.terminate_return(Some(doubled));
    let func = b.finish();
    assert!(matches!(
        verify_function(&func),
        Err(VerifyError::NotDominated { block: 3, .. })
    ));
}

#[test]
fn test_unreachable_blocks_are_not_checked_for_dominance() {
    let mut b = FunctionBuilder::new("h", &[IrType::I64], IrType::I64);
    let p = b.param(0);
    let dead = b.new_block("dead");
    b.seal_block(dead);
    let sum = b.binary(BinOp::Add, p, p);
    b.terminate_return(Some(sum));
    b.position_at(dead);
    b.terminate_return(Some(sum));
    let func = b.finish();
    assert_eq!(verify_function(&func), Ok(()));
}

#[test]
fn test_alias_tag_must_name_a_node() {
    let mut b = FunctionBuilder::new("t", &[IrType::Ptr], IrType::I64);
    let addr = b.param(0);
    let value = b.load(IrType::I64, addr, Some(TbaaTag::scalar(TbaaNodeId::new(1))));
    b.terminate_return(Some(value));

    let mut module = Module {
        name: "M".to_owned(),
        functions: vec![b.finish()],
        tbaa: vec![TbaaNode::Root {
            name: "root".to_owned(),
        }],
        ..Module::default()
    };
    assert_eq!(
        verify(&module),
        Err(VerifyError::MissingTbaaNode {
            owner: "t".to_owned(),
            node: 1,
        })
    );

    module.tbaa.push(TbaaNode::Scalar {
        name: "INTEGER".to_owned(),
        parent: TbaaNodeId::new(0),
    });
    assert_eq!(verify(&module), Ok(()));
}
