use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_record_layout_pads_to_alignment() {
    let fields = [IrType::I1, IrType::I64, IrType::I1];
    assert_eq!(record_offsets(&fields), vec![0, 8, 16]);
    assert_eq!(size_align(&IrType::Record(fields.to_vec())), (24, 8));
}

#[test]
fn test_array_field_spans_its_elements() {
    let fields = [
        IrType::Array {
            len: 3,
            elem: Box::new(IrType::I64),
        },
        IrType::Ptr,
    ];
    assert_eq!(record_offsets(&fields), vec![0, 24]);
}
