//! Reference chains, names, 3-D references and implicit intersection

use duke_eval::functions::operators::{evaluate_binary, BinaryOperator};
use duke_eval::operand::{scalar, to_number};
use duke_eval::{builtin_functions, CellRef, ErrorCode, EvalError, Value, Workbook};
use pretty_assertions::assert_eq;

fn n(v: f64) -> Value {
    Value::Number(v)
}

/// A1 -> B1 -> C1 = 42
#[test]
fn test_reference_chain() {
    let mut wb = Workbook::with_sheets(&["Sheet1"]).unwrap();
    let b1 = wb.cell_ref(0, "B1").unwrap();
    let c1 = wb.cell_ref(0, "C1").unwrap();
    wb.set_value(0, "A1", b1).unwrap();
    wb.set_value(0, "B1", c1).unwrap();
    wb.set_value(0, "C1", 42.0).unwrap();

    let ctx = wb.context(5, 5);
    let a1 = wb.cell_ref(0, "A1").unwrap();
    assert_eq!(scalar(&a1, &ctx), Ok(n(42.0)));
    assert_eq!(to_number(&a1, &ctx), Ok(42.0));
}

#[test]
fn test_circular_chain_is_ref_error() {
    let mut wb = Workbook::with_sheets(&["Sheet1"]).unwrap();
    let a1 = wb.cell_ref(0, "A1").unwrap();
    let a2 = wb.cell_ref(0, "A2").unwrap();
    wb.set_value(0, "A1", a2).unwrap();
    wb.set_value(0, "A2", a1.clone()).unwrap();

    let ctx = wb.context(5, 5);
    assert_eq!(scalar(&a1, &ctx), Err(EvalError::Code(ErrorCode::Ref)));
    assert_eq!(
        builtin_functions().invoke("ABS", &[a1], &ctx),
        Ok(Value::Error(ErrorCode::Ref))
    );
}

#[test]
fn test_unknown_sheet_is_ref_error() {
    let wb = Workbook::with_sheets(&["Sheet1"]).unwrap();
    let ctx = wb.context(0, 0);
    let dangling = Value::Ref(CellRef::new(7, 0, 0));
    assert_eq!(scalar(&dangling, &ctx), Err(EvalError::Code(ErrorCode::Ref)));
}

#[test]
fn test_names() {
    let mut wb = Workbook::with_sheets(&["Sheet1"]).unwrap();
    wb.set_name_ref(0, "A1", "Rate").unwrap();
    wb.set_value(0, "B1", -3.0).unwrap();

    let a1 = wb.cell_ref(0, "A1").unwrap();
    {
        let ctx = wb.context(5, 5);
        assert_eq!(scalar(&a1, &ctx), Err(EvalError::Name("Rate".into())));
        assert_eq!(
            builtin_functions().invoke("ABS", &[a1.clone()], &ctx),
            Ok(Value::Error(ErrorCode::Name))
        );
    }

    let b1 = wb.cell_ref(0, "B1").unwrap();
    wb.define_name("RATE", b1).unwrap();
    let ctx = wb.context(5, 5);
    assert_eq!(
        builtin_functions().invoke("ABS", &[a1], &ctx),
        Ok(n(3.0))
    );
}

#[test]
fn test_three_d_references() {
    let mut wb = Workbook::with_sheets(&["Jan", "Feb", "Mar"]).unwrap();
    for (sheet, v) in [10.0, 20.0, 30.0].into_iter().enumerate() {
        wb.set_value(sheet, "A1", v).unwrap();
        wb.set_value(sheet, "A2", v / 10.0).unwrap();
    }
    let ctx = wb.context(9, 9);
    let registry = builtin_functions();

    let cell = wb.cell_ref_3d(0, 2, "A1").unwrap();
    assert_eq!(scalar(&cell, &ctx), Err(EvalError::Code(ErrorCode::Value)));
    assert_eq!(registry.invoke("SUM", &[cell], &ctx), Ok(n(60.0)));

    let block = wb.area_3d(0, 2, "A1:A2").unwrap();
    assert_eq!(registry.invoke("SUM", &[block.clone()], &ctx), Ok(n(66.0)));
    assert_eq!(registry.invoke("MAX", &[block], &ctx), Ok(n(30.0)));
}

/// A column area used as a scalar picks the formula cell's row
#[test]
fn test_implicit_intersection() {
    let mut wb = Workbook::with_sheets(&["Sheet1"]).unwrap();
    wb.set_rows(0, "A1", vec![vec![n(1.0)], vec![n(2.0)], vec![n(3.0)]])
        .unwrap();
    let column = wb.area(0, "A1:A3").unwrap();

    assert_eq!(scalar(&column, &wb.context(1, 4)), Ok(n(2.0)));
    assert_eq!(
        scalar(&column, &wb.context(7, 4)),
        Err(EvalError::Code(ErrorCode::Value))
    );
}

#[test]
fn test_broadcast_over_stored_cells() {
    let mut wb = Workbook::with_sheets(&["Sheet1"]).unwrap();
    wb.set_rows(
        0,
        "A1",
        vec![
            vec![n(1.0)],
            vec![Value::Error(ErrorCode::Div0)],
            vec![n(3.0)],
        ],
    )
    .unwrap();
    wb.set_rows(0, "B1", vec![vec![n(10.0)], vec![n(10.0)], vec![n(10.0)]])
        .unwrap();

    let ctx = wb.context(0, 4);
    let sum = evaluate_binary(
        BinaryOperator::Add,
        &wb.area(0, "A1:A3").unwrap(),
        &wb.area(0, "B1:B3").unwrap(),
        &ctx,
    );
    match sum {
        Value::Area(area) => {
            assert_eq!((area.first_row(), area.first_col()), (0, 4));
            assert_eq!(
                area.to_rows(&wb).unwrap(),
                vec![
                    vec![n(11.0)],
                    vec![Value::Error(ErrorCode::Div0)],
                    vec![n(13.0)],
                ]
            );
        }
        other => panic!("expected an area, got {:?}", other),
    }
}
