//! Lookup functions evaluated against stored cells

use duke_eval::lookup::{lookup_index, lookup_range_index, ValueVector};
use duke_eval::{builtin_functions, Area, ErrorCode, EvalError, Value, Workbook};
use pretty_assertions::assert_eq;

fn n(v: f64) -> Value {
    Value::Number(v)
}

fn t(s: &str) -> Value {
    Value::text(s)
}

/// A1:B4 ascending numbers with names, D1:E3 names with numbers,
/// G1:J2 a horizontal table and L1:L4 descending numbers
fn fixture() -> Workbook {
    let mut wb = Workbook::with_sheets(&["Sheet1"]).unwrap();
    wb.set_rows(
        0,
        "A1",
        vec![
            vec![n(1.0), t("one")],
            vec![n(3.0), t("three")],
            vec![n(5.0), t("five")],
            vec![n(7.0), t("seven")],
        ],
    )
    .unwrap();
    wb.set_rows(
        0,
        "D1",
        vec![
            vec![t("one"), n(1.0)],
            vec![t("two"), n(2.0)],
            vec![t("three"), n(3.0)],
        ],
    )
    .unwrap();
    wb.set_rows(
        0,
        "G1",
        vec![
            vec![n(10.0), n(20.0), n(30.0), n(40.0)],
            vec![t("a"), t("b"), t("c"), t("d")],
        ],
    )
    .unwrap();
    wb.set_rows(0, "L1", vec![vec![n(7.0)], vec![n(5.0)], vec![n(3.0)], vec![n(1.0)]])
        .unwrap();
    wb
}

fn call(wb: &Workbook, name: &str, args: &[Value]) -> Value {
    builtin_functions()
        .invoke(name, args, &wb.context(20, 20))
        .unwrap()
}

fn area_of(value: Value) -> Area {
    match value {
        Value::Area(area) => area,
        other => panic!("expected an area, got {:?}", other),
    }
}

#[test]
fn test_vlookup_range() {
    let wb = fixture();
    let table = wb.area(0, "A1:B4").unwrap();
    assert_eq!(call(&wb, "VLOOKUP", &[n(4.0), table.clone(), n(2.0)]), t("three"));
    assert_eq!(call(&wb, "VLOOKUP", &[n(7.0), table.clone(), n(2.0)]), t("seven"));
    assert_eq!(call(&wb, "VLOOKUP", &[n(100.0), table.clone(), n(1.0)]), n(7.0));
    assert_eq!(
        call(&wb, "VLOOKUP", &[n(0.0), table.clone(), n(2.0)]),
        Value::Error(ErrorCode::Na)
    );
    assert_eq!(
        call(&wb, "VLOOKUP", &[n(5.0), table, n(3.0)]),
        Value::Error(ErrorCode::Ref)
    );
}

#[test]
fn test_vlookup_exact() {
    let wb = fixture();
    let numbers = wb.area(0, "A1:B4").unwrap();
    let names = wb.area(0, "D1:E3").unwrap();
    assert_eq!(
        call(&wb, "VLOOKUP", &[n(5.0), numbers.clone(), n(2.0), Value::Boolean(false)]),
        t("five")
    );
    assert_eq!(
        call(&wb, "VLOOKUP", &[n(6.0), numbers, n(2.0), Value::Boolean(false)]),
        Value::Error(ErrorCode::Na)
    );
    assert_eq!(
        call(&wb, "VLOOKUP", &[t("T*"), names.clone(), n(2.0), n(0.0)]),
        n(2.0)
    );
    assert_eq!(
        call(&wb, "VLOOKUP", &[t("THREE"), names, n(2.0), Value::Boolean(false)]),
        n(3.0)
    );
}

#[test]
fn test_vlookup_bad_arguments() {
    let wb = fixture();
    let table = wb.area(0, "A1:B4").unwrap();
    assert_eq!(
        call(&wb, "VLOOKUP", &[n(1.0), n(3.0), n(1.0)]),
        Value::Error(ErrorCode::Value)
    );
    assert_eq!(
        call(&wb, "VLOOKUP", &[n(1.0), table.clone(), n(0.0)]),
        Value::Error(ErrorCode::Value)
    );
    assert_eq!(
        call(&wb, "VLOOKUP", &[Value::Error(ErrorCode::Div0), table, n(1.0)]),
        Value::Error(ErrorCode::Div0)
    );
}

#[test]
fn test_hlookup() {
    let wb = fixture();
    let table = wb.area(0, "G1:J2").unwrap();
    assert_eq!(call(&wb, "HLOOKUP", &[n(25.0), table.clone(), n(2.0)]), t("b"));
    assert_eq!(
        call(&wb, "HLOOKUP", &[n(40.0), table.clone(), n(2.0), Value::Boolean(false)]),
        t("d")
    );
    assert_eq!(
        call(&wb, "HLOOKUP", &[n(5.0), table, n(2.0)]),
        Value::Error(ErrorCode::Na)
    );
}

#[test]
fn test_lookup_vector_and_array_forms() {
    let wb = fixture();
    let keys = wb.area(0, "A1:A4").unwrap();
    let results = wb.area(0, "B1:B4").unwrap();
    assert_eq!(call(&wb, "LOOKUP", &[n(6.0), keys.clone(), results]), t("five"));
    assert_eq!(call(&wb, "LOOKUP", &[n(6.0), keys]), n(5.0));

    let tall = wb.area(0, "A1:B4").unwrap();
    assert_eq!(call(&wb, "LOOKUP", &[n(3.0), tall]), t("three"));

    let wide = wb.area(0, "G1:J2").unwrap();
    assert_eq!(call(&wb, "LOOKUP", &[n(35.0), wide]), t("c"));
}

#[test]
fn test_match() {
    let wb = fixture();
    let ascending = wb.area(0, "A1:A4").unwrap();
    let descending = wb.area(0, "L1:L4").unwrap();
    assert_eq!(call(&wb, "MATCH", &[n(5.0), ascending.clone(), n(0.0)]), n(3.0));
    assert_eq!(call(&wb, "MATCH", &[n(6.0), ascending.clone()]), n(3.0));
    assert_eq!(
        call(&wb, "MATCH", &[n(0.0), ascending, n(1.0)]),
        Value::Error(ErrorCode::Na)
    );
    assert_eq!(call(&wb, "MATCH", &[n(4.0), descending, n(-1.0)]), n(2.0));

    let names = wb.area(0, "D1:D3").unwrap();
    assert_eq!(call(&wb, "MATCH", &[t("th?ee"), names, n(0.0)]), n(3.0));

    let block = wb.area(0, "A1:B4").unwrap();
    assert_eq!(
        call(&wb, "MATCH", &[n(1.0), block, n(0.0)]),
        Value::Error(ErrorCode::Na)
    );
}

#[test]
fn test_match_scalar_lookup_array() {
    let wb = fixture();
    for array in [n(5.0), Value::Boolean(true), t("5")] {
        assert_eq!(
            call(&wb, "MATCH", &[n(1.0), array, n(0.0)]),
            Value::Error(ErrorCode::Na)
        );
    }
    assert_eq!(
        call(&wb, "MATCH", &[n(1.0), t("abc"), n(0.0)]),
        Value::Error(ErrorCode::Value)
    );
    assert_eq!(
        call(&wb, "MATCH", &[n(1.0), Value::Error(ErrorCode::Div0)]),
        Value::Error(ErrorCode::Div0)
    );
}

#[test]
fn test_xmatch_modes() {
    let wb = fixture();
    let ascending = wb.area(0, "A1:A4").unwrap();
    let descending = wb.area(0, "L1:L4").unwrap();
    let names = wb.area(0, "D1:D3").unwrap();

    assert_eq!(call(&wb, "XMATCH", &[n(5.0), ascending.clone()]), n(3.0));
    assert_eq!(
        call(&wb, "XMATCH", &[n(4.0), ascending.clone()]),
        Value::Error(ErrorCode::Na)
    );
    assert_eq!(call(&wb, "XMATCH", &[n(4.0), ascending.clone(), n(-1.0)]), n(2.0));
    assert_eq!(call(&wb, "XMATCH", &[n(4.0), ascending.clone(), n(1.0)]), n(3.0));
    assert_eq!(
        call(&wb, "XMATCH", &[n(4.0), ascending.clone(), n(1.0), n(2.0)]),
        n(3.0)
    );
    assert_eq!(
        call(&wb, "XMATCH", &[n(4.0), descending, n(-1.0), n(-2.0)]),
        n(3.0)
    );

    assert_eq!(call(&wb, "XMATCH", &[t("t*"), names.clone(), n(2.0)]), n(2.0));
    assert_eq!(
        call(&wb, "XMATCH", &[t("t*"), names.clone(), n(2.0), n(-1.0)]),
        n(3.0)
    );
    assert_eq!(
        call(&wb, "XMATCH", &[t("t*"), names]),
        Value::Error(ErrorCode::Na)
    );

    assert_eq!(
        call(&wb, "XMATCH", &[n(5.0), ascending.clone(), n(3.0)]),
        Value::Error(ErrorCode::Value)
    );
    assert_eq!(
        call(&wb, "XMATCH", &[n(5.0), ascending, n(0.0), n(0.0)]),
        Value::Error(ErrorCode::Value)
    );
}

#[test]
fn test_xmatch_reverse_search() {
    let mut wb = Workbook::with_sheets(&["Sheet1"]).unwrap();
    wb.set_rows(0, "A1", vec![vec![n(1.0), n(2.0), n(1.0)]]).unwrap();
    let row = wb.area(0, "A1:C1").unwrap();
    assert_eq!(call(&wb, "XMATCH", &[n(1.0), row.clone()]), n(1.0));
    assert_eq!(
        call(&wb, "XMATCH", &[n(1.0), row, Value::MissingArg, n(-1.0)]),
        n(3.0)
    );
}

#[test]
fn test_match_across_sheets() {
    let mut wb = Workbook::with_sheets(&["Jan", "Feb", "Mar"]).unwrap();
    for (sheet, v) in [10.0, 20.0, 30.0].into_iter().enumerate() {
        wb.set_value(sheet, "A1", v).unwrap();
    }
    let across = wb.cell_ref_3d(0, 2, "A1").unwrap();
    assert_eq!(call(&wb, "MATCH", &[n(20.0), across.clone(), n(0.0)]), n(2.0));
    assert_eq!(call(&wb, "MATCH", &[n(35.0), across]), n(3.0));
}

/// Vector-level search laws on stored data
#[test]
fn test_search_on_stored_vectors() {
    let mut wb = Workbook::with_sheets(&["Sheet1"]).unwrap();
    wb.set_rows(0, "A1", vec![vec![n(3.0)], vec![n(5.0)], vec![n(5.0)], vec![n(7.0)]])
        .unwrap();
    wb.set_rows(0, "B1", vec![vec![n(3.0)], vec![t("x")], vec![n(5.0)], vec![n(7.0)]])
        .unwrap();
    wb.set_rows(0, "C1", vec![vec![n(1.0)], vec![n(2.0)], vec![n(3.0)]])
        .unwrap();

    let ties = area_of(wb.area(0, "A1:A4").unwrap());
    let mixed = area_of(wb.area(0, "B1:B4").unwrap());
    let small = area_of(wb.area(0, "C1:C3").unwrap());
    let ties = ValueVector::column(&ties, 0, &wb).unwrap();
    let mixed = ValueVector::column(&mixed, 0, &wb).unwrap();
    let small = ValueVector::column(&small, 0, &wb).unwrap();

    assert_eq!(lookup_index(&n(5.0), &ties, false), Ok(1));
    assert_eq!(lookup_index(&n(5.0), &ties, true), Ok(2));
    assert_eq!(lookup_index(&n(5.0), &mixed, true), Ok(2));
    for approximate in [false, true] {
        assert_eq!(
            lookup_index(&n(99.0), &small, approximate),
            Err(EvalError::Code(ErrorCode::Na))
        );
    }
    assert_eq!(lookup_range_index(&n(99.0), &small, true), Ok(2));
}
