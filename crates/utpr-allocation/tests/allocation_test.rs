use utpr_allocation::{
    AllocationConfig, AllocationError, Allocator, EntityRecord, FactorTable,
};
use utpr_types::FieldValue;

fn record(entity: &str, employees: FieldValue, assets: FieldValue) -> EntityRecord {
    EntityRecord::new()
        .with_field("Entity", FieldValue::String(entity.to_string()))
        .with_field("Employees", employees)
        .with_field("Tangible_Assets", assets)
}

fn table(records: Vec<EntityRecord>) -> FactorTable {
    FactorTable::new(
        vec![
            "Entity".to_string(),
            "Employees".to_string(),
            "Tangible_Assets".to_string(),
        ],
        records,
    )
}

#[test]
fn allocates_worked_example_exactly() {
    let source = table(vec![
        record("A", FieldValue::Integer(100), FieldValue::Integer(1000)),
        record("B", FieldValue::Integer(300), FieldValue::Integer(3000)),
    ]);
    let config = AllocationConfig::new(1000.0);

    let result = Allocator::new().allocate(&source, &config).unwrap();

    assert_eq!(result.len(), 2);
    let a = &result.entities()[0];
    let b = &result.entities()[1];

    assert_eq!(a.payroll_share, 0.25);
    assert_eq!(a.asset_share, 0.25);
    assert_eq!(a.allocation_weight, 0.25);
    assert_eq!(a.allocated_tax, 250.0);

    assert_eq!(b.payroll_share, 0.75);
    assert_eq!(b.asset_share, 0.75);
    assert_eq!(b.allocation_weight, 0.75);
    assert_eq!(b.allocated_tax, 750.0);

    assert_eq!(result.total_allocated(), 1000.0);
}

#[test]
fn result_columns_extend_source_columns() {
    let source = table(vec![record(
        "A",
        FieldValue::Integer(1),
        FieldValue::Integer(1),
    )]);
    let result = Allocator::new()
        .allocate(&source, &AllocationConfig::new(100.0))
        .unwrap();

    assert_eq!(
        result.columns(),
        &[
            "Entity",
            "Employees",
            "Tangible_Assets",
            "Payroll_Share",
            "Asset_Share",
            "Allocation_Weight",
            "Allocated_UTPR_Tax",
        ]
    );
    // Source record travels through untouched.
    assert_eq!(
        result.entities()[0].record.get("Entity"),
        Some(&FieldValue::String("A".to_string()))
    );
}

#[test]
fn rounding_remainder_goes_to_last_record() {
    let source = table(vec![
        record("A", FieldValue::Integer(1), FieldValue::Integer(1)),
        record("B", FieldValue::Integer(1), FieldValue::Integer(1)),
        record("C", FieldValue::Integer(1), FieldValue::Integer(1)),
    ]);
    let result = Allocator::new()
        .allocate(&source, &AllocationConfig::new(100.0))
        .unwrap();

    let allocated: Vec<f64> = result.entities().iter().map(|e| e.allocated_tax).collect();
    assert_eq!(allocated, vec![33.33, 33.33, 33.34]);
    assert!((result.total_allocated() - 100.0).abs() < 1e-9);
}

#[test]
fn allocated_column_sums_to_tax_amount() {
    // Uneven factors that force per-row rounding in both directions.
    let source = table(vec![
        record("A", FieldValue::Integer(7), FieldValue::Integer(13)),
        record("B", FieldValue::Integer(11), FieldValue::Integer(5)),
        record("C", FieldValue::Integer(3), FieldValue::Integer(29)),
        record("D", FieldValue::Integer(17), FieldValue::Integer(1)),
    ]);
    let config = AllocationConfig::new(997.77).with_weights(0.3, 0.7);
    let result = Allocator::new().allocate(&source, &config).unwrap();

    let total = result.total_allocated();
    assert!(
        (total - 997.77).abs() < 1e-9,
        "allocated column must sum to the tax amount, got {total}"
    );
    for entity in result.entities() {
        assert!(entity.allocation_weight >= 0.0);
        assert!(entity.allocation_weight <= 1.0);
    }
}

#[test]
fn weights_not_summing_to_one_are_rejected() {
    let source = table(vec![record(
        "A",
        FieldValue::Integer(1),
        FieldValue::Integer(1),
    )]);
    let config = AllocationConfig::new(100.0).with_weights(0.6, 0.6);

    let err = Allocator::new().allocate(&source, &config).unwrap_err();
    assert_eq!(
        err,
        AllocationError::InvalidWeights { payroll_weight: 0.6, asset_weight: 0.6 }
    );
}

#[test]
fn negative_tax_amount_is_rejected() {
    let source = table(vec![record(
        "A",
        FieldValue::Integer(1),
        FieldValue::Integer(1),
    )]);
    let err = Allocator::new()
        .allocate(&source, &AllocationConfig::new(-100.0))
        .unwrap_err();
    assert_eq!(err, AllocationError::NegativeTaxAmount { amount: -100.0 });
}

#[test]
fn empty_table_is_rejected() {
    let source = table(vec![]);
    let err = Allocator::new()
        .allocate(&source, &AllocationConfig::new(100.0))
        .unwrap_err();
    assert_eq!(err, AllocationError::EmptyInput);
}

#[test]
fn missing_asset_column_is_named() {
    let source = FactorTable::new(
        vec!["Entity".to_string(), "Employees".to_string()],
        vec![EntityRecord::new()
            .with_field("Entity", FieldValue::String("A".to_string()))
            .with_field("Employees", FieldValue::Integer(10))],
    );
    let err = Allocator::new()
        .allocate(&source, &AllocationConfig::new(100.0))
        .unwrap_err();
    assert_eq!(
        err,
        AllocationError::MissingColumns { columns: vec!["Tangible_Assets".to_string()] }
    );
}

#[test]
fn negative_employee_count_is_rejected() {
    let source = table(vec![
        record("A", FieldValue::Integer(10), FieldValue::Integer(100)),
        record("B", FieldValue::Integer(-5), FieldValue::Integer(100)),
    ]);
    let err = Allocator::new()
        .allocate(&source, &AllocationConfig::new(100.0))
        .unwrap_err();
    assert_eq!(
        err,
        AllocationError::NegativeFactorValue {
            column: "Employees".to_string(),
            row: 1,
            value: -5.0,
        }
    );
}

#[test]
fn non_numeric_cell_coerces_to_zero_without_error() {
    let source = table(vec![
        record(
            "A",
            FieldValue::String("abc".to_string()),
            FieldValue::Integer(1000),
        ),
        record("B", FieldValue::Integer(300), FieldValue::Integer(3000)),
    ]);
    let result = Allocator::new()
        .allocate(&source, &AllocationConfig::new(1000.0))
        .unwrap();

    // "abc" coerced to 0 employees: record A keeps only its asset share.
    assert_eq!(result.entities()[0].payroll_share, 0.0);
    assert_eq!(result.entities()[0].asset_share, 0.25);
    assert_eq!(result.entities()[1].payroll_share, 1.0);
    assert_eq!(result.total_allocated(), 1000.0);
}

#[test]
fn positive_weight_with_zero_base_is_inconsistent() {
    let source = table(vec![record(
        "A",
        FieldValue::Integer(0),
        FieldValue::Integer(100),
    )]);
    let config = AllocationConfig::new(100.0).with_weights(1.0, 0.0);

    let err = Allocator::new().allocate(&source, &config).unwrap_err();
    assert_eq!(
        err,
        AllocationError::InconsistentWeighting { factor: "payroll".to_string() }
    );
}

#[test]
fn zero_weight_with_zero_base_is_legal() {
    // Asset weight 0 with zero total assets must not error; asset shares are
    // a literal 0 and the payroll factor carries the whole allocation.
    let source = table(vec![
        record("A", FieldValue::Integer(25), FieldValue::Integer(0)),
        record("B", FieldValue::Integer(75), FieldValue::Integer(0)),
    ]);
    let config = AllocationConfig::new(200.0).with_weights(1.0, 0.0);

    let result = Allocator::new().allocate(&source, &config).unwrap();
    assert_eq!(result.entities()[0].asset_share, 0.0);
    assert_eq!(result.entities()[0].allocated_tax, 50.0);
    assert_eq!(result.entities()[1].allocated_tax, 150.0);
}

#[test]
fn allocation_is_idempotent() {
    let source = table(vec![
        record("A", FieldValue::Integer(7), FieldValue::Float(13.5)),
        record("B", FieldValue::Integer(11), FieldValue::Float(5.25)),
    ]);
    let config = AllocationConfig::new(123.45).with_weights(0.4, 0.6);

    let allocator = Allocator::new();
    let first = allocator.allocate(&source, &config).unwrap();
    let second = allocator.allocate(&source, &config).unwrap();
    assert_eq!(first, second);
}
