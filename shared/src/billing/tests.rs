use super::*;
use crate::models::{ItemStatus, Tab, TabItem, TabStatus, Table, TableStatus};
use proptest::prelude::*;

fn dec(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn item(tab_id: i64, price_cents: i64, quantity: i32, status: ItemStatus) -> TabItem {
    TabItem {
        id: tab_id * 100 + quantity as i64,
        tab_id,
        product_id: 1,
        product_name: "Item".to_string(),
        quantity,
        unit_price: dec(price_cents),
        note: None,
        status,
        created_at: 0,
    }
}

fn tab(id: i64, table_id: Option<i64>, total_cents: i64, status: TabStatus) -> Tab {
    Tab {
        id,
        restaurant_id: 1,
        table_id,
        status,
        customer_name: None,
        people: 2,
        total: dec(total_cents),
        opened_at: 0,
        closed_at: None,
    }
}

fn table(id: i64, status: TableStatus, total_cents: i64) -> Table {
    Table {
        id,
        restaurant_id: 1,
        number: id as i32,
        capacity: 4,
        status,
        opened_at: None,
        waiter: None,
        total: dec(total_cents),
    }
}

// ========================================================================
// Subtotal
// ========================================================================

#[test]
fn test_subtotal_excludes_cancelled_items() {
    let items = vec![
        item(1, 1099, 3, ItemStatus::Pending),
        item(1, 500, 2, ItemStatus::Delivered),
        item(1, 9999, 1, ItemStatus::Cancelled),
    ];
    assert_eq!(subtotal(&items), dec(4297)); // 32.97 + 10.00
}

#[test]
fn test_subtotal_empty() {
    let items: Vec<TabItem> = vec![];
    assert_eq!(subtotal(&items), Decimal::ZERO);
}

#[test]
fn test_accumulation_precision() {
    let lines: Vec<(Decimal, i32)> = (0..1000).map(|_| (dec(1), 1)).collect();
    assert_eq!(subtotal(&lines), dec(1000));
}

// ========================================================================
// compute_bill
// ========================================================================

#[test]
fn test_bill_without_options() {
    let bill = compute_bill(dec(10000), &BillOptions::default());
    assert_eq!(bill.subtotal, dec(10000));
    assert_eq!(bill.discount, Decimal::ZERO);
    assert_eq!(bill.adjusted, dec(10000));
    assert_eq!(bill.service_fee, Decimal::ZERO);
    assert_eq!(bill.cover_charge, Decimal::ZERO);
    assert_eq!(bill.total, dec(10000));
}

#[test]
fn test_percent_discount_then_service() {
    // 100.00 - 10% = 90.00, + 10% service = 99.00
    let options = BillOptions {
        discount: Some(Discount::Percent(Decimal::from(10))),
        include_service: true,
        ..Default::default()
    };
    let bill = compute_bill(dec(10000), &options);
    assert_eq!(bill.discount, dec(1000));
    assert_eq!(bill.adjusted, dec(9000));
    assert_eq!(bill.service_fee, dec(900));
    assert_eq!(bill.total, dec(9900));
}

#[test]
fn test_fixed_discount_and_cover_per_person() {
    // 80.00 - 5.00 = 75.00, + 7.50 service, + 3 x 15.00 couvert
    let options = BillOptions {
        discount: Some(Discount::Fixed(dec(500))),
        include_service: true,
        include_cover: true,
        cover_charge: dec(1500),
        people: 3,
        ..Default::default()
    };
    let bill = compute_bill(dec(8000), &options);
    assert_eq!(bill.adjusted, dec(7500));
    assert_eq!(bill.service_fee, dec(750));
    assert_eq!(bill.cover_charge, dec(4500));
    assert_eq!(bill.total, dec(12750));
}

#[test]
fn test_cover_ignored_unless_included() {
    let options = BillOptions {
        include_cover: false,
        cover_charge: dec(2000),
        people: 4,
        ..Default::default()
    };
    assert_eq!(compute_bill(dec(5000), &options).total, dec(5000));
}

#[test]
fn test_custom_service_rate() {
    let options = BillOptions {
        include_service: true,
        service_fee_percent: Decimal::from(12),
        ..Default::default()
    };
    assert_eq!(compute_bill(dec(5000), &options).service_fee, dec(600));
}

#[test]
fn test_service_fee_rounds_half_away_from_zero() {
    // 10% of 0.05 = 0.005 -> 0.01
    let options = BillOptions {
        include_service: true,
        ..Default::default()
    };
    assert_eq!(compute_bill(dec(5), &options).service_fee, dec(1));
}

#[test]
fn test_large_fixed_discount_gives_negative_total() {
    let options = BillOptions {
        discount: Some(Discount::Fixed(dec(5000))),
        ..Default::default()
    };
    let bill = compute_bill(dec(3000), &options);
    assert_eq!(bill.adjusted, dec(-2000));
    assert_eq!(bill.total, dec(-2000));
    assert!(bill.total.is_sign_negative());
}

// ========================================================================
// Validation
// ========================================================================

#[test]
fn test_validate_accepts_defaults() {
    assert!(BillOptions::default().validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_options() {
    let bad = [
        BillOptions {
            discount: Some(Discount::Percent(Decimal::from(101))),
            ..Default::default()
        },
        BillOptions {
            discount: Some(Discount::Percent(Decimal::from(-1))),
            ..Default::default()
        },
        BillOptions {
            discount: Some(Discount::Fixed(dec(-1))),
            ..Default::default()
        },
        BillOptions {
            cover_charge: dec(-100),
            ..Default::default()
        },
        BillOptions {
            service_fee_percent: Decimal::from(-5),
            ..Default::default()
        },
        BillOptions {
            people: 0,
            ..Default::default()
        },
    ];
    for options in bad {
        assert!(options.validate().is_err(), "{options:?} should be invalid");
    }
}

#[test]
fn test_fixed_discount_is_bounded() {
    let at_limit = BillOptions {
        discount: Some(Discount::Fixed(MAX_FIXED_DISCOUNT)),
        include_service: true,
        ..Default::default()
    };
    assert!(at_limit.validate().is_ok());
    let bill = compute_bill(dec(10_000), &at_limit);
    assert_eq!(bill.adjusted, dec(10_000) - MAX_FIXED_DISCOUNT);
    assert!(bill.total.is_sign_negative());

    let huge = BillOptions {
        discount: Some(Discount::Fixed(Decimal::from_scientific("1e28").unwrap())),
        include_service: true,
        ..Default::default()
    };
    let err = huge.validate().unwrap_err();
    assert!(matches!(err, BillingError::FixedDiscountTooLarge(_)));
    let err: AppError = err.into();
    assert_eq!(err.code, ErrorCode::InvalidDiscount);
}

#[test]
fn test_cover_charge_is_bounded() {
    let options = BillOptions {
        include_cover: true,
        cover_charge: Decimal::from_scientific("1e27").unwrap(),
        people: i32::MAX,
        ..Default::default()
    };
    assert!(matches!(options.validate(), Err(BillingError::CoverChargeTooLarge(_))));

    let options = BillOptions {
        include_cover: true,
        cover_charge: MAX_PRICE,
        people: i32::MAX,
        ..Default::default()
    };
    assert!(options.validate().is_ok());
    assert_eq!(compute_bill(Decimal::ZERO, &options).cover_charge, MAX_PRICE * Decimal::from(i32::MAX));
}

#[test]
fn test_max_fixed_discount_covers_one_full_line() {
    assert_eq!(MAX_FIXED_DISCOUNT, MAX_PRICE * Decimal::from(MAX_QUANTITY));
}

#[test]
fn test_billing_error_maps_to_app_error() {
    let err: AppError = BillingError::PercentOutOfRange(Decimal::from(150)).into();
    assert_eq!(err.code, ErrorCode::InvalidDiscount);

    let err: AppError = BillingError::InvalidPeople(0).into();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
    assert_eq!(err.message, "people must be at least 1, got 0");
}

#[test]
fn test_discount_json_shape() {
    let d: Discount = serde_json::from_str(r#"{"type":"percent","value":15}"#).unwrap();
    assert_eq!(d, Discount::Percent(Decimal::from(15)));
    let d: Discount = serde_json::from_str(r#"{"type":"fixed","value":7.5}"#).unwrap();
    assert_eq!(d, Discount::Fixed(dec(750)));
}

// ========================================================================
// Reconciliation
// ========================================================================

#[test]
fn test_reconcile_consistent_state_is_empty() {
    let tables = vec![
        table(1, TableStatus::Occupied, 3297),
        table(2, TableStatus::Free, 0),
    ];
    let tabs = vec![tab(10, Some(1), 3297, TabStatus::Open)];
    let items = vec![item(10, 1099, 3, ItemStatus::Pending)];

    assert!(reconcile(&tables, &tabs, &items).is_empty());
}

#[test]
fn test_reconcile_fixes_tab_and_table_totals() {
    let tables = vec![table(1, TableStatus::Occupied, 0)];
    let tabs = vec![tab(10, Some(1), 0, TabStatus::Open)];
    let items = vec![
        item(10, 1000, 2, ItemStatus::Ready),
        item(10, 1500, 1, ItemStatus::Cancelled),
    ];

    let plan = reconcile(&tables, &tabs, &items);
    assert_eq!(
        plan.tabs,
        vec![TabCorrection {
            tab_id: 10,
            stored_total: Decimal::ZERO,
            total: dec(2000),
        }]
    );
    assert_eq!(plan.tables.len(), 1);
    assert_eq!(plan.tables[0].status, TableStatus::Occupied);
    assert_eq!(plan.tables[0].total, dec(2000));
    assert!(!plan.tables[0].frees_table());
}

#[test]
fn test_reconcile_frees_table_without_open_tab() {
    let tables = vec![table(1, TableStatus::AwaitingPayment, 4500)];
    let tabs = vec![tab(10, Some(1), 4500, TabStatus::Closed)];

    let plan = reconcile(&tables, &tabs, &[]);
    assert!(plan.tabs.is_empty());
    assert_eq!(plan.tables.len(), 1);
    assert_eq!(plan.tables[0].status, TableStatus::Free);
    assert_eq!(plan.tables[0].total, Decimal::ZERO);
    assert!(plan.tables[0].frees_table());
}

#[test]
fn test_reconcile_occupies_free_table_with_open_tab() {
    let tables = vec![table(1, TableStatus::Free, 0)];
    let tabs = vec![tab(10, Some(1), 0, TabStatus::Open)];

    let plan = reconcile(&tables, &tabs, &[]);
    assert_eq!(plan.tables.len(), 1);
    assert_eq!(plan.tables[0].status, TableStatus::Occupied);
}

#[test]
fn test_reconcile_keeps_awaiting_status() {
    let tables = vec![table(1, TableStatus::AwaitingPayment, 100)];
    let tabs = vec![tab(10, Some(1), 1000, TabStatus::Open)];
    let items = vec![item(10, 1000, 1, ItemStatus::Delivered)];

    let plan = reconcile(&tables, &tabs, &items);
    assert!(plan.tabs.is_empty());
    assert_eq!(plan.tables[0].status, TableStatus::AwaitingPayment);
    assert_eq!(plan.tables[0].total, dec(1000));
}

#[test]
fn test_reconcile_sums_multiple_open_tabs_per_table() {
    let tables = vec![table(1, TableStatus::Occupied, 0)];
    let tabs = vec![
        tab(10, Some(1), 1000, TabStatus::Open),
        tab(11, Some(1), 250, TabStatus::Open),
    ];
    let items = vec![
        item(10, 1000, 1, ItemStatus::Pending),
        item(11, 250, 1, ItemStatus::Pending),
    ];

    let plan = reconcile(&tables, &tabs, &items);
    assert!(plan.tabs.is_empty());
    assert_eq!(plan.tables[0].total, dec(1250));
}

#[test]
fn test_reconcile_ignores_counter_tabs_for_tables() {
    let tables = vec![table(1, TableStatus::Free, 0)];
    let tabs = vec![tab(10, None, 0, TabStatus::Open)];
    let items = vec![item(10, 300, 1, ItemStatus::Pending)];

    let plan = reconcile(&tables, &tabs, &items);
    assert_eq!(plan.tabs.len(), 1);
    assert!(plan.tables.is_empty());
}

/// Apply a plan to in-memory rows the way the server applies it to the database
fn apply(plan: &ReconciliationPlan, tables: &mut [Table], tabs: &mut [Tab]) {
    for c in &plan.tabs {
        if let Some(t) = tabs.iter_mut().find(|t| t.id == c.tab_id) {
            t.total = c.total;
        }
    }
    for c in &plan.tables {
        if let Some(t) = tables.iter_mut().find(|t| t.id == c.table_id) {
            t.status = c.status;
            t.total = c.total;
        }
    }
}

// ========================================================================
// Properties
// ========================================================================

fn arb_options() -> impl Strategy<Value = BillOptions> {
    let discount = prop_oneof![
        Just(None),
        (0i64..=10_000).prop_map(|p| Some(Discount::Percent(Decimal::new(p, 2)))),
        (0i64..=1_000_000).prop_map(|c| Some(Discount::Fixed(dec(c)))),
    ];
    (
        discount,
        any::<bool>(),
        0i64..=2_000,
        any::<bool>(),
        0i64..=10_000,
        1i32..=20,
    )
        .prop_map(
            |(discount, include_service, rate, include_cover, cover, people)| BillOptions {
                discount,
                include_service,
                service_fee_percent: Decimal::new(rate, 2),
                include_cover,
                cover_charge: dec(cover),
                people,
            },
        )
}

fn arb_status() -> impl Strategy<Value = ItemStatus> {
    prop_oneof![
        Just(ItemStatus::Pending),
        Just(ItemStatus::Preparing),
        Just(ItemStatus::Ready),
        Just(ItemStatus::Delivered),
        Just(ItemStatus::Cancelled),
    ]
}

proptest! {
    #[test]
    fn prop_total_non_decreasing_in_quantity(
        price in 0i64..=10_000_000,
        qty in 1i32..MAX_QUANTITY,
        extra in 1i32..100,
        options in arb_options(),
    ) {
        let small = compute_bill(subtotal(&[(dec(price), qty)]), &options);
        let large = compute_bill(subtotal(&[(dec(price), qty + extra)]), &options);
        prop_assert!(large.total >= small.total);
    }

    #[test]
    fn prop_total_non_decreasing_in_price(
        price in 0i64..=10_000_000,
        bump in 0i64..=100_000,
        qty in 1i32..=MAX_QUANTITY,
        options in arb_options(),
    ) {
        let low = compute_bill(subtotal(&[(dec(price), qty)]), &options);
        let high = compute_bill(subtotal(&[(dec(price + bump), qty)]), &options);
        prop_assert!(high.total >= low.total);
    }

    #[test]
    fn prop_percent_discount_never_exceeds_subtotal(
        subtotal_cents in 0i64..=100_000_000,
        percent in 0i64..=10_000,
    ) {
        let options = BillOptions {
            discount: Some(Discount::Percent(Decimal::new(percent, 2))),
            ..Default::default()
        };
        prop_assert!(options.validate().is_ok());
        let bill = compute_bill(dec(subtotal_cents), &options);
        prop_assert!(bill.discount <= bill.subtotal);
        prop_assert!(bill.discount >= Decimal::ZERO);
        prop_assert!(bill.total >= Decimal::ZERO);
    }

    #[test]
    fn prop_components_add_up(
        subtotal_cents in 0i64..=100_000_000,
        options in arb_options(),
    ) {
        let bill = compute_bill(dec(subtotal_cents), &options);
        prop_assert_eq!(bill.adjusted, bill.subtotal - bill.discount);
        prop_assert_eq!(bill.total, bill.adjusted + bill.service_fee + bill.cover_charge);
        prop_assert_eq!(bill.total.round_dp(DECIMAL_PLACES), bill.total);
    }

    #[test]
    fn prop_reconcile_is_idempotent(
        lines in prop::collection::vec((0usize..4, 0i64..5_000, 1i32..10, arb_status()), 0..20),
        open in prop::collection::vec(any::<bool>(), 4),
        stored in prop::collection::vec(0i64..10_000, 4),
    ) {
        let mut tables: Vec<Table> = (0..3)
            .map(|i| {
                let status = if stored[i] % 3 == 0 {
                    TableStatus::Free
                } else if stored[i] % 3 == 1 {
                    TableStatus::Occupied
                } else {
                    TableStatus::AwaitingPayment
                };
                table(i as i64 + 1, status, stored[i])
            })
            .collect();
        // Tab 4 is a counter tab
        let mut tabs: Vec<Tab> = (0..4)
            .map(|i| {
                let table_id = if i < 3 { Some(i as i64 + 1) } else { None };
                let status = if open[i] { TabStatus::Open } else { TabStatus::Closed };
                tab(i as i64 + 10, table_id, stored[i], status)
            })
            .collect();
        let items: Vec<TabItem> = lines
            .iter()
            .map(|(t, price, qty, status)| item(*t as i64 + 10, *price, *qty, *status))
            .collect();

        let plan = reconcile(&tables, &tabs, &items);
        apply(&plan, &mut tables, &mut tabs);
        prop_assert!(reconcile(&tables, &tabs, &items).is_empty());
    }
}
