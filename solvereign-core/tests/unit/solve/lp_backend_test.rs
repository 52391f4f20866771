use super::*;

#[test]
fn mip_selects_the_cheaper_column_when_either_covers_everything() {
    let instance_ids = vec!["a".to_string(), "b".to_string()];
    let cheap_covers = vec!["a".to_string(), "b".to_string()];
    let expensive_covers = vec!["a".to_string(), "b".to_string()];
    let columns = vec![
        MasterColumn { cost: 1.0, covers: &cheap_covers },
        MasterColumn { cost: 5.0, covers: &expensive_covers },
    ];

    let result = solve_mip(&columns, &instance_ids, 5.0).expect("highs solves a trivial set-partition");
    assert_eq!(result.status, MasterStatus::Optimal);
    assert_eq!(result.selected, vec![0]);
}

#[test]
fn mip_combines_columns_when_no_single_column_covers_everything() {
    let instance_ids = vec!["a".to_string(), "b".to_string()];
    let covers_a = vec!["a".to_string()];
    let covers_b = vec!["b".to_string()];
    let columns = vec![MasterColumn { cost: 1.0, covers: &covers_a }, MasterColumn { cost: 1.0, covers: &covers_b }];

    let result = solve_mip(&columns, &instance_ids, 5.0).expect("highs solves a trivial set-partition");
    assert_eq!(result.status, MasterStatus::Optimal);
    let mut selected = result.selected;
    selected.sort_unstable();
    assert_eq!(selected, vec![0, 1]);
}

#[test]
fn mip_reports_infeasible_with_an_empty_pool() {
    let instance_ids = vec!["a".to_string()];
    let columns: Vec<MasterColumn> = Vec::new();
    let result = solve_mip(&columns, &instance_ids, 5.0).expect("empty pool does not error the back-end call");
    assert_eq!(result.status, MasterStatus::Infeasible);
    assert!(result.selected.is_empty());
}

#[test]
fn relaxation_prices_a_scarce_instance_higher_than_an_abundant_one() {
    let instance_ids = vec!["scarce".to_string(), "abundant".to_string()];
    let only_scarce = vec!["scarce".to_string()];
    let covers_both = vec!["scarce".to_string(), "abundant".to_string()];
    let only_abundant = vec!["abundant".to_string()];
    let columns = vec![
        MasterColumn { cost: 10.0, covers: &only_scarce },
        MasterColumn { cost: 1.0, covers: &covers_both },
        MasterColumn { cost: 1.0, covers: &only_abundant },
    ];

    let result = solve_relaxation(&columns, &instance_ids, 5.0).expect("highs solves the relaxation");
    assert_eq!(result.status, MasterStatus::Optimal);
    // The cheaper combined column should be used to cover both instances,
    // so neither dual should reflect the expensive scarce-only column.
    assert!(result.duals["scarce"] <= 10.0);
}
