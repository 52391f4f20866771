use super::*;
use crate::models::tour::TourTemplate;

fn template(template_id: &str, day: u8, start_min: i32, end_min: i32, count: u32) -> TourTemplate {
    TourTemplate {
        template_id: template_id.to_string(),
        day,
        start_min,
        end_min,
        crosses_midnight: false,
        count,
        depot: None,
        skills: Vec::new(),
    }
}

#[test]
fn expands_into_exactly_count_instances() {
    let templates = vec![template("A", 1, 480, 960, 3)];
    let instances = expand(&templates).expect("valid template");
    assert_eq!(instances.len(), 3);
    let mut indices: Vec<u32> = instances.iter().map(|i| i.expansion_index).collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[test]
fn expansion_is_idempotent_across_independent_calls() {
    let templates = vec![template("A", 1, 480, 960, 2), template("B", 2, 600, 1000, 1)];
    let first = expand(&templates).expect("valid templates");
    let second = expand(&templates).expect("valid templates");

    let first_ids: Vec<&str> = first.iter().map(|i| i.instance_id.as_str()).collect();
    let second_ids: Vec<&str> = second.iter().map(|i| i.instance_id.as_str()).collect();
    assert_eq!(first_ids, second_ids);
}

#[test]
fn total_instance_count_matches_sum_of_template_counts() {
    let templates = vec![template("A", 1, 480, 960, 3), template("B", 1, 1000, 1200, 2), template("C", 2, 400, 500, 1)];
    let instances = expand(&templates).expect("valid templates");
    assert_eq!(instances.len(), 6);
}

#[test]
fn rejects_a_template_with_zero_count() {
    let templates = vec![template("A", 1, 480, 960, 0)];
    assert!(expand(&templates).is_err());
}

#[test]
fn orders_instances_by_stable_key() {
    let templates = vec![template("late", 1, 900, 1000, 1), template("early", 1, 480, 600, 1)];
    let instances = expand(&templates).expect("valid templates");
    assert_eq!(instances[0].template_id, "early");
    assert_eq!(instances[1].template_id, "late");
}

#[test]
fn templates_differing_only_by_depot_never_collide_on_instance_id() {
    let mut with_depot = template("A", 1, 480, 960, 2);
    with_depot.depot = Some("DEPOT1".to_string());
    let templates = vec![template("B", 1, 480, 960, 2), with_depot];

    let instances = expand(&templates).expect("valid templates");
    let mut ids: Vec<&str> = instances.iter().map(|i| i.instance_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), instances.len());
}
