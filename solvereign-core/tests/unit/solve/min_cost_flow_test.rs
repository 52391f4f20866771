use super::*;

#[test]
fn matches_a_single_driver_to_a_single_block() {
    // source(0) -> driver(1) -> block(2) -> sink(3)
    let mut flow = MinCostFlow::new(4);
    let source_to_driver = flow.add_edge(0, 1, 1, 0);
    let driver_to_block = flow.add_edge(1, 2, 1, 5);
    let block_to_sink = flow.add_edge(2, 3, 1, 0);

    let (total_flow, total_cost) = flow.solve(0, 3);

    assert_eq!(total_flow, 1);
    assert_eq!(total_cost, 5);
    assert_eq!(flow.flow_on(source_to_driver), 1);
    assert_eq!(flow.flow_on(driver_to_block), 1);
    assert_eq!(flow.flow_on(block_to_sink), 1);
}

#[test]
fn prefers_the_cheaper_of_two_parallel_driver_arcs() {
    // source -> driver_a(1), driver_b(2) -> block(3) -> sink(4)
    let mut flow = MinCostFlow::new(5);
    flow.add_edge(0, 1, 1, 0);
    flow.add_edge(0, 2, 1, 0);
    let cheap = flow.add_edge(1, 3, 1, 100);
    let expensive = flow.add_edge(2, 3, 1, 1);
    flow.add_edge(3, 4, 1, 0);

    flow.solve(0, 4);

    assert_eq!(flow.flow_on(cheap), 0);
    assert_eq!(flow.flow_on(expensive), 1);
}

#[test]
fn leaves_unreachable_demand_unmatched() {
    // Two blocks but only one driver slot: max flow is 1, not 2.
    let mut flow = MinCostFlow::new(5);
    flow.add_edge(0, 1, 1, 0);
    flow.add_edge(1, 2, 1, 0);
    flow.add_edge(1, 3, 1, 0);
    flow.add_edge(2, 4, 1, 0);
    flow.add_edge(3, 4, 1, 0);

    let (total_flow, _) = flow.solve(0, 4);
    assert_eq!(total_flow, 1);
}

#[test]
fn saturates_all_capacity_when_pool_matches_demand() {
    let mut flow = MinCostFlow::new(6);
    flow.add_edge(0, 1, 1, 0);
    flow.add_edge(0, 2, 1, 0);
    flow.add_edge(1, 3, 1, 1);
    flow.add_edge(1, 4, 1, 2);
    flow.add_edge(2, 3, 1, 2);
    flow.add_edge(2, 4, 1, 1);
    flow.add_edge(3, 5, 1, 0);
    flow.add_edge(4, 5, 1, 0);

    let (total_flow, total_cost) = flow.solve(0, 5);
    assert_eq!(total_flow, 2);
    assert_eq!(total_cost, 2); // optimal pairing: driver1->block3 (1) + driver2->block4 (1)
}
