use super::*;

#[test]
fn default_audit_checks_excludes_sensitivity() {
    let checks = default_audit_checks();
    assert!(!checks.iter().any(|c| c == "SENSITIVITY"));
    assert!(checks.iter().any(|c| c == "COVERAGE"));
    assert!(checks.iter().any(|c| c == "REPRODUCIBILITY"));
    assert_eq!(checks.len(), 8);
}

#[test]
fn default_config_matches_spec_hard_thresholds() {
    let config = SolverConfig::default();
    assert_eq!(config.max_weekly_hours, 55.0);
    assert_eq!(config.min_rest_min, 660);
    assert_eq!(config.span_regular_max_min, 840);
    assert_eq!(config.span_split_max_min, 960);
    assert_eq!(config.span_3er_max_min, 930);
    assert_eq!(config.split_gap_min, 240);
    assert_eq!(config.split_gap_max, 360);
    assert_eq!(config.chain_gap_min, 30);
    assert_eq!(config.chain_gap_max, 60);
    assert_eq!(config.max_blocks_per_week, 6);
    assert_eq!(config.freeze_minutes, 720);
    assert!(!config.freeze_override_allowed);
    assert!(matches!(config.fatigue_rule, FatigueRule::NoConsecutiveTriple));
    assert!(matches!(config.engine, Engine::BlockHeuristic));
}

#[test]
fn default_config_is_serializable_round_trip() {
    let config = SolverConfig::default();
    let json = serde_json::to_string(&config).expect("config serializes");
    let restored: SolverConfig = serde_json::from_str(&json).expect("config deserializes");
    assert_eq!(restored.max_weekly_hours, config.max_weekly_hours);
    assert_eq!(restored.engine, config.engine);
}

#[test]
fn freeze_context_defaults_to_empty_maps() {
    let ctx = FreezeContext::default();
    assert!(ctx.prior_assignments.is_empty());
    assert!(ctx.prior_blocks.is_empty());
}
