//! C2: expands tour templates into atomic, stably-identified tour instances.
//!
//! Idempotent by construction: the instance id is derived entirely from the
//! template's intrinsic attributes and the expansion index, never from
//! iteration order or a counter threaded through the call (spec §4.2, §8
//! property 1).

use log::debug;

use crate::error::{SolverError, SolverResult};
use crate::models::tour::{TourInstance, TourTemplate};

/// Expands every template into `count` instances, ordered by
/// `(day, start_min, end_min, canonical signature, expansion index)` - the
/// stable key spec §4.2 and §4.3 both anchor on.
pub fn expand(templates: &[TourTemplate]) -> SolverResult<Vec<TourInstance>> {
    let mut keyed: Vec<(String, TourInstance)> = Vec::new();

    for template in templates {
        template.validate().map_err(|reason| SolverError::InputContradiction { reason, instances: vec![] })?;

        let signature = template.signature();
        for idx in 1..=template.count {
            let instance_id = format!("{signature}#{idx}");
            let instance = TourInstance {
                instance_id,
                template_id: template.template_id.clone(),
                day: template.day,
                start_min: template.start_min,
                end_min: template.end_min,
                duration_min: template.duration_min(),
                crosses_midnight: template.crosses_midnight,
                depot: template.depot.clone(),
                skills: template.skills.clone(),
                expansion_index: idx,
            };
            keyed.push((signature.clone(), instance));
        }
    }

    keyed.sort_by(|(sig_a, a), (sig_b, b)| {
        (a.day, a.start_min, a.end_min, sig_a, a.expansion_index)
            .cmp(&(b.day, b.start_min, b.end_min, sig_b, b.expansion_index))
    });

    let instances: Vec<TourInstance> = keyed.into_iter().map(|(_, instance)| instance).collect();

    debug!("expanded {} templates into {} instances", templates.len(), instances.len());

    Ok(instances)
}

#[cfg(test)]
#[path = "../../tests/unit/construction/expander_test.rs"]
mod expander_test;
