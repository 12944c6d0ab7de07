use std::collections::HashMap;

use serde::Serialize;

use super::allocator::ReplicaSpec;

/// Two replica specs that would materialize under the same instance name.
/// The replica seen first in input order keeps the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameConflict {
    pub instance_name: String,
    pub winner_index: u32,
    pub loser_index: u32,
    /// Position of the losing replica in the combined input
    pub position: usize,
}

/// Report instance-name collisions across one or more concatenated renders.
///
/// Stream names are not checked: aliased variants write into a
/// shared numbering scheme.
pub fn detect_conflicts(specs: &[ReplicaSpec]) -> Vec<NameConflict> {
    let mut first_seen: HashMap<&str, &ReplicaSpec> = HashMap::new();
    let mut conflicts = Vec::new();

    for (position, spec) in specs.iter().enumerate() {
        match first_seen.get(spec.instance_name.as_str()) {
            Some(winner) => {
                tracing::warn!(
                    instance_name = %spec.instance_name,
                    winner_index = winner.index,
                    loser_index = spec.index,
                    "Instance name collision"
                );
                conflicts.push(NameConflict {
                    instance_name: spec.instance_name.clone(),
                    winner_index: winner.index,
                    loser_index: spec.index,
                    position,
                });
            }
            None => {
                first_seen.insert(spec.instance_name.as_str(), spec);
            }
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{allocate, TopologyRequest};

    #[test]
    fn test_aliased_variants_do_not_conflict() {
        let mut specs = allocate(&TopologyRequest::new(3, "cam").with_alias("lobby")).unwrap();
        specs.extend(allocate(&TopologyRequest::new(3, "cam").with_alias("dock")).unwrap());

        assert!(detect_conflicts(&specs).is_empty());
    }

    #[test]
    fn test_same_render_twice_conflicts_on_every_instance() {
        let request = TopologyRequest::new(2, "cam");
        let mut specs = allocate(&request).unwrap();
        specs.extend(allocate(&request).unwrap());

        let conflicts = detect_conflicts(&specs);
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].instance_name, "cam-0");
        assert_eq!(conflicts[0].position, 2);
        assert_eq!(conflicts[1].instance_name, "cam-1");
        assert_eq!(conflicts[1].winner_index, 1);
        assert_eq!(conflicts[1].loser_index, 1);
    }

    #[test]
    fn test_alias_colliding_with_indexed_name() {
        // "cam" + alias "0" at one replica reads exactly like replica 0 of "cam"
        let mut specs = allocate(&TopologyRequest::new(2, "cam")).unwrap();
        specs.extend(allocate(&TopologyRequest::new(1, "cam").with_alias("0")).unwrap());

        let conflicts = detect_conflicts(&specs);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].instance_name, "cam-0");
        assert_eq!(conflicts[0].winner_index, 0);
        assert_eq!(conflicts[0].loser_index, 0);
        assert_eq!(conflicts[0].position, 2);
    }

    #[test]
    fn test_shared_stream_names_are_not_conflicts() {
        let mut specs = allocate(&TopologyRequest::new(1, "cam").with_alias("a")).unwrap();
        specs.extend(allocate(&TopologyRequest::new(1, "cam").with_alias("b")).unwrap());

        assert_eq!(specs[0].stream_name, specs[1].stream_name);
        assert!(detect_conflicts(&specs).is_empty());
    }
}
