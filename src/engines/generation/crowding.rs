//! Deterministic crowding: children replace the parents they behave most
//! like, if they are at least as good.

use rand::Rng;

use super::assignment::hungarian;
use super::individual::Individual;
use crate::engines::evaluation::behavioural_distance;
use crate::types::DISTANCE_SENTINEL;

/// Split `population_size` indices into random groups of `set_size`,
/// drawn without replacement.
pub fn parent_groups<R: Rng>(population_size: usize, set_size: usize, rng: &mut R) -> Vec<Vec<usize>> {
    let mut pool: Vec<usize> = (0..population_size).collect();
    let mut groups = Vec::with_capacity(population_size / set_size.max(1));
    while !pool.is_empty() {
        let take = set_size.max(1).min(pool.len());
        let group = (0..take)
            .map(|_| pool.swap_remove(rng.gen_range(0..pool.len())))
            .collect();
        groups.push(group);
    }
    groups
}

/// `distances[i][j]` is the distance from parent `i` to child `j`. Infinite
/// or undefined distances become a large finite sentinel.
pub fn distance_matrix(parents: &[Individual], children: &[Individual]) -> Vec<Vec<f64>> {
    parents
        .iter()
        .map(|parent| {
            children
                .iter()
                .map(|child| {
                    let d = behavioural_distance(parent.trajectory.as_deref(), child.trajectory.as_deref());
                    if d.is_finite() {
                        d
                    } else {
                        DISTANCE_SENTINEL
                    }
                })
                .collect()
        })
        .collect()
}

/// True if the child should replace the parent. The child wins when its
/// fitness value is greater; exact ties are settled by a fair coin.
pub fn replacement_rule<R: Rng>(parent_fitness: f32, child_fitness: f32, rng: &mut R) -> bool {
    if child_fitness > parent_fitness {
        true
    } else if child_fitness == parent_fitness {
        rng.gen_bool(0.5)
    } else {
        false
    }
}

/// Match children to parents and pick a survivor for every parent slot.
pub fn select_survivors<R: Rng>(
    parents: Vec<Individual>,
    children: Vec<Individual>,
    rng: &mut R,
) -> Vec<Individual> {
    let distances = distance_matrix(&parents, &children);
    let matches = hungarian(&distances);
    let mut children: Vec<Option<Individual>> = children.into_iter().map(Some).collect();

    parents
        .into_iter()
        .zip(matches)
        .map(|(parent, j)| {
            let Some(child) = children.get_mut(j).and_then(Option::take) else {
                return parent;
            };
            if replacement_rule(parent.fitness_or_worst(), child.fitness_or_worst(), rng) {
                child
            } else {
                parent
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::evaluation::Trajectory;
    use crate::push::Program;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn test_groups_cover_population_once() {
        let mut rng = StdRng::seed_from_u64(10);
        let groups = parent_groups(12, 4, &mut rng);
        assert_eq!(groups.len(), 3);
        let mut all: Vec<usize> = groups.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_replacement_rule() {
        let mut rng = StdRng::seed_from_u64(11);
        assert!(replacement_rule(1.0, 2.0, &mut rng));
        assert!(!replacement_rule(2.0, 1.0, &mut rng));
        let kept = (0..2000).filter(|_| replacement_rule(1.0, 1.0, &mut rng)).count();
        assert!((850..1150).contains(&kept), "kept {}", kept);
    }

    #[test]
    fn test_missing_trajectories_use_sentinel() {
        let parent = Individual::new(Program::default());
        let mut child = Individual::new(Program::default());
        child.trajectory = Some(Arc::new(Trajectory::new(1, 1, 1)));
        let matrix = distance_matrix(&[parent], &[child]);
        assert_eq!(matrix, vec![vec![DISTANCE_SENTINEL]]);
    }

    #[test]
    fn test_survivors_follow_matching() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut near_a = Trajectory::new(1, 1, 1);
        near_a.record(0, 0, &[0.0]);
        let mut near_b = Trajectory::new(1, 1, 1);
        near_b.record(0, 0, &[10.0]);

        let mut parent_a = Individual::new(Program::default());
        parent_a.trajectory = Some(Arc::new(near_a.clone()));
        parent_a.fitness = Some(1.0);
        let mut parent_b = Individual::new(Program::default());
        parent_b.trajectory = Some(Arc::new(near_b.clone()));
        parent_b.fitness = Some(1.0);

        // child 0 resembles parent b and has a greater value; child 1
        // resembles parent a and has a smaller one
        let mut child0 = parent_b.clone();
        child0.fitness = Some(5.0);
        child0.errors = vec![5.0];
        let mut child1 = parent_a.clone();
        child1.fitness = Some(0.5);
        child1.errors = vec![0.5];

        let survivors = select_survivors(vec![parent_a, parent_b], vec![child0, child1], &mut rng);
        assert_eq!(survivors[0].fitness, Some(1.0));
        assert_eq!(survivors[1].fitness, Some(5.0));
    }
}
