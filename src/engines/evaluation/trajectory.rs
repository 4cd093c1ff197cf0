//! Recorded search paths and the behavioural distance built on them.

/// Search points of every swarm member at every move of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    members: usize,
    moves: usize,
    dims: usize,
    points: Vec<f32>,
}

impl Trajectory {
    pub fn new(members: usize, moves: usize, dims: usize) -> Self {
        Self {
            members,
            moves,
            dims,
            points: vec![0.0; members * moves * dims],
        }
    }

    pub fn members(&self) -> usize {
        self.members
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    fn offset(&self, member: usize, step: usize) -> usize {
        (member * self.moves + step) * self.dims
    }

    /// Store a point; components beyond the recorded dimensionality are ignored.
    pub fn record(&mut self, member: usize, step: usize, point: &[f32]) {
        if member >= self.members || step >= self.moves {
            return;
        }
        let start = self.offset(member, step);
        for (slot, value) in self.points[start..start + self.dims].iter_mut().zip(point) {
            *slot = *value;
        }
    }

    pub fn point(&self, member: usize, step: usize) -> Option<&[f32]> {
        if member >= self.members || step >= self.moves {
            return None;
        }
        let start = self.offset(member, step);
        Some(&self.points[start..start + self.dims])
    }

    /// Sum of Euclidean distances between matching (member, move) points.
    ///
    /// Trajectories of different shape are infinitely far apart.
    pub fn distance(&self, other: &Trajectory) -> f64 {
        if self.members != other.members || self.moves != other.moves || self.dims != other.dims {
            return f64::INFINITY;
        }
        self.points
            .chunks(self.dims.max(1))
            .zip(other.points.chunks(other.dims.max(1)))
            .map(|(a, b)| {
                a.iter()
                    .zip(b)
                    .map(|(x, y)| {
                        let d = f64::from(*x) - f64::from(*y);
                        d * d
                    })
                    .sum::<f64>()
                    .sqrt()
            })
            .sum()
    }
}

/// Distance between two optional trajectories; a missing one is infinitely far.
pub fn behavioural_distance(a: Option<&Trajectory>, b: Option<&Trajectory>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => a.distance(b),
        _ => f64::INFINITY,
    }
}
