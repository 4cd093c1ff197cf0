//! Minimum-cost assignment on a square cost matrix (Hungarian method with
//! row and column potentials).

/// Returns `matches` where row `i` is assigned column `matches[i]`, such
/// that the total cost is minimal. NaN costs are treated as `f64::MAX`.
pub fn hungarian(costs: &[Vec<f64>]) -> Vec<usize> {
    let n = costs.len();
    if n == 0 {
        return Vec::new();
    }
    let cost = |i: usize, j: usize| {
        let c = costs[i].get(j).copied().unwrap_or(f64::MAX);
        if c.is_nan() {
            f64::MAX
        } else {
            c
        }
    };

    // 1-based; column 0 and row 0 are sentinels
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; n + 1];
    let mut owner = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        owner[0] = row;
        let mut j0 = 0;
        let mut min_to = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];
        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = cost(i0 - 1, j - 1) - u[i0] - v[j];
                if reduced < min_to[j] {
                    min_to[j] = reduced;
                    way[j] = j0;
                }
                if min_to[j] < delta {
                    delta = min_to[j];
                    j1 = j;
                }
            }
            if j1 == 0 {
                break;
            }
            for j in 0..=n {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_to[j] -= delta;
                }
            }
            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }
        while j0 != 0 {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
        }
    }

    let mut matches = vec![0usize; n];
    for j in 1..=n {
        if owner[j] != 0 {
            matches[owner[j] - 1] = j - 1;
        }
    }
    matches
}
