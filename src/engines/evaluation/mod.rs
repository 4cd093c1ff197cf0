pub mod starts;
pub mod swarm;
pub mod trajectory;

pub use starts::StartPoints;
pub use swarm::{Evaluation, Member, RunOutcome, SwarmEvaluator};
pub use trajectory::{behavioural_distance, Trajectory};
