pub mod assignment;
pub mod crowding;
pub mod evolution_engine;
pub mod individual;
pub mod operators;
pub mod progress;
pub mod simplify;

pub use assignment::hungarian;
pub use crowding::{distance_matrix, parent_groups, replacement_rule, select_survivors};
pub use evolution_engine::{
    best_index, EvolutionEngine, EvolutionResult, EvolutionSummary, GenerationStats, ProgressCallback,
};
pub use individual::{Genotype, Individual, IndividualSummary};
pub use operators::{crossover, crossover_two_children, mutate, mutate_swarm_size, tournament_selection};
pub use progress::{ChannelProgressCallback, ConsoleProgressCallback, ProgressMessage};
pub use simplify::{auto_simplify, simplify_step};
