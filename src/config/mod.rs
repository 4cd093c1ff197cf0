pub mod traits;
pub mod evolution;
pub mod interpreter;
pub mod optimisation;
pub mod manager;

pub use manager::{AppConfig, ConfigManager};
pub use evolution::EvolutionConfig;
pub use interpreter::InterpreterConfig;
pub use optimisation::OptimisationConfig;
pub use traits::ConfigSection;
