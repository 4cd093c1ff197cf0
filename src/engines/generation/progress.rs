use super::evolution_engine::{GenerationStats, ProgressCallback};
use log::{debug, info};

pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        debug!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        info!(
            "Generation {} complete. Best fitness: {:.6}, mean: {:.6}, best size: {} points",
            stats.generation + 1,
            stats.best_fitness,
            stats.mean_fitness,
            stats.best_points
        );
    }

    fn on_individual_evaluated(&mut self, count: usize, total: usize) {
        if count % 10 == 0 || count == total {
            debug!("  Evaluated {}/{} individuals", count, total);
        }
    }
}

/// Forwards progress to another thread, e.g. a monitor or a test.
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete(GenerationStats),
    IndividualEvaluated { current: usize, total: usize },
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete(stats.clone()));
    }

    fn on_individual_evaluated(&mut self, count: usize, total: usize) {
        let _ = self.sender.send(ProgressMessage::IndividualEvaluated { current: count, total });
    }
}
