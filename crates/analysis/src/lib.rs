pub mod controller;
pub mod evaluator;
pub mod runner;

pub use controller::{AnalysisController, AnalysisSettings, LoopDeps, StartOutcome, StopOutcome};
pub use evaluator::evaluate;
pub use runner::{AnalysisLoop, LoopState, Trigger};
