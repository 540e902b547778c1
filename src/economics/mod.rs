pub mod report;
pub mod schedule;
pub mod simulator;

pub use schedule::EmissionSchedule;
pub use simulator::{
    simulate, ProgressSink, RewardSplit, RewardTotals, SimulationOutcome, SimulationParams, Simulator,
    YearlyProgress,
};
