use super::World;
use crate::cell::Cell;
use crate::geometry::GridGeometry;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StepMetrics {
    pub step: usize,
    pub time: f64,
    pub resource_count: usize,
    pub free_cells: usize,
    pub balance: u64,
    pub total_spawned: u64,
    pub total_collected: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct WorldStats {
    pub time: f64,
    pub resource_count: usize,
    pub capacity: usize,
    pub painted_cells: usize,
    pub balance: u64,
    pub total_spawned: u64,
    pub total_collected: u64,
    pub clicks_accepted: u64,
    pub clicks_rejected: u64,
    pub moves: u64,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub dt: f64,
    pub sample_every: usize,
    pub stats: WorldStats,
    pub samples: Vec<StepMetrics>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExperimentError {
    InvalidSampleEvery,
    InvalidStepDuration(f64),
    TooManySteps { max: usize, actual: usize },
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            ExperimentError::InvalidStepDuration(dt) => {
                write!(f, "step duration must be finite and positive (got {dt})")
            }
            ExperimentError::TooManySteps { max, actual } => {
                write!(f, "steps ({actual}) exceed supported maximum ({max})")
            }
        }
    }
}

impl Error for ExperimentError {}

impl<G: GridGeometry> World<G> {
    pub const MAX_SCRIPT_STEPS: usize = 10_000_000;

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            time: self.scheduler.now(),
            resource_count: self.registry.len(),
            capacity: self.registry.capacity(),
            painted_cells: self.geometry.paintable_cells().len(),
            balance: self.balance(),
            total_spawned: self.total_spawned,
            total_collected: self.total_collected,
            clicks_accepted: self.clicks_accepted,
            clicks_rejected: self.clicks_rejected,
            moves: self.moves,
        }
    }

    pub(crate) fn collect_step_metrics(&self, step: usize) -> StepMetrics {
        let painted = self.geometry.paintable_cells();
        let free_cells = painted
            .iter()
            .filter(|&&c| !self.registry.contains(c))
            .count();
        StepMetrics {
            step,
            time: self.scheduler.now(),
            resource_count: self.registry.len(),
            free_cells,
            balance: self.balance(),
            total_spawned: self.total_spawned,
            total_collected: self.total_collected,
        }
    }

    /// Advances `steps` times by `dt`, letting `clicker` pick at most one cell
    /// to click after each step. Samples every `sample_every` steps and at
    /// the final step.
    pub fn run_script(
        &mut self,
        steps: usize,
        dt: f64,
        sample_every: usize,
        mut clicker: impl FnMut(&World<G>) -> Option<Cell>,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ExperimentError::InvalidStepDuration(dt));
        }
        if steps > Self::MAX_SCRIPT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_SCRIPT_STEPS,
                actual: steps,
            });
        }

        let mut samples = Vec::new();
        for step in 1..=steps {
            self.advance(dt);
            if let Some(cell) = clicker(&*self) {
                self.click_cell(cell);
            }
            if step % sample_every == 0 || step == steps {
                samples.push(self.collect_step_metrics(step));
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            steps,
            dt,
            sample_every,
            stats: self.stats(),
            samples,
        })
    }
}
