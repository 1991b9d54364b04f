//! Runtime configuration (§6 "Configuration options", §A.3).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

pub const DEFAULT_ITERATIONS: usize = 1;
pub const DEFAULT_MAX_STEPS: usize = 10_000;
pub const DEFAULT_SEED: u64 = 0;

/// The millisecond delay range a `fuzzing` strategy injects at
/// collection-access scheduling points (§6 `fuzzing_delays_ms`). A plain
/// struct rather than `std::ops::Range<u64>` since `Range` does not
/// round-trip through serde without extra glue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRangeMs {
    pub min: u64,
    pub max: u64,
}

impl DelayRangeMs {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }
}

impl Default for DelayRangeMs {
    fn default() -> Self {
        Self { min: 0, max: 5 }
    }
}

/// `strategy` (§6): which scheduling strategy drives the exploration.
/// Picking the actual algorithm per strategy is out of scope (§1,
/// `scheduler::strategies`) — this enum only records the user's declared
/// intent and its parameters; `portfolio` rotates among the others as the
/// process id varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchedulingStrategyKind {
    Random,
    Pct(usize),
    Probabilistic(usize),
    Dfs,
    Fuzzing { delays_ms: DelayRangeMs },
    Portfolio,
}

impl Default for SchedulingStrategyKind {
    fn default() -> Self {
        Self::Random
    }
}

/// Configuration failures (§A.3 "builder-with-validation").
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("iterations must be > 0")]
    ZeroIterations,
    #[error("max_steps must be > 0")]
    ZeroMaxSteps,
    #[error("fuzzing delay range must have min <= max, got {min}..={max}")]
    InvalidDelayRange { min: u64, max: u64 },
}

/// The §6 configuration surface, validated at construction (§A.3).
///
/// # Examples
///
/// ```rust
/// use conductor_rt::config::RuntimeConfig;
///
/// let config = RuntimeConfig::builder().with_iterations(100).build().unwrap();
/// assert_eq!(config.iterations, 100);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub strategy: SchedulingStrategyKind,
    pub iterations: usize,
    pub max_steps: usize,
    pub seed: u64,
    pub report_coverage: bool,
    pub verbose: bool,
    pub fuzzing_delays_ms: DelayRangeMs,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            strategy: SchedulingStrategyKind::default(),
            iterations: DEFAULT_ITERATIONS,
            max_steps: DEFAULT_MAX_STEPS,
            seed: DEFAULT_SEED,
            report_coverage: false,
            verbose: false,
            fuzzing_delays_ms: DelayRangeMs::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        if self.fuzzing_delays_ms.min > self.fuzzing_delays_ms.max {
            return Err(ConfigError::InvalidDelayRange {
                min: self.fuzzing_delays_ms.min,
                max: self.fuzzing_delays_ms.max,
            });
        }
        Ok(())
    }
}

/// Fluent builder for [`RuntimeConfig`] (§A.3).
#[derive(Debug, Default)]
pub struct RuntimeConfigBuilder {
    config: RuntimeConfig,
}

impl RuntimeConfigBuilder {
    pub fn with_strategy(mut self, strategy: SchedulingStrategyKind) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.config.iterations = iterations;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.config.max_steps = max_steps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_report_coverage(mut self, enabled: bool) -> Self {
        self.config.report_coverage = enabled;
        self
    }

    pub fn with_verbose(mut self, enabled: bool) -> Self {
        self.config.verbose = enabled;
        self
    }

    pub fn with_fuzzing_delays_ms(mut self, range: DelayRangeMs) -> Self {
        self.config.fuzzing_delays_ms = range;
        self
    }

    pub fn build(self) -> Result<RuntimeConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
