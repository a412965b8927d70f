use thiserror::Error;

use crate::sim::strategy::CpuVariant;

/// A benchmark name that the registry has no workload for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unable to find workload for {isa}: {name}")]
pub struct WorkloadResolutionError {
    pub name: String,
    pub isa: String,
}

/// Structural problems with the requested machine. Raised before any topology exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("at least one cpu is required")]
    NoCpus,

    #[error("number of benchmarks ({benchmarks}) not equal to num_cpus ({cpus})")]
    BenchmarkCountMismatch { benchmarks: usize, cpus: usize },

    #[error("the coherence protocol only works with the timing cpu, {0} was requested")]
    IncompatibleCpu(CpuVariant),

    #[error("the detailed cpu must be used with caches")]
    DetailedNeedsCaches,

    #[error("this build has no coherence protocol")]
    MissingProtocol,

    #[error("cpu {0} has no workload bound to it")]
    UnboundCpu(usize),

    #[error("cpu {0} is not part of the topology")]
    UnknownCpu(usize),

    #[error("memory subsystem exposes {ports} cpu ports for {cpus} cpus")]
    PortCountMismatch { ports: usize, cpus: usize },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// The build was configured for a mode this builder does not handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FatalModeError {
    #[error("this builder requires syscall emulation mode (*_SE)")]
    FullSystem,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeError {
    #[error(transparent)]
    Workload(#[from] WorkloadResolutionError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    FatalMode(#[from] FatalModeError),
}

pub type SeResult<T> = Result<T, SeError>;

impl ConfigurationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigurationError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
