use std::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::sim::config::{CacheConfig, RubyConfig, RunConfig, SeOptions};
use crate::sim::error::ConfigurationError;

/// CPU execution model.
#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum CpuVariant {
    #[default]
    Atomic,
    Timing,
    #[value(name = "inorder")]
    #[serde(rename = "inorder")]
    InOrder,
    Detailed,
}

impl CpuVariant {
    /// Memory mode a cpu of this variant needs to start in.
    pub fn mem_mode(&self) -> MemMode {
        match self {
            CpuVariant::Atomic => MemMode::Atomic,
            _ => MemMode::Timing,
        }
    }

    /// Variants that can run more than one hardware thread per cpu.
    pub fn supports_smt(&self) -> bool {
        matches!(self, CpuVariant::Detailed | CpuVariant::InOrder)
    }
}

impl fmt::Display for CpuVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CpuVariant::Atomic => "AtomicSimpleCPU",
            CpuVariant::Timing => "TimingSimpleCPU",
            CpuVariant::InOrder => "InOrderCPU",
            CpuVariant::Detailed => "DerivO3CPU",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemMode {
    Atomic,
    Timing,
}

/// Coherence protocol parameters; the protocol name comes from the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    pub protocol: String,
    pub network: RubyConfig,
}

/// The memory subsystem a topology is built around. Exactly one per topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryStrategy {
    Classic(CacheConfig),
    Coherent(ProtocolConfig),
}

impl MemoryStrategy {
    pub fn is_coherent(&self) -> bool {
        matches!(self, MemoryStrategy::Coherent(_))
    }
}

/// Outcome of strategy selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub cpu_variant: CpuVariant,
    pub mem_mode: MemMode,
    /// Variant the run step switches to after restoring a checkpoint.
    pub future_variant: Option<CpuVariant>,
    /// Requested variant when the protocol forced a different one.
    pub downgraded_from: Option<CpuVariant>,
    pub memory: MemoryStrategy,
}

/// Pick the cpu variant and memory strategy for the requested options.
pub fn select(options: &SeOptions) -> Result<Selection, ConfigurationError> {
    let requested = options.system.cpu_type;

    if !options.system.ruby {
        let (cpu_variant, mem_mode, future_variant) =
            cpu_policy(requested, &options.caches, &options.run)?;
        return Ok(Selection {
            cpu_variant,
            mem_mode,
            future_variant,
            downgraded_from: None,
            memory: MemoryStrategy::Classic(options.caches),
        });
    }

    let protocol = options
        .build
        .protocol
        .clone()
        .ok_or(ConfigurationError::MissingProtocol)?;
    let downgraded_from = match requested {
        CpuVariant::Detailed | CpuVariant::InOrder => {
            return Err(ConfigurationError::IncompatibleCpu(requested));
        }
        CpuVariant::Atomic => {
            warn!(
                "using {} since it's needed by the {} protocol, {} was requested",
                CpuVariant::Timing,
                protocol,
                requested
            );
            Some(requested)
        }
        CpuVariant::Timing => None,
    };

    info!("memory subsystem: {} coherence protocol", protocol);
    Ok(Selection {
        cpu_variant: CpuVariant::Timing,
        mem_mode: MemMode::Timing,
        future_variant: None,
        downgraded_from,
        memory: MemoryStrategy::Coherent(ProtocolConfig {
            protocol,
            network: options.ruby.clone(),
        }),
    })
}

/// General cpu selection for the classic memory system.
///
/// Restoring from a checkpoint starts in `restore_with_cpu` (atomic unless given) and switches to
/// the requested variant afterwards.
pub fn cpu_policy(
    requested: CpuVariant,
    caches: &CacheConfig,
    run: &RunConfig,
) -> Result<(CpuVariant, MemMode, Option<CpuVariant>), ConfigurationError> {
    if requested == CpuVariant::Detailed && !caches.caches {
        return Err(ConfigurationError::DetailedNeedsCaches);
    }
    if requested == CpuVariant::Atomic {
        return Ok((CpuVariant::Atomic, MemMode::Atomic, None));
    }

    match run.checkpoint_restore {
        Some(_) => {
            let start = run.restore_with_cpu.unwrap_or(CpuVariant::Atomic);
            if start == requested {
                Ok((requested, requested.mem_mode(), None))
            } else {
                Ok((start, start.mem_mode(), Some(requested)))
            }
        }
        None => Ok((requested, MemMode::Timing, None)),
    }
}
