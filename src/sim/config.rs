use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use toml::Value;

use crate::base::units::{Frequency, MemSize};
use crate::sim::error::{ConfigurationError, FatalModeError};
use crate::sim::strategy::CpuVariant;

/// Instruction set the simulator binary was built for.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TargetIsa {
    #[default]
    Alpha,
    Arm,
    Mips,
    Power,
    Sparc,
    X86,
}

impl TargetIsa {
    /// Operating system the benchmark binaries were compiled against.
    pub fn os(&self) -> &'static str {
        match self {
            TargetIsa::Alpha => "tru64",
            _ => "linux",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetIsa::Alpha => "alpha",
            TargetIsa::Arm => "arm",
            TargetIsa::Mips => "mips",
            TargetIsa::Power => "power",
            TargetIsa::Sparc => "sparc",
            TargetIsa::X86 => "x86",
        }
    }
}

impl fmt::Display for TargetIsa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetIsa {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "alpha" => Ok(Self::Alpha),
            "arm" => Ok(Self::Arm),
            "mips" => Ok(Self::Mips),
            "power" => Ok(Self::Power),
            "sparc" => Ok(Self::Sparc),
            "x86" => Ok(Self::X86),
            _ => Err(format!(
                "unsupported isa '{}', expected one of: alpha, arm, mips, power, sparc, x86",
                value
            )),
        }
    }
}

/// Properties fixed when the simulator was compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEnv {
    pub full_system: bool,
    pub target_isa: TargetIsa,
    /// Name of the compiled-in coherence protocol; `None` when built without one.
    pub protocol: Option<String>,
}

impl BuildEnv {
    pub fn current() -> Self {
        let target_isa = option_env!("SESIM_TARGET_ISA")
            .and_then(|isa| isa.parse().ok())
            .unwrap_or_default();
        let protocol = match option_env!("SESIM_PROTOCOL") {
            Some("None") => None,
            Some(protocol) => Some(protocol.to_string()),
            None => Some("MOESI_hammer".to_string()),
        };
        Self {
            full_system: cfg!(feature = "full-system"),
            target_isa,
            protocol,
        }
    }

    pub fn check_syscall_emulation(&self) -> Result<(), FatalModeError> {
        if self.full_system {
            return Err(FatalModeError::FullSystem);
        }
        Ok(())
    }
}

impl Default for BuildEnv {
    fn default() -> Self {
        Self {
            full_system: false,
            target_isa: TargetIsa::Alpha,
            protocol: Some("MOESI_hammer".to_string()),
        }
    }
}

pub trait Config: DeserializeOwned + Default {
    fn from_section(section: Option<&Value>) -> Result<Self, ConfigurationError> {
        match section {
            Some(value) => value
                .clone()
                .try_into()
                .map_err(|e: toml::de::Error| ConfigurationError::invalid("config", e.message())),
            None => {
                debug!("config section not found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SystemConfig {
    pub num_cpus: usize,
    /// Dash or semicolon separated benchmark names, one per cpu.
    pub bench: Option<String>,
    pub cmd: Option<PathBuf>,
    pub options: String,
    pub input: String,
    pub output: String,
    pub errout: String,
    pub cpu_type: CpuVariant,
    pub clock: Frequency,
    pub mem_size: MemSize,
    pub fastmem: bool,
    pub ruby: bool,
    pub spec_root: PathBuf,
    pub input_set: String,
}

impl Config for SystemConfig {}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            num_cpus: 1,
            bench: None,
            cmd: None,
            options: String::new(),
            input: String::new(),
            output: String::new(),
            errout: String::new(),
            cpu_type: CpuVariant::Atomic,
            clock: Frequency(2_000_000_000),
            mem_size: MemSize(1024 << 20),
            fastmem: false,
            ruby: false,
            spec_root: PathBuf::from("/dist/m5/cpu2000"),
            input_set: "ref".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    pub caches: bool,
    pub l2cache: bool,
    pub l1d_size: MemSize,
    pub l1i_size: MemSize,
    pub l2_size: MemSize,
    pub l1d_assoc: usize,
    pub l1i_assoc: usize,
    pub l2_assoc: usize,
    pub cacheline_size: u64,
}

impl Config for CacheConfig {}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            caches: false,
            l2cache: false,
            l1d_size: MemSize(64 << 10),
            l1i_size: MemSize(32 << 10),
            l2_size: MemSize(2 << 20),
            l1d_assoc: 2,
            l1i_assoc: 2,
            l2_assoc: 8,
            cacheline_size: 64,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NetworkTopology {
    #[default]
    Crossbar,
    Mesh,
    Pt2pt,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RubyConfig {
    pub num_dirs: usize,
    pub num_l2caches: usize,
    pub topology: NetworkTopology,
    pub mesh_rows: usize,
    pub garnet: bool,
    pub clock: Frequency,
}

impl Config for RubyConfig {}

impl Default for RubyConfig {
    fn default() -> Self {
        Self {
            num_dirs: 1,
            num_l2caches: 1,
            topology: NetworkTopology::Crossbar,
            mesh_rows: 1,
            garnet: false,
            clock: Frequency(1_000_000_000),
        }
    }
}

/// Envelope handed to the run step along with the topology.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
    pub maxtick: Option<u64>,
    pub checkpoint_restore: Option<u64>,
    pub restore_with_cpu: Option<CpuVariant>,
}

impl Config for RunConfig {}

/// The merged, read-only view of every option. Built once per invocation.
#[derive(Debug, Clone)]
pub struct SeOptions {
    pub build: BuildEnv,
    pub system: SystemConfig,
    pub caches: CacheConfig,
    pub ruby: RubyConfig,
    pub run: RunConfig,
}

impl SeOptions {
    /// Binary to run when no benchmark list is given.
    pub fn command(&self) -> PathBuf {
        self.system.cmd.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "tests/test-progs/hello/bin/{}/linux/hello",
                self.build.target_isa
            ))
        })
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.system.num_cpus == 0 {
            return Err(ConfigurationError::NoCpus);
        }
        if self.caches.cacheline_size == 0 || !self.caches.cacheline_size.is_power_of_two() {
            return Err(ConfigurationError::invalid(
                "cacheline_size",
                format!("{} is not a power of two", self.caches.cacheline_size),
            ));
        }
        if self.system.mem_size.bytes() == 0 {
            return Err(ConfigurationError::invalid("mem_size", "must be non-zero"));
        }
        for (field, assoc) in [
            ("l1d_assoc", self.caches.l1d_assoc),
            ("l1i_assoc", self.caches.l1i_assoc),
            ("l2_assoc", self.caches.l2_assoc),
        ] {
            if assoc == 0 {
                return Err(ConfigurationError::invalid(field, "must be at least 1"));
            }
        }
        if self.system.spec_root.to_str().is_none() {
            return Err(ConfigurationError::invalid(
                "spec_root",
                format!("{} is not valid UTF-8", self.system.spec_root.display()),
            ));
        }
        Ok(())
    }
}

impl Default for SeOptions {
    fn default() -> Self {
        Self {
            build: BuildEnv::default(),
            system: SystemConfig::default(),
            caches: CacheConfig::default(),
            ruby: RubyConfig::default(),
            run: RunConfig::default(),
        }
    }
}
