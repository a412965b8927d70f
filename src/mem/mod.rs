pub mod classic;
pub mod ruby;

use serde::Serialize;

use crate::base::port::{CpuPorts, PortPeer};
use crate::mem::classic::ClassicHierarchy;
use crate::mem::ruby::RubySystem;

/// An instantiated memory subsystem, one of the two wiring strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "strategy")]
pub enum MemorySubsystem {
    Classic(ClassicHierarchy),
    Coherent(RubySystem),
}

impl MemorySubsystem {
    /// Per-cpu port bindings, indexed by cpu id.
    pub fn cpu_ports(&self) -> &[CpuPorts] {
        match self {
            MemorySubsystem::Classic(hierarchy) => &hierarchy.cpu_ports,
            MemorySubsystem::Coherent(ruby) => &ruby.cpu_ports,
        }
    }

    pub fn is_coherent(&self) -> bool {
        matches!(self, MemorySubsystem::Coherent(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bus {
    pub name: String,
    /// Slave port on the memory side of the bus, if anything is attached there.
    pub mem_side: Option<PortPeer>,
}

impl Bus {
    pub fn new(name: impl Into<String>, mem_side: Option<PortPeer>) -> Self {
        Self {
            name: name.into(),
            mem_side,
        }
    }
}

/// The shared buses of a system: always a memory bus, plus the L2 bus when there is a shared L2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusTopology {
    pub membus: Bus,
    pub l2bus: Option<Bus>,
}
