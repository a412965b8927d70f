//! `PortPeer` names the object on the far side of a port connection.
//!
//! Connections are recorded as values rather than live channels: the run step owns the objects,
//! this crate only describes which master port is bound to which slave port.
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum PortPeer {
    /// The system memory bus.
    MemBus,
    /// The bus between the private L1s and the shared L2.
    L2Bus,
    /// CPU-side port of the private L1 instruction cache of a cpu.
    L1ICache(usize),
    /// CPU-side port of the private L1 data cache of a cpu.
    L1DCache(usize),
    /// CPU-side port of the shared L2.
    L2Cache,
    /// Port of the coherence sequencer assigned to a cpu.
    RubySequencer(usize),
    /// Directory controller of the coherence network.
    RubyDirectory(usize),
    /// Physical memory, bypassing all caches.
    PhysMem,
}

impl fmt::Display for PortPeer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortPeer::MemBus => write!(f, "system.membus.port"),
            PortPeer::L2Bus => write!(f, "system.tol2bus.port"),
            PortPeer::L1ICache(cpu) => write!(f, "system.cpu{}.icache.cpu_side", cpu),
            PortPeer::L1DCache(cpu) => write!(f, "system.cpu{}.dcache.cpu_side", cpu),
            PortPeer::L2Cache => write!(f, "system.l2.cpu_side"),
            PortPeer::RubySequencer(idx) => write!(f, "system.ruby.cpu_ruby_ports{}.port", idx),
            PortPeer::RubyDirectory(idx) => write!(f, "system.ruby.dir_cntrl{}.memory", idx),
            PortPeer::PhysMem => write!(f, "system.physmem.port"),
        }
    }
}

/// Where the two memory-side ports of one cpu end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CpuPorts {
    pub icache_port: PortPeer,
    pub dcache_port: PortPeer,
}

impl CpuPorts {
    pub fn split(icache_port: PortPeer, dcache_port: PortPeer) -> Self {
        Self {
            icache_port,
            dcache_port,
        }
    }

    /// Both ports bound to the same peer, e.g. an uncached bus or a sequencer.
    pub fn shared(peer: PortPeer) -> Self {
        Self::split(peer, peer)
    }
}
