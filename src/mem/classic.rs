use log::debug;
use serde::Serialize;

use crate::base::port::{CpuPorts, PortPeer};
use crate::base::units::MemSize;
use crate::sim::config::CacheConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheInstance {
    pub name: String,
    pub size: MemSize,
    pub assoc: usize,
    pub block_size: u64,
    /// Where misses go.
    pub mem_side: PortPeer,
}

impl CacheInstance {
    /// `None` for a zero or overflowing way size.
    pub fn sets(&self) -> Option<u64> {
        let way = self.block_size.checked_mul(self.assoc as u64)?;
        self.size.bytes().checked_div(way)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivateCaches {
    pub icache: CacheInstance,
    pub dcache: CacheInstance,
}

/// Direct-attached cache hierarchy: optional private split L1s per cpu and an optional shared L2,
/// all in front of the memory bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassicHierarchy {
    pub config: CacheConfig,
    pub l2: Option<CacheInstance>,
    /// Indexed by cpu id; empty when L1s are disabled.
    pub l1: Vec<PrivateCaches>,
    pub cpu_ports: Vec<CpuPorts>,
}

impl ClassicHierarchy {
    pub fn build(config: &CacheConfig, num_cpus: usize) -> Self {
        let l2 = config.l2cache.then(|| CacheInstance {
            name: "l2".to_string(),
            size: config.l2_size,
            assoc: config.l2_assoc,
            block_size: config.cacheline_size,
            mem_side: PortPeer::MemBus,
        });
        // uncached ports and L1 misses both go to the first shared level
        let downstream = if l2.is_some() {
            PortPeer::L2Bus
        } else {
            PortPeer::MemBus
        };

        let mut l1 = Vec::new();
        let mut cpu_ports = Vec::with_capacity(num_cpus);
        for cpu in 0..num_cpus {
            if config.caches {
                l1.push(PrivateCaches {
                    icache: CacheInstance {
                        name: format!("cpu{}.icache", cpu),
                        size: config.l1i_size,
                        assoc: config.l1i_assoc,
                        block_size: config.cacheline_size,
                        mem_side: downstream,
                    },
                    dcache: CacheInstance {
                        name: format!("cpu{}.dcache", cpu),
                        size: config.l1d_size,
                        assoc: config.l1d_assoc,
                        block_size: config.cacheline_size,
                        mem_side: downstream,
                    },
                });
                cpu_ports.push(CpuPorts::split(PortPeer::L1ICache(cpu), PortPeer::L1DCache(cpu)));
            } else {
                cpu_ports.push(CpuPorts::shared(downstream));
            }
        }
        debug!(
            "classic hierarchy: {} private L1 pairs, shared l2: {}",
            l1.len(),
            l2.is_some()
        );

        Self {
            config: *config,
            l2,
            l1,
            cpu_ports,
        }
    }
}
