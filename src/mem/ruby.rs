use log::debug;
use serde::Serialize;

use crate::base::port::{CpuPorts, PortPeer};
use crate::base::units::{Frequency, MemSize};
use crate::sim::config::NetworkTopology;
use crate::sim::error::ConfigurationError;
use crate::sim::strategy::ProtocolConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    Simple,
    Garnet,
}

/// Directory controller owning one slice of physical memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directory {
    pub id: usize,
    pub size: MemSize,
    /// Port the directory's memory slice is reached through.
    pub mem_side: PortPeer,
}

/// Message-based coherence fabric. Cpus reach memory through one sequencer each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RubySystem {
    pub protocol: String,
    pub clock: Frequency,
    pub network: NetworkKind,
    pub topology: NetworkTopology,
    /// Rows of the mesh; only meaningful for `NetworkTopology::Mesh`.
    pub mesh_rows: usize,
    pub num_l2caches: usize,
    pub directories: Vec<Directory>,
    pub cpu_ports: Vec<CpuPorts>,
}

impl RubySystem {
    pub fn build(
        config: &ProtocolConfig,
        num_cpus: usize,
        physmem_size: MemSize,
    ) -> Result<Self, ConfigurationError> {
        let network = &config.network;
        if network.num_dirs == 0 {
            return Err(ConfigurationError::invalid("num_dirs", "must be at least 1"));
        }
        if network.num_l2caches == 0 {
            return Err(ConfigurationError::invalid("num_l2caches", "must be at least 1"));
        }
        if network.topology == NetworkTopology::Mesh {
            check_mesh(num_cpus, network.mesh_rows)?;
        }

        let num_dirs = network.num_dirs as u64;
        let dir_size = MemSize(physmem_size.bytes() / num_dirs);
        // the last directory also takes the remainder
        let last_size = MemSize(dir_size.bytes() + physmem_size.bytes() % num_dirs);
        let directories = (0..network.num_dirs)
            .map(|id| Directory {
                id,
                size: if id + 1 == network.num_dirs { last_size } else { dir_size },
                mem_side: PortPeer::RubyDirectory(id),
            })
            .collect();
        let cpu_ports = (0..num_cpus)
            .map(|seq| CpuPorts::shared(PortPeer::RubySequencer(seq)))
            .collect();
        debug!(
            "{} network: {} sequencers, {} directories of {}",
            config.protocol, num_cpus, network.num_dirs, dir_size
        );

        Ok(Self {
            protocol: config.protocol.clone(),
            clock: network.clock,
            network: if network.garnet {
                NetworkKind::Garnet
            } else {
                NetworkKind::Simple
            },
            topology: network.topology,
            mesh_rows: network.mesh_rows,
            num_l2caches: network.num_l2caches,
            directories,
            cpu_ports,
        })
    }
}

/// One router per cpu, laid out in `rows` equal rows.
fn check_mesh(num_routers: usize, rows: usize) -> Result<(), ConfigurationError> {
    if rows == 0 || rows > num_routers || num_routers % rows != 0 {
        return Err(ConfigurationError::invalid(
            "mesh_rows",
            format!("{} rows cannot evenly hold {} routers", rows, num_routers),
        ));
    }
    Ok(())
}
