use log::{debug, info};
use serde::Serialize;

use crate::base::port::{CpuPorts, PortPeer};
use crate::base::units::{Frequency, MemSize};
use crate::mem::classic::ClassicHierarchy;
use crate::mem::ruby::RubySystem;
use crate::mem::{Bus, BusTopology, MemorySubsystem};
use crate::sim::config::SeOptions;
use crate::sim::error::{ConfigurationError, SeResult};
use crate::sim::strategy::{self, CpuVariant, MemMode, MemoryStrategy, Selection};
use crate::workload::registry::WorkloadRegistry;
use crate::workload::{bind_workloads, Workload, WorkloadMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CpuDescriptor {
    pub id: usize,
    pub clock: Frequency,
    pub num_threads: usize,
    pub variant: CpuVariant,
    pub ports: CpuPorts,
    /// Direct port into physical memory, only ever present on cpu 0.
    pub physmem_port: Option<PortPeer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhysicalMemory {
    pub size: MemSize,
    /// `None` when the coherence directories own the backing store.
    pub port: Option<PortPeer>,
}

/// A fully wired machine. Read-only once assembled; the run step takes it as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemTopology {
    cpus: Vec<CpuDescriptor>,
    workloads: WorkloadMap,
    memory: MemorySubsystem,
    physmem: PhysicalMemory,
    buses: BusTopology,
    mem_mode: MemMode,
    future_variant: Option<CpuVariant>,
}

impl SystemTopology {
    pub fn cpus(&self) -> &[CpuDescriptor] {
        &self.cpus
    }

    pub fn workload(&self, cpu_id: usize) -> Option<&Workload> {
        self.workloads.get(&cpu_id)
    }

    pub fn workloads(&self) -> &WorkloadMap {
        &self.workloads
    }

    pub fn memory(&self) -> &MemorySubsystem {
        &self.memory
    }

    pub fn physmem(&self) -> &PhysicalMemory {
        &self.physmem
    }

    pub fn buses(&self) -> &BusTopology {
        &self.buses
    }

    pub fn mem_mode(&self) -> MemMode {
        self.mem_mode
    }

    pub fn future_variant(&self) -> Option<CpuVariant> {
        self.future_variant
    }
}

/// Assemble `num_cpus` cpus of the selected variant around the selected memory strategy.
///
/// Every id in `[0, num_cpus)` must be bound in `workloads` and nothing else may be.
pub fn assemble(
    num_cpus: usize,
    selection: &Selection,
    clock: Frequency,
    workloads: WorkloadMap,
    physmem_size: MemSize,
    fastmem: bool,
) -> Result<SystemTopology, ConfigurationError> {
    if num_cpus == 0 {
        return Err(ConfigurationError::NoCpus);
    }
    if let Some(id) = (0..num_cpus).find(|id| !workloads.contains_key(id)) {
        return Err(ConfigurationError::UnboundCpu(id));
    }
    if let Some(&id) = workloads.keys().find(|&&id| id >= num_cpus) {
        return Err(ConfigurationError::UnknownCpu(id));
    }

    let memory = match &selection.memory {
        MemoryStrategy::Classic(caches) => {
            MemorySubsystem::Classic(ClassicHierarchy::build(caches, num_cpus))
        }
        MemoryStrategy::Coherent(protocol) => {
            MemorySubsystem::Coherent(RubySystem::build(protocol, num_cpus, physmem_size)?)
        }
    };
    let ports = memory.cpu_ports();
    if ports.len() != num_cpus {
        return Err(ConfigurationError::PortCountMismatch {
            ports: ports.len(),
            cpus: num_cpus,
        });
    }

    let cpus: Vec<CpuDescriptor> = workloads
        .iter()
        .zip(ports)
        .map(|((&id, workload), &ports)| {
            debug!(
                "cpu{}: icache_port -> {}, dcache_port -> {}",
                id, ports.icache_port, ports.dcache_port
            );
            CpuDescriptor {
                id,
                clock,
                num_threads: workload.thread_count(),
                variant: selection.cpu_variant,
                ports,
                physmem_port: (fastmem && id == 0).then_some(PortPeer::PhysMem),
            }
        })
        .collect();

    let (physmem_port, membus, l2bus) = match &memory {
        MemorySubsystem::Classic(hierarchy) => (
            Some(PortPeer::MemBus),
            Bus::new("membus", Some(PortPeer::PhysMem)),
            hierarchy
                .l2
                .as_ref()
                .map(|_| Bus::new("tol2bus", Some(PortPeer::L2Cache))),
        ),
        MemorySubsystem::Coherent(_) => (None, Bus::new("membus", None), None),
    };

    info!(
        "assembled {} x {} @ {} ({:?} memory, {}), {} of physical memory",
        num_cpus,
        selection.cpu_variant,
        clock,
        selection.mem_mode,
        if memory.is_coherent() { "coherent" } else { "classic" },
        physmem_size
    );

    Ok(SystemTopology {
        cpus,
        workloads,
        memory,
        physmem: PhysicalMemory {
            size: physmem_size,
            port: physmem_port,
        },
        buses: BusTopology { membus, l2bus },
        mem_mode: selection.mem_mode,
        future_variant: selection.future_variant,
    })
}

/// Options in, topology out: workloads, then strategy, then assembly.
pub fn build_system(options: &SeOptions, registry: &dyn WorkloadRegistry) -> SeResult<SystemTopology> {
    options.validate()?;
    let workloads = bind_workloads(options, registry)?;
    let selection = strategy::select(options)?;
    let topology = assemble(
        options.system.num_cpus,
        &selection,
        options.system.clock,
        workloads,
        options.system.mem_size,
        options.system.fastmem,
    )?;
    Ok(topology)
}
