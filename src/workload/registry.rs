use log::debug;

use crate::sim::config::TargetIsa;
use crate::sim::error::WorkloadResolutionError;
use crate::workload::ProcessImage;

/// Named workload definitions, looked up per target ISA.
pub trait WorkloadRegistry {
    fn lookup(&self, name: &str, isa: TargetIsa) -> Option<ProcessImage>;
}

pub fn resolve(
    registry: &dyn WorkloadRegistry,
    name: &str,
    isa: TargetIsa,
) -> Result<ProcessImage, WorkloadResolutionError> {
    let image = registry
        .lookup(name, isa)
        .ok_or_else(|| WorkloadResolutionError {
            name: name.to_string(),
            isa: isa.to_string(),
        })?;
    debug!("resolved {} for {}: {:?}", name, isa, image.executable);
    Ok(image)
}
