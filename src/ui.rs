use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use toml::Table;

use crate::base::units::{Frequency, MemSize};
use crate::sim::config::{
    BuildEnv, CacheConfig, Config, NetworkTopology, RubyConfig, RunConfig, SeOptions, SystemConfig,
};
use crate::sim::error::ConfigurationError;
use crate::sim::strategy::CpuVariant;

#[derive(Parser, Debug, Default)]
#[command(version, about = "Build a syscall-emulation multiprocessor system")]
pub struct SeArgs {
    #[arg(long, help = "Path to config.toml")]
    pub config: Option<PathBuf>,
    #[arg(short, long, help = "Number of cpus")]
    pub num_cpus: Option<usize>,
    #[arg(short, long, help = "Benchmarks to run, one per cpu, separated by '-'")]
    pub bench: Option<String>,
    #[arg(short, long, help = "The binary to run; separate SMT threads with ';'")]
    pub cmd: Option<PathBuf>,
    #[arg(short, long, allow_hyphen_values = true, help = "The options to pass to the binary")]
    pub options: Option<String>,
    #[arg(short, long, help = "Read stdin from a file")]
    pub input: Option<String>,
    #[arg(long, help = "Redirect stdout to a file")]
    pub output: Option<String>,
    #[arg(long, help = "Redirect stderr to a file")]
    pub errout: Option<String>,

    #[arg(long, group = "cpu", help = "Use the timing cpu")]
    pub timing: bool,
    #[arg(long, group = "cpu", help = "Use the detailed (out-of-order) cpu")]
    pub detailed: bool,
    #[arg(long, group = "cpu", help = "Use the in-order cpu")]
    pub inorder: bool,
    #[arg(long, help = "Cpu clock, e.g. 2GHz")]
    pub clock: Option<Frequency>,

    #[arg(long, help = "Give every cpu private L1 caches")]
    pub caches: bool,
    #[arg(long, help = "Add a shared L2 cache")]
    pub l2cache: bool,
    #[arg(long)]
    pub l1d_size: Option<MemSize>,
    #[arg(long)]
    pub l1i_size: Option<MemSize>,
    #[arg(long)]
    pub l2_size: Option<MemSize>,
    #[arg(long)]
    pub l1d_assoc: Option<usize>,
    #[arg(long)]
    pub l1i_assoc: Option<usize>,
    #[arg(long)]
    pub l2_assoc: Option<usize>,
    #[arg(long)]
    pub cacheline_size: Option<u64>,

    #[arg(long, help = "Use the coherence protocol network instead of the classic caches")]
    pub ruby: bool,
    #[arg(long)]
    pub num_dirs: Option<usize>,
    #[arg(long)]
    pub num_l2caches: Option<usize>,
    #[arg(long, value_enum)]
    pub topology: Option<NetworkTopology>,
    #[arg(long)]
    pub mesh_rows: Option<usize>,
    #[arg(long, help = "Use the garnet network model")]
    pub garnet: bool,

    #[arg(long, help = "Give cpu 0 a direct port into physical memory")]
    pub fastmem: bool,
    #[arg(long, help = "Physical memory size, e.g. 1024MB")]
    pub mem_size: Option<MemSize>,
    #[arg(long, help = "Root of the SPEC CPU2000 binaries and inputs")]
    pub spec_root: Option<PathBuf>,
    #[arg(long, help = "SPEC input set (ref, train, test, smred, ...)")]
    pub input_set: Option<String>,

    #[arg(short, long, help = "Run to absolute simulated tick")]
    pub maxtick: Option<u64>,
    #[arg(long, help = "Restore from checkpoint <N>")]
    pub checkpoint_restore: Option<u64>,
    #[arg(long, value_enum, help = "Cpu to use while restoring a checkpoint")]
    pub restore_with_cpu: Option<CpuVariant>,

    #[arg(long, help = "Enable log at level (0:warn, 1:info, 2:debug)")]
    pub log: Option<u64>,
    #[arg(long, help = "Pretty-print the topology report")]
    pub pretty: bool,
}

impl SeArgs {
    fn cpu_type(&self) -> Option<CpuVariant> {
        if self.timing {
            Some(CpuVariant::Timing)
        } else if self.detailed {
            Some(CpuVariant::Detailed)
        } else if self.inorder {
            Some(CpuVariant::InOrder)
        } else {
            None
        }
    }
}

pub fn to_level_filter(level: Option<u64>) -> LevelFilter {
    match level {
        None | Some(0) => LevelFilter::Warn,
        Some(1) => LevelFilter::Info,
        Some(_) => LevelFilter::Debug,
    }
}

/// Make the merged options from the TOML configuration.
/// If `cli_args` is given, override TOML options with CLI arguments.
pub fn make_options(
    toml_string: &str,
    cli_args: Option<&SeArgs>,
    build: BuildEnv,
) -> Result<SeOptions, ConfigurationError> {
    let config_table: Table = toml::from_str(toml_string)
        .map_err(|e| ConfigurationError::invalid("config", e.message()))?;
    let mut system = SystemConfig::from_section(config_table.get("system"))?;
    let mut caches = CacheConfig::from_section(config_table.get("caches"))?;
    let mut ruby = RubyConfig::from_section(config_table.get("ruby"))?;
    let mut run = RunConfig::from_section(config_table.get("run"))?;

    // override toml configs with CLI args
    if let Some(args) = cli_args {
        system.num_cpus = args.num_cpus.unwrap_or(system.num_cpus);
        system.bench = args.bench.clone().or(system.bench);
        system.cmd = args.cmd.clone().or(system.cmd);
        system.options = args.options.clone().unwrap_or(system.options);
        system.input = args.input.clone().unwrap_or(system.input);
        system.output = args.output.clone().unwrap_or(system.output);
        system.errout = args.errout.clone().unwrap_or(system.errout);
        system.cpu_type = args.cpu_type().unwrap_or(system.cpu_type);
        system.clock = args.clock.unwrap_or(system.clock);
        system.mem_size = args.mem_size.unwrap_or(system.mem_size);
        system.fastmem |= args.fastmem;
        system.ruby |= args.ruby;
        system.spec_root = args.spec_root.clone().unwrap_or(system.spec_root);
        system.input_set = args.input_set.clone().unwrap_or(system.input_set);

        caches.caches |= args.caches;
        caches.l2cache |= args.l2cache;
        caches.l1d_size = args.l1d_size.unwrap_or(caches.l1d_size);
        caches.l1i_size = args.l1i_size.unwrap_or(caches.l1i_size);
        caches.l2_size = args.l2_size.unwrap_or(caches.l2_size);
        caches.l1d_assoc = args.l1d_assoc.unwrap_or(caches.l1d_assoc);
        caches.l1i_assoc = args.l1i_assoc.unwrap_or(caches.l1i_assoc);
        caches.l2_assoc = args.l2_assoc.unwrap_or(caches.l2_assoc);
        caches.cacheline_size = args.cacheline_size.unwrap_or(caches.cacheline_size);

        ruby.num_dirs = args.num_dirs.unwrap_or(ruby.num_dirs);
        ruby.num_l2caches = args.num_l2caches.unwrap_or(ruby.num_l2caches);
        ruby.topology = args.topology.unwrap_or(ruby.topology);
        ruby.mesh_rows = args.mesh_rows.unwrap_or(ruby.mesh_rows);
        ruby.garnet |= args.garnet;

        run.maxtick = args.maxtick.or(run.maxtick);
        run.checkpoint_restore = args.checkpoint_restore.or(run.checkpoint_restore);
        run.restore_with_cpu = args.restore_with_cpu.or(run.restore_with_cpu);
    }

    Ok(SeOptions {
        build,
        system,
        caches,
        ruby,
        run,
    })
}
