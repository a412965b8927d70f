use clap::Parser;
use log::LevelFilter;

use crate::base::units::{Frequency, MemSize};
use crate::sim::config::{BuildEnv, NetworkTopology, TargetIsa};
use crate::sim::error::{ConfigurationError, FatalModeError};
use crate::sim::strategy::CpuVariant;
use crate::ui::{make_options, to_level_filter, SeArgs};

#[test]
fn parses_frequencies() {
    assert_eq!("2GHz".parse(), Ok(Frequency(2_000_000_000)));
    assert_eq!("500MHz".parse(), Ok(Frequency(500_000_000)));
    assert_eq!("100".parse(), Ok(Frequency(100)));
    assert!("GHz".parse::<Frequency>().is_err());
    assert!("2THz".parse::<Frequency>().is_err());
    assert_eq!(Frequency(1_500_000_000).to_string(), "1500MHz");
}

#[test]
fn parses_sizes() {
    assert_eq!("64kB".parse(), Ok(MemSize(64 << 10)));
    assert_eq!("1024MB".parse(), Ok(MemSize(1 << 30)));
    assert_eq!("2GB".parse(), Ok(MemSize(2 << 30)));
    assert!("lots".parse::<MemSize>().is_err());
    assert!("99999999999999999999GB".parse::<MemSize>().is_err());
    assert_eq!(MemSize(32 << 10).to_string(), "32kB");
}

#[test]
fn empty_config_gives_defaults() {
    let options = make_options("", None, BuildEnv::default()).unwrap();
    assert_eq!(options.system.num_cpus, 1);
    assert_eq!(options.system.cpu_type, CpuVariant::Atomic);
    assert_eq!(options.system.clock, Frequency(2_000_000_000));
    assert_eq!(options.system.mem_size, MemSize(1 << 30));
    assert!(!options.caches.caches);
    assert_eq!(options.caches.l1i_size, MemSize(32 << 10));
    assert_eq!(options.ruby.topology, NetworkTopology::Crossbar);
    assert_eq!(options.run.checkpoint_restore, None);
    assert!(options.validate().is_ok());
}

#[test]
fn toml_sections_fill_options() {
    let toml = r#"
        [system]
        num_cpus = 4
        bench = "twolf-gzip-mcf-vpr"
        cpu_type = "inorder"
        clock = "3GHz"
        mem_size = "512MB"
        fastmem = true

        [caches]
        caches = true
        l2_size = "4MB"

        [ruby]
        topology = "mesh"
        mesh_rows = 2

        [run]
        checkpoint_restore = 7
        restore_with_cpu = "timing"
    "#;
    let options = make_options(toml, None, BuildEnv::default()).unwrap();
    assert_eq!(options.system.num_cpus, 4);
    assert_eq!(options.system.bench.as_deref(), Some("twolf-gzip-mcf-vpr"));
    assert_eq!(options.system.cpu_type, CpuVariant::InOrder);
    assert_eq!(options.system.clock, Frequency(3_000_000_000));
    assert_eq!(options.system.mem_size, MemSize(512 << 20));
    assert!(options.system.fastmem);
    assert!(options.caches.caches);
    assert_eq!(options.caches.l2_size, MemSize(4 << 20));
    assert_eq!(options.caches.l1d_assoc, 2);
    assert_eq!(options.ruby.topology, NetworkTopology::Mesh);
    assert_eq!(options.run.checkpoint_restore, Some(7));
    assert_eq!(options.run.restore_with_cpu, Some(CpuVariant::Timing));
}

#[test]
fn cli_overrides_toml() {
    let toml = r#"
        [system]
        num_cpus = 4
        cpu_type = "detailed"
        cmd = "/bin/from-toml"
    "#;
    let args = SeArgs::try_parse_from([
        "sesim", "-n", "2", "--timing", "-c", "a;b", "-o", "-x 1", "--l2cache", "--mem-size",
        "256MB", "--ruby", "--topology", "pt2pt",
    ])
    .unwrap();
    let options = make_options(toml, Some(&args), BuildEnv::default()).unwrap();
    assert_eq!(options.system.num_cpus, 2);
    assert_eq!(options.system.cpu_type, CpuVariant::Timing);
    assert_eq!(options.system.cmd, Some("a;b".into()));
    assert_eq!(options.system.options, "-x 1");
    assert_eq!(options.system.mem_size, MemSize(256 << 20));
    assert!(options.system.ruby);
    assert!(options.caches.l2cache);
    assert_eq!(options.ruby.topology, NetworkTopology::Pt2pt);
}

#[test]
fn cpu_selectors_are_exclusive() {
    assert!(SeArgs::try_parse_from(["sesim", "--timing", "--detailed"]).is_err());
    assert!(SeArgs::try_parse_from(["sesim", "--inorder"]).is_ok());
}

#[test]
fn positional_arguments_are_rejected() {
    assert!(SeArgs::try_parse_from(["sesim", "stray"]).is_err());
}

#[test]
fn bad_values_are_configuration_errors() {
    let err = make_options("[system]\nclock = \"fast\"\n", None, BuildEnv::default()).unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidValue { field: "config", .. }));
    assert!(make_options("not toml at all [", None, BuildEnv::default()).is_err());
    assert!(SeArgs::try_parse_from(["sesim", "--mem-size", "big"]).is_err());
}

#[test]
fn validate_rejects_odd_cache_lines() {
    let mut options = make_options("", None, BuildEnv::default()).unwrap();
    options.caches.cacheline_size = 48;
    assert!(matches!(
        options.validate(),
        Err(ConfigurationError::InvalidValue { field: "cacheline_size", .. })
    ));
}

#[test]
fn validate_rejects_zero_associativity() {
    for field in ["l1d_assoc", "l1i_assoc", "l2_assoc"] {
        let mut options = make_options("", None, BuildEnv::default()).unwrap();
        match field {
            "l1d_assoc" => options.caches.l1d_assoc = 0,
            "l1i_assoc" => options.caches.l1i_assoc = 0,
            _ => options.caches.l2_assoc = 0,
        }
        assert_eq!(
            options.validate(),
            Err(ConfigurationError::invalid(field, "must be at least 1"))
        );
    }
}

#[test]
fn full_system_builds_are_fatal() {
    let build = BuildEnv {
        full_system: true,
        ..BuildEnv::default()
    };
    assert_eq!(build.check_syscall_emulation(), Err(FatalModeError::FullSystem));
    assert!(BuildEnv::default().check_syscall_emulation().is_ok());
}

#[test]
fn isa_picks_benchmark_os() {
    assert_eq!(TargetIsa::Alpha.os(), "tru64");
    assert_eq!(TargetIsa::X86.os(), "linux");
    assert_eq!("SPARC".parse(), Ok(TargetIsa::Sparc));
}

#[test]
fn log_levels() {
    assert_eq!(to_level_filter(None), LevelFilter::Warn);
    assert_eq!(to_level_filter(Some(1)), LevelFilter::Info);
    assert_eq!(to_level_filter(Some(2)), LevelFilter::Debug);
}

#[test]
fn shipped_config_builds() {
    use crate::sim::top::build_system;
    use crate::unit_tests::FakeRegistry;

    let options =
        make_options(include_str!("../../configs/se.toml"), None, BuildEnv::default()).unwrap();
    assert_eq!(options.run.maxtick, Some(1_000_000_000));
    let topology = build_system(&options, &FakeRegistry::new(&["twolf", "gzip"])).unwrap();
    assert_eq!(topology.cpus().len(), 2);
    assert!(topology.buses().l2bus.is_some());
}
