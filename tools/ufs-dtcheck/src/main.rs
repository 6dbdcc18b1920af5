//! Host-side checker for UFS platform device descriptions.
//!
//! Usage:
//!   ufs-dtcheck probe <board.toml>                 - Probe, print the adapter, detach
//!   ufs-dtcheck probe <board.toml> --fail-init -5  - Exercise the rollback path
//!   ufs-dtcheck roles                              - Print the regulator role table
//!
//! `-v`, `-vv` and `-vvv` raise the log level to info, debug and trace.

mod board;
mod cli;
mod dryrun;

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use hadron_ufs_pltfrm::log::{self, LogLevel, Record};
use hadron_ufs_pltfrm::regulator::{RegulatorRole, VoltageRange};
use hadron_ufs_pltfrm::resource::Slot;
use hadron_ufs_pltfrm::{HbaVariant, UfsError, UfsHba, UfsPltfrm};

use crate::board::BoardFile;
use crate::cli::{Cli, Command, ProbeArgs};
use crate::dryrun::{DryRunCore, DryRunPlatform};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Probe(ref args) => cmd_probe(args),
        Command::Roles => {
            cmd_roles();
            Ok(())
        }
    }
}

fn stderr_sink(record: &Record<'_>) {
    eprintln!("[{}] {}", record.level.name(), record.args);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LogLevel::Warn,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };
    log::set_max_level(level);
    log::set_log_fn(stderr_sink);
}

// ===========================================================================
// probe
// ===========================================================================

fn cmd_probe(args: &ProbeArgs) -> Result<()> {
    let board = BoardFile::load(&args.board)?;
    let fail_init = args
        .fail_init
        .map(|errno| UfsError::from_errno(errno).ok_or_else(|| anyhow!("--fail-init must be nonzero")))
        .transpose()?;

    let core = DryRunCore::new(fail_init);
    let glue = match &args.variant {
        // Adapters hold `&'static HbaVariant`.
        Some(name) => {
            let name: &'static str = Box::leak(name.clone().into_boxed_str());
            UfsPltfrm::with_variant(core, Box::leak(Box::new(HbaVariant { name })))
        }
        None => UfsPltfrm::new(core),
    };

    let pdev = DryRunPlatform::new(&board);
    let mut seq = glue.sequence(&pdev);
    let result = seq.run();

    let hba = match result {
        Ok(hba) => hba,
        Err(err) => {
            println!("probe of {} aborted: {err}", board.name);
            println!("released, most recent first:");
            for entry in seq.released() {
                println!("  {entry}");
            }
            print_trace(&pdev);
            bail!("probe failed with status {}", err.errno());
        }
    };

    print_adapter(&hba);
    drop(hba);

    glue.remove(&pdev)
        .map_err(|err| anyhow!("detach failed: {err} ({})", err.errno()))?;
    print_trace(&pdev);
    if pdev.outstanding() != 0 {
        bail!("{} claims still outstanding after detach", pdev.outstanding());
    }
    println!("detached cleanly");
    Ok(())
}

fn print_adapter(hba: &UfsHba) {
    println!("adapter {}", hba.dev_name);
    if let Some(variant) = hba.variant {
        println!("  variant      {}", variant.name);
    }
    if let (Some(mmio), Some(irq)) = (hba.mmio, hba.irq) {
        println!(
            "  mmio         {:#x}+{:#x}, irq {}",
            mmio.phys_base(),
            mmio.size(),
            irq.irq()
        );
    }

    if hba.clocks.is_empty() {
        println!("  clocks       none (externally managed)");
    }
    for clk in &hba.clocks {
        println!(
            "  clock        {:<16} {} - {} Hz",
            clk.name, clk.min_freq, clk.max_freq
        );
    }

    for role in RegulatorRole::ALL {
        match hba.vreg_info.get(role) {
            None => println!("  supply       {:<8} always-on", role.name()),
            Some(vreg) if vreg.is_fixed() => println!("  supply       {:<8} fixed", role.name()),
            Some(vreg) => println!(
                "  supply       {:<8} {} load {}-{} uA{}",
                role.name(),
                vreg.voltage.map_or_else(|| String::from("any voltage"), format_range),
                vreg.min_ua,
                vreg.max_ua,
                if vreg.low_voltage_sup() { ", low-voltage" } else { "" }
            ),
        }
    }

    println!("  core_reset   {}", slot_state(&hba.core_reset));
    println!("  pinctrl      {}", slot_state(&hba.pinctrl));
    println!("  extcon       {}", slot_state(&hba.extcon));

    let t = &hba.tuning;
    println!("  ref clk      {} Hz", t.dev_ref_clk_freq.hz());
    println!("  pm levels    rpm {} spm {}", t.pm_levels.rpm, t.pm_levels.spm);
    println!(
        "  gear limits  hs tx {} rx {}, pwm tx {} rx {}",
        t.gear_limits.tx_hs, t.gear_limits.rx_hs, t.gear_limits.tx_pwm, t.gear_limits.rx_pwm
    );
    println!("  cmd timeout  {}", t.scsi_cmd_timeout);
    println!("  force g4     {}", t.force_g4);
    println!("  lanes        {}", t.lanes_per_direction);
}

fn print_trace(pdev: &DryRunPlatform) {
    println!("platform trace:");
    for event in pdev.trace() {
        println!("  {event}");
    }
}

fn slot_state<T>(slot: &Slot<T>) -> String {
    match slot {
        Slot::Held(_) => String::from("held"),
        Slot::Absent => String::from("absent"),
        Slot::Unavailable(err) => format!("unavailable ({err})"),
    }
}

fn format_range(range: VoltageRange) -> String {
    format!(
        "{:.2}-{:.2} V",
        f64::from(range.min_uv) / 1e6,
        f64::from(range.max_uv) / 1e6
    )
}

// ===========================================================================
// roles
// ===========================================================================

fn cmd_roles() {
    println!("{:<8} {:<14} {}", "role", "default", "properties");
    for role in RegulatorRole::ALL {
        let range = role
            .default_range()
            .map_or_else(|| String::from("-"), format_range);
        println!(
            "{:<8} {:<14} {0}-supply, {0}-max-microamp, {0}-min-microamp, {0}-fixed-regulator",
            role.name(),
            range
        );
    }
}
