//! The `run` command: scan the output tree and process one batch.

use anyhow::Result;

use crate::asset::{extra_assets, scan_collection};
use crate::cli::RunArgs;
use crate::config::RestampConfig;
use crate::core::{Profile, RunPhase};
use crate::utils::plural_count;
use crate::{debug, log, logger, pipeline};

/// Execute one fingerprinting run.
///
/// The exit status only reflects IO and config failures; unresolved
/// references are printed in the report and never fail the build.
pub fn run(args: &RunArgs, config: &RestampConfig) -> Result<()> {
    logger::set_verbose(args.verbose);

    let profile = Profile::from_label(&args.profile);
    let phase = if args.precompile {
        RunPhase::Precompile
    } else {
        RunPhase::Normal
    };

    if phase.is_precompile() {
        debug!("run"; "precompile sub-phase, nothing to do");
        return Ok(());
    }

    let mut collection = scan_collection(config)?;
    let mut extra = extra_assets(config);
    log!(
        "scan";
        "{} compiled, {} public, {} extra",
        collection.compiled.len(),
        collection.public.len(),
        extra.len()
    );

    let report = pipeline::run(&mut collection, &mut extra, config, profile, phase)?;

    if report.is_clean() {
        log!(
            "done";
            "processed {}, all references resolved",
            plural_count(collection.len() + extra.len(), "file")
        );
    } else {
        report.print();
        log!("done"; "{}", report);
    }
    Ok(())
}
