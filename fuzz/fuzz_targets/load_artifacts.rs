#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The first NUL byte separates the label listing from the transition
    // listing.
    if let Some(split) = data.iter().position(|&b| b == 0) {
        if let (Ok(labels), Ok(transitions)) = (
            std::str::from_utf8(&data[..split]),
            std::str::from_utf8(&data[split + 1..]),
        ) {
            if let Ok(system) =
                ctlmc_ts::load_system(labels, transitions, ctlmc_ts::ExplorationDefault::Truncated)
            {
                if let Ok(formula) = ctlmc_syntax::parse("AG (p -> EF q)") {
                    let _ = ctlmc_check::Model::new(&system).check(&formula);
                }
            }
        }
    }
});
