#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(formula) = ctlmc_syntax::parse(s) {
            let simplified = formula.simplify();
            // Rendering must stay parseable and stable.
            assert_eq!(
                ctlmc_syntax::parse(&simplified.to_string()).ok(),
                Some(simplified)
            );
        }
    }
});
