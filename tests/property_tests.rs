//! Property-based tests for fanout_logger using proptest

use fanout_logger::core::classify_message;
use fanout_logger::prelude::*;
use fanout_logger::{MemoryBuffer, SharedWriter};
use proptest::prelude::*;
use std::sync::Arc;

fn severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Debug),
        Just(Severity::Info),
        Just(Severity::Warning),
        Just(Severity::Error),
        Just(Severity::Fatal),
    ]
}

// ============================================================================
// Severity Tests
// ============================================================================

proptest! {
    /// Unknown numeric codes fall back to info; known ones keep their rank
    #[test]
    fn test_from_code_total(code in any::<u8>()) {
        let severity = Severity::from_code(code);
        if code <= 4 {
            prop_assert_eq!(severity.rank(), code);
        } else {
            prop_assert_eq!(severity, Severity::Info);
        }
    }

    /// Names and single characters parse back to the same severity
    #[test]
    fn test_severity_str_roundtrip(level in severity()) {
        prop_assert_eq!(level.to_str().parse::<Severity>().unwrap(), level);
        prop_assert_eq!(level.as_char().to_string().parse::<Severity>().unwrap(), level);
    }
}

// ============================================================================
// Dispatch Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A console sink sees exactly the events at or above the threshold
    #[test]
    fn test_threshold_acceptance(threshold in severity(), levels in prop::collection::vec(severity(), 0..20)) {
        let buffer = MemoryBuffer::new();
        let mut logger = Logger::new("prop", "development", threshold);
        logger.install_sink(
            "stdout",
            Arc::new(ConsoleSink::with_writer("stdout", SharedWriter::memory(&buffer))),
        );

        let mut expected = 0;
        for level in &levels {
            let accepted = logger.log(*level, "m");
            prop_assert_eq!(accepted, level.rank() >= threshold.rank());
            if accepted {
                expected += 1;
            }
        }

        prop_assert_eq!(buffer.lines().len(), expected);
        prop_assert_eq!(logger.metrics().filtered() as usize, levels.len() - expected);
    }

    /// Two or more text arguments always collapse to one space-joined string
    #[test]
    fn test_multiple_args_collapse(words in prop::collection::vec("[a-z]{1,8}", 2..6)) {
        let message = Message::Args(words.iter().map(|w| Arg::from(w.as_str())).collect());
        let msg = classify_message(&message).unwrap();
        prop_assert_eq!(msg, serde_json::json!({ "str": words.join(" ") }));
    }

    /// Any finite float survives as a float record
    #[test]
    fn test_finite_float_classification(value in -1.0e12f64..1.0e12) {
        let msg = classify_message(&Message::from(value)).unwrap();
        prop_assert_eq!(msg["float"].as_f64(), Some(value));
    }
}
