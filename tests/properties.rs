//! Property tests for the resolution and diff-snapshot algebra.

use std::sync::Arc;

use proptest::prelude::*;

use cmdstream::value::{self, CommandValue, FixedProvider, ValueProvider, chain};
use cmdstream::{AsyncExecutor, CommandBuilder, Scope};
use cmdstream_test_utils::fake_process::{ProcessScript, ScriptedSpawner};
use cmdstream_test_utils::recorders::RecordingObserver;

fn fixed(values: &[String]) -> Arc<dyn ValueProvider> {
    Arc::new(FixedProvider::new(values.iter().cloned()))
}

proptest! {
    #[test]
    fn chained_resolution_is_ordered_concatenation(
        a in proptest::collection::vec("[a-z0-9 ]{0,12}", 0..6),
        b in proptest::collection::vec("[a-z0-9 ]{0,12}", 0..6),
    ) {
        let combined = chain(fixed(&a), fixed(&b));
        let resolved = futures::executor::block_on(combined.resolve()).unwrap();

        let mut expected = a.clone();
        expected.extend(b.clone());
        prop_assert_eq!(resolved, expected);
    }

    #[test]
    fn chaining_is_associative(
        a in proptest::collection::vec("[a-z]{1,6}", 0..4),
        b in proptest::collection::vec("[a-z]{1,6}", 0..4),
        c in proptest::collection::vec("[a-z]{1,6}", 0..4),
    ) {
        let left = chain(chain(fixed(&a), fixed(&b)), fixed(&c));
        let right = chain(fixed(&a), chain(fixed(&b), fixed(&c)));

        let left = futures::executor::block_on(left.resolve()).unwrap();
        let right = futures::executor::block_on(right.resolve()).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn splitting_a_whitespace_joined_literal_recovers_the_tokens(
        tokens in proptest::collection::vec("[a-z]{1,8}", 0..6),
    ) {
        let literal = CommandValue::from(tokens.join("  "));
        let resolved =
            futures::executor::block_on(value::resolve(&literal, true)).unwrap();
        prop_assert_eq!(resolved, tokens);
    }
}

proptest! {
    // Each case spins up a runtime and a fake process; keep the count low.
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn diffs_reconstruct_totals_for_arbitrary_output(
        lines in proptest::collection::vec("[a-z0-9 ]{0,16}", 0..8),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let outputs = rt.block_on(async {
            let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
            let spawner = ScriptedSpawner::with_fallback(
                ProcessScript::success().with_stdout_lines(&line_refs),
            );
            let observer = RecordingObserver::new("out");

            CommandBuilder::new("fake-prop", Scope::current())
                .on_stdout(observer.clone())
                .spawner(spawner)
                .build()
                .execute()
                .await
                .unwrap();

            observer.outputs()
        });

        // One emission per line, each diff a suffix of its total.
        prop_assert_eq!(outputs.len(), lines.len());
        for (i, output) in outputs.iter().enumerate() {
            prop_assert_eq!(&output.total_lines[..], &lines[..=i]);
            prop_assert_eq!(&output.diff_lines[..], &lines[i..=i]);
        }

        let concatenated: Vec<String> =
            outputs.iter().flat_map(|o| o.diff_lines.clone()).collect();
        prop_assert_eq!(concatenated, lines);
    }
}
