mod common;
use crate::common::init_tracing;

use std::sync::Arc;

use cmdstream::value::{self, CommandValue, FixedProvider, ValueProvider, chain, sudo};
use cmdstream::{AsyncExecutor, CommandBuilder, Scope};
use cmdstream_test_utils::fake_process::{ProcessScript, ScriptedSpawner};

#[tokio::test]
async fn literal_without_splitting_is_a_single_token() {
    init_tracing();

    let tokens = value::resolve(&CommandValue::from("hello"), false)
        .await
        .unwrap();
    assert_eq!(tokens, vec!["hello".to_string()]);

    // Even with internal whitespace, a non-splitting literal stays whole.
    let tokens = value::resolve(&CommandValue::from("hello world"), false)
        .await
        .unwrap();
    assert_eq!(tokens, vec!["hello world".to_string()]);
}

#[tokio::test]
async fn splitting_tokenizes_on_whitespace_runs() {
    init_tracing();

    let tokens = value::resolve(&CommandValue::from("a  b   c"), true)
        .await
        .unwrap();
    assert_eq!(tokens, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn blank_input_under_splitting_resolves_to_nothing() {
    init_tracing();

    let tokens = value::resolve(&CommandValue::from(""), true).await.unwrap();
    assert!(tokens.is_empty());

    let tokens = value::resolve(&CommandValue::from("   \t  "), true)
        .await
        .unwrap();
    assert!(tokens.is_empty());
}

#[tokio::test]
async fn list_values_are_pre_tokenized_and_never_resplit() {
    init_tracing();

    let list = CommandValue::from(vec!["one two".to_string(), "three".to_string()]);
    let tokens = value::resolve(&list, true).await.unwrap();
    assert_eq!(tokens, vec!["one two", "three"]);
}

#[tokio::test]
async fn provider_results_bypass_whitespace_splitting() {
    init_tracing();

    // A provider emitting a multi-word token must not be re-split, even
    // when the splitting flag is on.
    let provider = CommandValue::provider(FixedProvider::new(["run me"]));
    let tokens = value::resolve(&provider, true).await.unwrap();
    assert_eq!(tokens, vec!["run me"]);
}

#[tokio::test]
async fn chained_providers_concatenate_in_order() {
    init_tracing();

    let p: Arc<dyn ValueProvider> = Arc::new(FixedProvider::new(["a", "b"]));
    let q: Arc<dyn ValueProvider> = Arc::new(FixedProvider::new(["c"]));

    let combined = chain(p.clone(), q.clone());
    let combined_tokens = combined.resolve().await.unwrap();

    let mut expected = p.resolve().await.unwrap();
    expected.extend(q.resolve().await.unwrap());

    assert_eq!(combined_tokens, expected);
    assert_eq!(combined_tokens, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn sudo_prefixes_the_real_command() {
    init_tracing();

    let elevated = chain(sudo(), Arc::new(FixedProvider::new(["apt-get", "update"])));
    let tokens = elevated.resolve().await.unwrap();
    assert_eq!(tokens, vec!["sudo", "apt-get", "update"]);
}

#[tokio::test]
async fn full_token_list_is_command_then_flattened_arguments() {
    init_tracing();

    // Observe the resolved token list at the spawner boundary.
    let spawner = ScriptedSpawner::with_fallback(ProcessScript::success());
    let scope = Scope::current();

    CommandBuilder::new("git log", scope)
        .split_command_on_whitespace(true)
        .arg("--oneline")
        .arg(CommandValue::from(vec![
            "--author".to_string(),
            "someone with spaces".to_string(),
        ]))
        .spawner(spawner.clone())
        .build()
        .execute()
        .await
        .unwrap();

    let records = spawner.spawn_records();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].tokens,
        vec![
            "git",
            "log",
            "--oneline",
            "--author",
            "someone with spaces"
        ]
    );
}
