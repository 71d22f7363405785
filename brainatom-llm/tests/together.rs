#![cfg(feature = "together")]

use httpmock::prelude::*;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use brainatom_core::{
    ask, AskInput, BrainError, Cash, CashRates, ChatTransport, Domain, JsonSchemaContract,
    PricingTable,
};
use brainatom_llm::{
    find_brain_atom, gen_brain_atom, get_brain_atoms, TogetherCatalog, TogetherClient,
    TogetherSlug, TOGETHER_API_KEY_ENV,
};

#[derive(Debug, Deserialize, JsonSchema, PartialEq)]
struct Answer {
    answer: f64,
}

fn completion(content: &str, id: &str, prompt_tokens: u64, completion_tokens: u64) -> serde_json::Value {
    json!({
        "id": id,
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}],
        "usage": {"prompt_tokens": prompt_tokens, "completion_tokens": completion_tokens}
    })
}

#[test]
fn get_brain_atoms_returns_all_ten() {
    let atoms = get_brain_atoms();
    assert_eq!(atoms.len(), 10);
    assert!(atoms.iter().all(|atom| atom.repo == "together"));

    let slugs: Vec<_> = atoms.iter().map(|atom| atom.slug()).collect();
    assert!(slugs.contains(&"together/qwen3/coder-next"));
    assert!(slugs.contains(&"together/glm/4.7"));
}

#[test]
fn gen_brain_atom_carries_slug_and_spec() {
    let atom = gen_brain_atom(TogetherSlug::Qwen3CoderNext);
    assert_eq!(atom.slug(), "together/qwen3/coder-next");
    assert_eq!(atom.repo, "together");
    assert_eq!(atom.descriptor.model, "Qwen/Qwen3-Coder-Next-FP8");
    assert_eq!(atom.spec().gain.context_tokens, 262_000);
    assert_eq!(atom.spec().gain.grades.swe, Some(74.2));
    assert_eq!(atom.spec().gain.domain, Domain::Software);
    assert_eq!(
        atom.spec().cost.cash,
        CashRates::per_million_tokens("$0.50", "$1.20").unwrap()
    );
}

#[test]
fn find_brain_atom_resolves_through_catalog() {
    let atom = find_brain_atom("together/glm/4.7").unwrap();
    assert_eq!(atom.repo, "together");
    assert_eq!(atom.model(), "zai-org/GLM-4.7");
    assert_eq!(atom.descriptor, TogetherSlug::Glm4_7.descriptor());

    let err = find_brain_atom("together/glm/9").unwrap_err();
    assert!(matches!(err, BrainError::UnknownModel(slug) if slug == "together/glm/9"));
}

#[test]
fn catalog_lookup_matches_slugs() {
    let catalog = TogetherCatalog::new();
    assert_eq!(catalog.descriptors().len(), 10);

    let r1 = catalog.lookup("together/deepseek/r1").expect("deepseek r1");
    assert_eq!(r1.model, "deepseek-ai/DeepSeek-R1");
    assert_eq!(r1.spec.cost.cash.input, Cash::per_million("$3.00").unwrap());
    assert_eq!(r1.spec.cost.cash.output, Cash::per_million("$7.00").unwrap());
    assert_eq!(r1.spec.cost.cash.cache.get, Cash::ZERO);

    assert!(catalog.lookup("together/unknown").is_none());
}

#[test]
fn slug_parse_rejects_unknown_models() {
    let err = "openai/gpt-4o".parse::<TogetherSlug>().unwrap_err();
    assert!(matches!(err, BrainError::UnknownModel(_)));
    assert_eq!(
        "together/kimi/k2.5".parse::<TogetherSlug>().unwrap(),
        TogetherSlug::KimiK2_5
    );
}

#[tokio::test]
async fn two_plus_two_through_http_client() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer test-key")
            .json_body_partial(
                r#"{"model": "meta-llama/Llama-3.3-70B-Instruct-Turbo",
                    "messages": [{"role": "user", "content": "What is 2+2?"}],
                    "response_format": {"type": "json_schema", "json_schema": {"name": "response", "strict": true}}}"#,
            );
        then.status(200)
            .json_body(completion("{\"answer\": 4}", "resp-1", 10, 3));
    });

    let mut descriptor = TogetherSlug::Llama3_3_70b.descriptor();
    descriptor.spec.cost.cash = CashRates::per_million_tokens("$1", "$2").unwrap();
    let transport = TogetherClient::with_base_url("test-key", server.url("/v1")).unwrap();

    let result = ask(
        &descriptor,
        &transport,
        AskInput::new("What is 2+2?", JsonSchemaContract::<Answer>::new()),
    )
    .await
    .unwrap();

    assert_eq!(result.output, Answer { answer: 4.0 });
    assert_eq!(result.metrics.cost.cash.to_string(), "$0.000016");
    assert_eq!(result.episode.exchanges.len(), 1);
    assert_eq!(result.episode.exchanges[0].input, "What is 2+2?");
    assert_eq!(result.episode.exchanges[0].output, "{\"answer\": 4}");
    assert_eq!(result.episode.exid.as_deref(), Some("resp-1"));
    mock.assert();
}

#[tokio::test]
async fn atom_prices_with_catalog_rates() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200)
            .json_body(completion("{\"answer\": 4}", "resp-9", 10, 3));
    });

    let atom = gen_brain_atom(TogetherSlug::Llama3_3_70b);
    let transport: Arc<dyn ChatTransport> =
        Arc::new(TogetherClient::with_base_url("test-key", server.url("/v1")).unwrap());

    let result = atom
        .ask(
            AskInput::new("What is 2+2?", JsonSchemaContract::<Answer>::new()),
            Some(transport),
        )
        .await
        .unwrap();

    // 13 tokens at $0.88 per million
    assert_eq!(result.metrics.cost.cash, Cash::parse("$0.00001144").unwrap());
}

#[tokio::test]
async fn http_failure_reaches_caller_as_provider_call_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(401)
            .json_body(json!({"error": {"message": "invalid api key", "type": "auth"}}));
    });

    let atom = gen_brain_atom(TogetherSlug::KimiK2);
    let transport: Arc<dyn ChatTransport> =
        Arc::new(TogetherClient::with_base_url("bad-key", server.url("/v1")).unwrap());

    let err = atom
        .ask(
            AskInput::new("hi", JsonSchemaContract::<Answer>::new()),
            Some(transport),
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid api key"), "{err}");
}

#[tokio::test]
async fn default_transport_requires_api_key() {
    if std::env::var(TOGETHER_API_KEY_ENV).is_ok() {
        return;
    }

    let err = gen_brain_atom(TogetherSlug::Glm4_7)
        .ask(AskInput::new("hi", JsonSchemaContract::<Answer>::new()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, BrainError::InvalidConfig(ref msg) if msg.contains(TOGETHER_API_KEY_ENV)));
}
