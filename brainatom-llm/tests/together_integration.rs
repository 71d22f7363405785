//! Integration tests against the live Together API
//! Run with: cargo test -p brainatom-llm -- --ignored

#![cfg(feature = "together")]

use schemars::JsonSchema;
use serde::Deserialize;

use brainatom_core::{AskInput, JsonSchemaContract};
use brainatom_llm::{gen_brain_atom, TogetherSlug};

#[derive(Debug, Deserialize, JsonSchema)]
struct Answer {
    answer: f64,
}

#[tokio::test]
#[ignore = "Requires TOGETHER_API_KEY environment variable"]
async fn test_together_structured_answer_and_continuation() {
    let atom = gen_brain_atom(TogetherSlug::Llama3_3_70b);

    let first = atom
        .ask(
            AskInput::new("What is 2+2?", JsonSchemaContract::<Answer>::new()),
            None,
        )
        .await
        .expect("Request failed");
    assert_eq!(first.output.answer, 4.0);
    assert!(first.metrics.size.tokens.input > 0);

    let second = atom
        .ask(
            AskInput::new("Now double that.", JsonSchemaContract::<Answer>::new())
                .on_episode(first.episode.clone()),
            None,
        )
        .await
        .expect("Continuation failed");
    assert_eq!(second.output.answer, 8.0);
    assert_eq!(second.episode.exchanges.len(), 2);
}
