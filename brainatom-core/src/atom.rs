use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::brief::{cast_briefs_to_prompt, Brief};
use crate::contract::{parse_response, OutputContract};
use crate::episode::{continue_chain, ContinuationInput, Episode, Exchange, Series};
use crate::invoke::invoke_provider;
use crate::message::compose_messages;
use crate::metrics::{calc_metrics, Metrics, MetricsInput};
use crate::{BrainError, BrainSpec, ChatRequest, ChatTransport, ModelDescriptor, PricingTable};

/// Builds the transport an atom falls back to when the caller injects none.
pub type TransportFactory =
    Arc<dyn Fn() -> Result<Arc<dyn ChatTransport>, BrainError> + Send + Sync>;

/// Prior context to continue from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct On {
    pub episode: Option<Episode>,
    pub series: Option<Series>,
}

pub struct AskInput<C> {
    pub on: On,
    pub briefs: Vec<Brief>,
    pub prompt: String,
    pub schema: C,
    pub track_series: bool,
}

impl<C> AskInput<C> {
    pub fn new(prompt: impl Into<String>, schema: C) -> Self {
        Self {
            on: On::default(),
            briefs: Vec::new(),
            prompt: prompt.into(),
            schema,
            track_series: false,
        }
    }

    pub fn on_episode(mut self, episode: Episode) -> Self {
        self.on.episode = Some(episode);
        self
    }

    pub fn on_series(mut self, series: Series) -> Self {
        self.on.series = Some(series);
        self
    }

    pub fn with_briefs(mut self, briefs: Vec<Brief>) -> Self {
        self.briefs = briefs;
        self
    }

    pub fn track_series(mut self, value: bool) -> Self {
        self.track_series = value;
        self
    }
}

/// The validated output of one call plus everything needed to account for it
/// and continue from it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct BrainOutput<T> {
    pub output: T,
    pub metrics: Metrics,
    pub episode: Episode,
    pub series: Option<Series>,
}

/// Runs one structured-output call against `descriptor`'s model.
pub async fn ask<C>(
    descriptor: &ModelDescriptor,
    transport: &dyn ChatTransport,
    input: AskInput<C>,
) -> Result<BrainOutput<C::Output>, BrainError>
where
    C: OutputContract,
{
    let span = tracing::info_span!(
        "brain_atom_ask",
        slug = %descriptor.slug,
        model = %descriptor.model,
    );

    async move {
        let AskInput {
            on,
            briefs,
            prompt,
            schema,
            track_series,
        } = input;

        let system = cast_briefs_to_prompt(&briefs);
        let messages = compose_messages(system.as_deref(), on.episode.as_ref(), &prompt);
        let request = ChatRequest {
            model: descriptor.model.clone(),
            messages,
            response_format: schema.declaration()?,
        };

        let reply = invoke_provider(transport, request).await?;

        let output = parse_response(&schema, &reply.content).map_err(|err| {
            tracing::warn!(error = %err, "provider response rejected by output contract");
            err
        })?;

        let chars_input = system.as_deref().map_or(0, char_count) + char_count(&prompt);
        let metrics = calc_metrics(
            MetricsInput {
                usage: reply.usage,
                chars_input,
                chars_output: char_count(&reply.content),
                elapsed: reply.elapsed,
            },
            &descriptor.spec.cost.cash,
        );

        let continuables = continue_chain(ContinuationInput {
            episode: on.episode.as_ref(),
            series: on.series.as_ref(),
            exchange: Exchange {
                input: prompt,
                output: reply.content,
                exid: reply.exid.clone(),
            },
            exid: reply.exid,
            track_series,
        });

        tracing::info!(
            cash = %metrics.cost.cash,
            elapsed_ms = metrics.cost.time.as_millis() as u64,
            exchanges = continuables.episode.len(),
            "brain atom ask completed"
        );

        Ok(BrainOutput {
            output,
            metrics,
            episode: continuables.episode,
            series: continuables.series,
        })
    }
    .instrument(span)
    .await
}

fn char_count(text: &str) -> u64 {
    text.chars().count() as u64
}

/// A model offered by a provider: identity, spec, and a default transport.
#[derive(Clone)]
pub struct BrainAtom {
    pub repo: String,
    pub descriptor: ModelDescriptor,
    default_transport: TransportFactory,
}

impl fmt::Debug for BrainAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrainAtom")
            .field("repo", &self.repo)
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl BrainAtom {
    pub fn new(
        repo: impl Into<String>,
        descriptor: ModelDescriptor,
        default_transport: TransportFactory,
    ) -> Self {
        Self {
            repo: repo.into(),
            descriptor,
            default_transport,
        }
    }

    /// Resolves `slug` through `table`, failing with [`BrainError::UnknownModel`]
    /// when the table has no such model.
    pub fn from_table(
        repo: impl Into<String>,
        table: &dyn PricingTable,
        slug: &str,
        default_transport: TransportFactory,
    ) -> Result<Self, BrainError> {
        let descriptor = table
            .lookup(slug)
            .cloned()
            .ok_or_else(|| BrainError::UnknownModel(slug.to_string()))?;
        Ok(Self::new(repo, descriptor, default_transport))
    }

    pub fn slug(&self) -> &str {
        &self.descriptor.slug
    }

    /// Provider-side model id sent on the wire.
    pub fn model(&self) -> &str {
        &self.descriptor.model
    }

    pub fn description(&self) -> &str {
        &self.descriptor.description
    }

    pub fn spec(&self) -> &BrainSpec {
        &self.descriptor.spec
    }

    /// Asks this atom's model, through `transport` if given, else the default.
    pub async fn ask<C>(
        &self,
        input: AskInput<C>,
        transport: Option<Arc<dyn ChatTransport>>,
    ) -> Result<BrainOutput<C::Output>, BrainError>
    where
        C: OutputContract,
    {
        let transport = match transport {
            Some(transport) => transport,
            None => (self.default_transport)()?,
        };
        ask(&self.descriptor, transport.as_ref(), input).await
    }
}
