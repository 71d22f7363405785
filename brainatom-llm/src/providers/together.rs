//! Together AI models
//!
//! Together serves open-weight models behind an OpenAI-compatible API, so the
//! client is a thin wrapper over [`OpenAiCompatibleClient`]. Rates come from
//! <https://www.together.ai/pricing>; context sizes from
//! <https://docs.together.ai/docs/serverless-models>.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use brainatom_core::{
    BrainAtom, BrainError, BrainSpec, CacheRates, Cash, CashRates, CashUnit, ChatRequest,
    ChatResponse, ChatTransport, CostSpec, Domain, GainSpec, Grades, ModelDescriptor,
    PricingTable, ProviderError, Skills, TimeSpec, TransportFactory,
};

use crate::openai_compatible::OpenAiCompatibleClient;

pub const TOGETHER_BASE_URL: &str = "https://api.together.xyz/v1";
pub const TOGETHER_API_KEY_ENV: &str = "TOGETHER_API_KEY";
pub const TOGETHER_REPO: &str = "together";

/// Together AI chat client
#[derive(Clone)]
pub struct TogetherClient(OpenAiCompatibleClient);

impl TogetherClient {
    /// Create a client for the public Together endpoint with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, BrainError> {
        Self::with_base_url(api_key, TOGETHER_BASE_URL)
    }

    /// Create a client against another endpoint, e.g. a proxy or a mock server
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl AsRef<str>,
    ) -> Result<Self, BrainError> {
        let client = OpenAiCompatibleClient::builder()
            .base_url(base_url)?
            .api_key(api_key)
            .build()?;
        Ok(Self(client))
    }

    /// Create a client from `TOGETHER_API_KEY`
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = std::env::var(TOGETHER_API_KEY_ENV).map_err(|_| {
            BrainError::InvalidConfig(format!("{TOGETHER_API_KEY_ENV} is not set"))
        })?;
        Self::new(api_key)
    }
}

#[async_trait::async_trait]
impl ChatTransport for TogetherClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        self.0.complete(request).await
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TogetherSlug {
    Qwen3CoderNext,
    Qwen3Coder480b,
    Qwen3_235b,
    DeepseekV3_1,
    DeepseekR1,
    KimiK2,
    KimiK2_5,
    Llama4Maverick,
    Llama3_3_70b,
    Glm4_7,
}

impl TogetherSlug {
    pub const ALL: [TogetherSlug; 10] = [
        TogetherSlug::Qwen3CoderNext,
        TogetherSlug::Qwen3Coder480b,
        TogetherSlug::Qwen3_235b,
        TogetherSlug::DeepseekV3_1,
        TogetherSlug::DeepseekR1,
        TogetherSlug::KimiK2,
        TogetherSlug::KimiK2_5,
        TogetherSlug::Llama4Maverick,
        TogetherSlug::Llama3_3_70b,
        TogetherSlug::Glm4_7,
    ];

    pub fn as_str(&self) -> &'static str {
        self.entry().slug
    }

    pub fn descriptor(&self) -> ModelDescriptor {
        self.entry().descriptor()
    }

    fn entry(&self) -> &'static CatalogEntry {
        match self {
            TogetherSlug::Qwen3CoderNext => &CATALOG[0],
            TogetherSlug::Qwen3Coder480b => &CATALOG[1],
            TogetherSlug::Qwen3_235b => &CATALOG[2],
            TogetherSlug::DeepseekV3_1 => &CATALOG[3],
            TogetherSlug::DeepseekR1 => &CATALOG[4],
            TogetherSlug::KimiK2 => &CATALOG[5],
            TogetherSlug::KimiK2_5 => &CATALOG[6],
            TogetherSlug::Llama4Maverick => &CATALOG[7],
            TogetherSlug::Llama3_3_70b => &CATALOG[8],
            TogetherSlug::Glm4_7 => &CATALOG[9],
        }
    }
}

impl fmt::Display for TogetherSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TogetherSlug {
    type Err = BrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TogetherSlug::ALL
            .into_iter()
            .find(|slug| slug.as_str() == s)
            .ok_or_else(|| BrainError::UnknownModel(s.to_string()))
    }
}

struct CatalogEntry {
    slug: &'static str,
    model: &'static str,
    description: &'static str,
    speed_tokens_per_second: u32,
    latency_ms: u64,
    input_cents_per_million: u128,
    output_cents_per_million: u128,
    context_tokens: u64,
    swe: Option<f64>,
    cutoff: (i32, u32, u32),
    domain: Domain,
}

impl CatalogEntry {
    fn descriptor(&self) -> ModelDescriptor {
        let (year, month, day) = self.cutoff;
        ModelDescriptor {
            slug: self.slug.to_string(),
            model: self.model.to_string(),
            description: self.description.to_string(),
            spec: BrainSpec {
                cost: CostSpec {
                    time: TimeSpec {
                        speed_tokens_per_second: self.speed_tokens_per_second,
                        latency: Duration::from_millis(self.latency_ms),
                    },
                    cash: CashRates {
                        per: CashUnit::Token,
                        // together does not bill cache access
                        cache: CacheRates {
                            get: Cash::ZERO,
                            set: Cash::ZERO,
                        },
                        input: cents_per_million_tokens(self.input_cents_per_million),
                        output: cents_per_million_tokens(self.output_cents_per_million),
                    },
                },
                gain: GainSpec {
                    context_tokens: self.context_tokens,
                    grades: Grades { swe: self.swe },
                    cutoff: NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN),
                    domain: self.domain,
                    skills: Skills { tooluse: true },
                },
            },
        }
    }
}

/// One cent per million tokens is 10_000 picodollars per token.
const fn cents_per_million_tokens(cents: u128) -> Cash {
    Cash::from_picodollars(cents * 10_000)
}

static CATALOG: [CatalogEntry; 10] = [
    CatalogEntry {
        slug: "together/qwen3/coder-next",
        model: "Qwen/Qwen3-Coder-Next-FP8",
        description: "qwen3-coder-next - best cost/performance for code (262K)",
        speed_tokens_per_second: 150,
        latency_ms: 500,
        input_cents_per_million: 50,
        output_cents_per_million: 120,
        context_tokens: 262_000,
        swe: Some(74.2),
        cutoff: (2025, 6, 1),
        domain: Domain::Software,
    },
    CatalogEntry {
        slug: "together/qwen3/coder-480b",
        model: "Qwen/Qwen3-Coder-480B-A35B-Instruct-FP8",
        description: "qwen3-coder-480b - large code model (262K)",
        speed_tokens_per_second: 80,
        latency_ms: 1_000,
        input_cents_per_million: 200,
        output_cents_per_million: 200,
        context_tokens: 262_000,
        swe: Some(69.6),
        cutoff: (2025, 6, 1),
        domain: Domain::Software,
    },
    CatalogEntry {
        slug: "together/qwen3/235b",
        model: "Qwen/Qwen3-235B-A22B-Instruct-2507-tput",
        description: "qwen3-235b - general purpose (131K)",
        speed_tokens_per_second: 120,
        latency_ms: 500,
        input_cents_per_million: 20,
        output_cents_per_million: 60,
        context_tokens: 131_000,
        swe: None,
        cutoff: (2025, 7, 1),
        domain: Domain::All,
    },
    CatalogEntry {
        slug: "together/deepseek/v3.1",
        model: "deepseek-ai/DeepSeek-V3.1",
        description: "deepseek-v3.1 - frontier open-source (128K)",
        speed_tokens_per_second: 100,
        latency_ms: 1_000,
        input_cents_per_million: 125,
        output_cents_per_million: 125,
        context_tokens: 128_000,
        swe: None,
        cutoff: (2025, 3, 1),
        domain: Domain::All,
    },
    CatalogEntry {
        slug: "together/deepseek/r1",
        model: "deepseek-ai/DeepSeek-R1",
        description: "deepseek-r1 - chain-of-thought (128K)",
        speed_tokens_per_second: 60,
        latency_ms: 1_500,
        input_cents_per_million: 300,
        output_cents_per_million: 700,
        context_tokens: 128_000,
        swe: None,
        cutoff: (2025, 3, 1),
        domain: Domain::All,
    },
    CatalogEntry {
        slug: "together/kimi/k2",
        model: "moonshotai/Kimi-K2-Instruct",
        description: "kimi-k2 - large general purpose (128K)",
        speed_tokens_per_second: 80,
        latency_ms: 1_000,
        input_cents_per_million: 100,
        output_cents_per_million: 300,
        context_tokens: 128_000,
        swe: None,
        cutoff: (2025, 6, 1),
        domain: Domain::All,
    },
    CatalogEntry {
        slug: "together/kimi/k2.5",
        model: "moonshotai/Kimi-K2.5",
        description: "kimi-k2.5 - best swe-bench on together ai (128K)",
        speed_tokens_per_second: 100,
        latency_ms: 800,
        input_cents_per_million: 50,
        output_cents_per_million: 280,
        context_tokens: 128_000,
        swe: Some(76.8),
        cutoff: (2025, 7, 1),
        domain: Domain::All,
    },
    CatalogEntry {
        slug: "together/llama4/maverick",
        model: "meta-llama/Llama-4-Maverick-17B-128E-Instruct-FP8",
        description: "llama-4-maverick - large context (1M)",
        speed_tokens_per_second: 120,
        latency_ms: 500,
        input_cents_per_million: 27,
        output_cents_per_million: 85,
        context_tokens: 1_000_000,
        swe: None,
        cutoff: (2025, 3, 1),
        domain: Domain::All,
    },
    CatalogEntry {
        slug: "together/llama3.3/70b",
        model: "meta-llama/Llama-3.3-70B-Instruct-Turbo",
        description: "llama-3.3-70b - balanced dense model (128K)",
        speed_tokens_per_second: 150,
        latency_ms: 400,
        input_cents_per_million: 88,
        output_cents_per_million: 88,
        context_tokens: 128_000,
        swe: None,
        cutoff: (2024, 12, 1),
        domain: Domain::All,
    },
    CatalogEntry {
        slug: "together/glm/4.7",
        model: "zai-org/GLM-4.7",
        description: "glm-4.7 - strong code + general (128K)",
        speed_tokens_per_second: 100,
        latency_ms: 800,
        input_cents_per_million: 45,
        output_cents_per_million: 200,
        context_tokens: 128_000,
        swe: Some(73.8),
        cutoff: (2025, 6, 1),
        domain: Domain::All,
    },
];

/// The Together model catalog as a [`PricingTable`].
#[derive(Clone, Debug)]
pub struct TogetherCatalog {
    descriptors: Vec<ModelDescriptor>,
}

impl TogetherCatalog {
    pub fn new() -> Self {
        Self {
            descriptors: TogetherSlug::ALL.iter().map(TogetherSlug::descriptor).collect(),
        }
    }
}

impl Default for TogetherCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingTable for TogetherCatalog {
    fn lookup(&self, slug: &str) -> Option<&ModelDescriptor> {
        self.descriptors.iter().find(|descriptor| descriptor.slug == slug)
    }

    fn descriptors(&self) -> Vec<&ModelDescriptor> {
        self.descriptors.iter().collect()
    }
}

fn default_transport() -> TransportFactory {
    Arc::new(|| {
        let client = TogetherClient::from_env()?;
        Ok(Arc::new(client) as Arc<dyn ChatTransport>)
    })
}

/// Builds the atom for one Together model.
///
/// Without an injected transport, its calls go through [`TogetherClient::from_env`].
pub fn gen_brain_atom(slug: TogetherSlug) -> BrainAtom {
    BrainAtom::new(TOGETHER_REPO, slug.descriptor(), default_transport())
}

/// Resolves a slug string such as `"together/glm/4.7"` through [`TogetherCatalog`].
pub fn find_brain_atom(slug: &str) -> Result<BrainAtom, BrainError> {
    BrainAtom::from_table(
        TOGETHER_REPO,
        &TogetherCatalog::new(),
        slug,
        default_transport(),
    )
}

/// Every Together atom, in catalog order.
pub fn get_brain_atoms() -> Vec<BrainAtom> {
    let catalog = TogetherCatalog::new();
    catalog
        .descriptors()
        .into_iter()
        .map(|descriptor| BrainAtom::new(TOGETHER_REPO, descriptor.clone(), default_transport()))
        .collect()
}
