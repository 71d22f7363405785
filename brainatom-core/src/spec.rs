use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Cash;

/// Capability, cost and size metadata for one model.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct BrainSpec {
    pub cost: CostSpec,
    pub gain: GainSpec,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CostSpec {
    pub time: TimeSpec,
    pub cash: CashRates,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TimeSpec {
    pub speed_tokens_per_second: u32,
    pub latency: Duration,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CashUnit {
    Token,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct CacheRates {
    pub get: Cash,
    pub set: Cash,
}

/// Per-unit rates used to price an invocation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct CashRates {
    pub per: CashUnit,
    pub cache: CacheRates,
    pub input: Cash,
    pub output: Cash,
}

impl CashRates {
    /// Token rates from "dollars per million tokens" prices, with free cache access.
    pub fn per_million_tokens(input: &str, output: &str) -> Result<Self, crate::BrainError> {
        Ok(Self {
            per: CashUnit::Token,
            cache: CacheRates {
                get: Cash::ZERO,
                set: Cash::ZERO,
            },
            input: Cash::per_million(input)?,
            output: Cash::per_million(output)?,
        })
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct GainSpec {
    pub context_tokens: u64,
    pub grades: Grades,
    pub cutoff: NaiveDate,
    pub domain: Domain,
    pub skills: Skills,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Grades {
    /// SWE-bench verified score, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swe: Option<f64>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Domain {
    All,
    Software,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Skills {
    pub tooluse: bool,
}

/// A catalog entry: the slug callers select by, the provider's model id, and its spec.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ModelDescriptor {
    pub slug: String,
    pub model: String,
    pub description: String,
    pub spec: BrainSpec,
}

/// Lookup from slug to model metadata.
pub trait PricingTable: Send + Sync {
    fn lookup(&self, slug: &str) -> Option<&ModelDescriptor>;

    fn descriptors(&self) -> Vec<&ModelDescriptor>;
}
