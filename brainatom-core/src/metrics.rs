use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Cash, CashRates, Usage};

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CacheCounts {
    pub get: u64,
    pub set: u64,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Counts {
    pub input: u64,
    pub output: u64,
    pub cache: CacheCounts,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Size {
    pub tokens: Counts,
    pub chars: Counts,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Cost {
    #[serde(with = "millis")]
    pub time: Duration,
    pub cash: Cash,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Metrics {
    pub size: Size,
    pub cost: Cost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetricsInput {
    pub usage: Usage,
    pub chars_input: u64,
    pub chars_output: u64,
    pub elapsed: Duration,
}

/// Prices a token count against a rate card.
pub fn calc_cash(tokens: &Counts, rates: &CashRates) -> Cash {
    rates.input * tokens.input
        + rates.output * tokens.output
        + rates.cache.get * tokens.cache.get
        + rates.cache.set * tokens.cache.set
}

/// Builds the size and cost record for one invocation.
///
/// Cache traffic is only tracked in tokens; the char-level cache counts stay zero.
pub fn calc_metrics(input: MetricsInput, rates: &CashRates) -> Metrics {
    let tokens = Counts {
        input: input.usage.prompt_tokens,
        output: input.usage.completion_tokens,
        cache: CacheCounts {
            get: input.usage.cached_tokens,
            set: 0,
        },
    };
    let chars = Counts {
        input: input.chars_input,
        output: input.chars_output,
        cache: CacheCounts::default(),
    };

    Metrics {
        size: Size { tokens, chars },
        cost: Cost {
            time: input.elapsed,
            cash: calc_cash(&tokens, rates),
        },
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize, Serialize)]
    struct Millis {
        milliseconds: u64,
    }

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        Millis {
            milliseconds: u64::try_from(value.as_millis()).unwrap_or(u64::MAX),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let Millis { milliseconds } = Millis::deserialize(deserializer)?;
        Ok(Duration::from_millis(milliseconds))
    }
}
