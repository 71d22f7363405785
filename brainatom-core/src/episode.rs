use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One prompt sent and the raw text received for it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Exchange {
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub exid: Option<String>,
}

/// A continuous conversation: exchanges in the order they were produced.
///
/// Continuing an episode never touches the value it started from; callers keep
/// whichever episode they want to build on next.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Episode {
    #[serde(default)]
    pub exid: Option<String>,
    pub exchanges: Vec<Exchange>,
}

impl Episode {
    pub fn new(exid: Option<String>, exchange: Exchange) -> Self {
        Self {
            exid,
            exchanges: vec![exchange],
        }
    }

    /// Returns a new episode with `exchange` appended, keeping this episode's exid.
    pub fn appended(&self, exchange: Exchange) -> Self {
        let mut exchanges = Vec::with_capacity(self.exchanges.len() + 1);
        exchanges.extend(self.exchanges.iter().cloned());
        exchanges.push(exchange);
        Self {
            exid: self.exid.clone(),
            exchanges,
        }
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

/// Correlates the episodes of one larger task. Carried forward untouched.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Series {
    pub id: String,
    #[serde(default)]
    pub exid: Option<String>,
}

impl Series {
    pub fn new(exid: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            exid,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ContinuationInput<'a> {
    pub episode: Option<&'a Episode>,
    pub series: Option<&'a Series>,
    pub exchange: Exchange,
    /// External id of the response that produced `exchange`.
    pub exid: Option<String>,
    /// Start a series when none is carried in.
    pub track_series: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Continuables {
    pub episode: Episode,
    pub series: Option<Series>,
}

pub fn continue_chain(input: ContinuationInput<'_>) -> Continuables {
    let episode = match input.episode {
        Some(prior) => prior.appended(input.exchange),
        None => Episode::new(input.exid.clone(), input.exchange),
    };

    let series = match input.series {
        Some(prior) => Some(prior.clone()),
        None if input.track_series => Some(Series::new(input.exid)),
        None => None,
    };

    Continuables { episode, series }
}
