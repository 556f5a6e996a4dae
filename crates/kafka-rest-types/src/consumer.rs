//! Consumer instance handle, creation options and subscriptions.

use serde::{Deserialize, Serialize};

use crate::codec;

/// Consumer instance returned by `POST /consumers/{group}`.
///
/// Every consumer-scoped request is addressed relative to `base_uri`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerInstance {
    /// Proxy-assigned instance id
    pub instance_id: String,
    /// Absolute URI of the instance, e.g. `http://proxy/consumers/g/instances/i`
    pub base_uri: String,
}

/// Where a consumer starts when the group has no committed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoOffsetReset {
    Earliest,
    Latest,
    None,
}

impl std::fmt::Display for AutoOffsetReset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Earliest => write!(f, "earliest"),
            Self::Latest => write!(f, "latest"),
            Self::None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for AutoOffsetReset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earliest" => Ok(Self::Earliest),
            "latest" => Ok(Self::Latest),
            "none" => Ok(Self::None),
            other => Err(format!(
                "Invalid auto offset reset '{other}': expected earliest, latest or none"
            )),
        }
    }
}

/// Options for `POST /consumers/{group}`.
///
/// Every field is optional and left out of the request body when absent, so
/// the proxy applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsumerOptions {
    /// Instance name; the proxy generates one when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "auto.offset.reset",
        skip_serializing_if = "Option::is_none",
        serialize_with = "codec::optional_string::serialize"
    )]
    pub auto_offset_reset: Option<AutoOffsetReset>,
    #[serde(
        rename = "auto.commit.enable",
        skip_serializing_if = "Option::is_none",
        serialize_with = "codec::optional_string::serialize"
    )]
    pub auto_commit_enable: Option<bool>,
    #[serde(
        rename = "fetch.min.bytes",
        skip_serializing_if = "Option::is_none",
        serialize_with = "codec::optional_string::serialize"
    )]
    pub fetch_min_bytes: Option<u64>,
    #[serde(
        rename = "consumer.request.timeout.ms",
        skip_serializing_if = "Option::is_none",
        serialize_with = "codec::optional_string::serialize"
    )]
    pub consumer_request_timeout_ms: Option<u64>,
}

/// Topics a consumer instance subscribes to: an explicit list or a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    #[serde(skip_serializing_if = "Option::is_none")]
    topics: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic_pattern: Option<String>,
}

impl Subscription {
    pub fn topic(topic: impl Into<String>) -> Self {
        Self {
            topics: Some(vec![topic.into()]),
            topic_pattern: None,
        }
    }

    pub fn topics<I, T>(topics: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            topics: Some(topics.into_iter().map(Into::into).collect()),
            topic_pattern: None,
        }
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            topics: None,
            topic_pattern: Some(pattern.into()),
        }
    }

    pub fn topic_names(&self) -> Option<&[String]> {
        self.topics.as_deref()
    }

    pub fn topic_pattern(&self) -> Option<&str> {
        self.topic_pattern.as_deref()
    }
}
