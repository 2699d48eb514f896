//! Customer key derivation.
//!
//! A customer key identifies the tenant registration produced by one completed
//! callback. It is generated once per successful exchange and never stored here.

use chrono::{DateTime, Utc};
use std::str::FromStr;
use url::Url;

use crate::state::CallbackContext;
use crate::utils::{UtilError, gen_random_string};

/// Domain suffixes whose first label names the Kintone tenant.
const KINTONE_DOMAIN_SUFFIXES: [&str; 3] = [".cybozu.com", ".kintone.com", ".cybozu.cn"];

const UNKNOWN_SUBDOMAIN: &str = "unknown";

pub trait CustomerKeyStrategy: Send + Sync {
    fn derive_customer_key(
        &self,
        context: &CallbackContext,
        now: DateTime<Utc>,
    ) -> Result<String, UtilError>;
}

/// `customer_{subdomain}_{unix_millis}`, where the subdomain is the tenant
/// label of an `https` Kintone domain, or `unknown` for anything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubdomainStrategy;

impl CustomerKeyStrategy for SubdomainStrategy {
    fn derive_customer_key(
        &self,
        context: &CallbackContext,
        now: DateTime<Utc>,
    ) -> Result<String, UtilError> {
        let subdomain = kintone_subdomain(&context.return_domain);
        Ok(format!(
            "customer_{}_{}",
            subdomain.as_deref().unwrap_or(UNKNOWN_SUBDOMAIN),
            now.timestamp_millis()
        ))
    }
}

/// `customer_{unix_millis}_{random}`; ignores the context entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStrategy;

impl CustomerKeyStrategy for RandomStrategy {
    fn derive_customer_key(
        &self,
        _context: &CallbackContext,
        now: DateTime<Utc>,
    ) -> Result<String, UtilError> {
        let random = gen_random_string(9)?;
        Ok(format!("customer_{}_{random}", now.timestamp_millis()))
    }
}

/// Which [`CustomerKeyStrategy`] a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerKeyPolicy {
    #[default]
    Subdomain,
    Random,
}

impl CustomerKeyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subdomain => "subdomain",
            Self::Random => "random",
        }
    }

    pub fn strategy(&self) -> Box<dyn CustomerKeyStrategy> {
        match self {
            Self::Subdomain => Box::new(SubdomainStrategy),
            Self::Random => Box::new(RandomStrategy),
        }
    }
}

impl FromStr for CustomerKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "subdomain" => Ok(Self::Subdomain),
            "random" => Ok(Self::Random),
            other => Err(format!("unknown customer key strategy: {other}")),
        }
    }
}

fn kintone_subdomain(return_domain: &str) -> Option<String> {
    let url = Url::parse(return_domain).ok()?;
    if url.scheme() != "https" {
        return None;
    }
    let host = url.host_str()?;

    KINTONE_DOMAIN_SUFFIXES.iter().find_map(|suffix| {
        let prefix = host.strip_suffix(suffix)?;
        prefix
            .split('.')
            .next()
            .filter(|label| !label.is_empty())
            .map(str::to_string)
    })
}
