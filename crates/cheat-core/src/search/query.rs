use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::error::Error;

/// One narrowing step of a search.
///
/// `Exact` compares the live value with the immediate; every other kind
/// compares the live value with the value seen at the previous step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
pub enum SearchQuery {
    #[strum(serialize = "exact")]
    Exact(u32),
    #[strum(serialize = "lt")]
    Lt,
    #[strum(serialize = "gt")]
    Gt,
    #[strum(serialize = "lte")]
    Lte,
    #[strum(serialize = "gte")]
    Gte,
    #[strum(serialize = "eq")]
    Eq,
    #[strum(serialize = "neq")]
    Neq,
    #[strum(serialize = "eqplus")]
    EqPlus(u32),
    #[strum(serialize = "eqminus")]
    EqMinus(u32),
}

impl SearchQuery {
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Evaluate the predicate for one item.
    ///
    /// `EqPlus`/`EqMinus` add or subtract in 32-bit wrapping arithmetic
    /// regardless of the item width, so e.g. an 8-bit `prev < delta` never
    /// matches with `EqMinus`.
    pub fn matches(&self, curr: u32, prev: u32) -> bool {
        match *self {
            SearchQuery::Exact(value) => curr == value,
            SearchQuery::Lt => curr < prev,
            SearchQuery::Gt => curr > prev,
            SearchQuery::Lte => curr <= prev,
            SearchQuery::Gte => curr >= prev,
            SearchQuery::Eq => curr == prev,
            SearchQuery::Neq => curr != prev,
            SearchQuery::EqPlus(delta) => curr == prev.wrapping_add(delta),
            SearchQuery::EqMinus(delta) => curr == prev.wrapping_sub(delta),
        }
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchQuery::Exact(v) | SearchQuery::EqPlus(v) | SearchQuery::EqMinus(v) => {
                write!(f, "{}={}", self.name(), v)
            }
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Parse an unsigned value in decimal or `0x` hex.
pub fn parse_value(value: &str) -> Option<u32> {
    let value = value.trim();
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

impl FromStr for SearchQuery {
    type Err = Error;

    /// Accepts `lt`, `gt`, `lte`, `gte`, `eq`, `neq`, `exact=V`, `eqplus=D`
    /// and `eqminus=D` (case-insensitive, values decimal or hex).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once('=') {
            Some((name, arg)) => (name.trim(), Some(arg)),
            None => (s.trim(), None),
        };
        let name = name.to_ascii_lowercase();

        let value = || {
            arg.and_then(parse_value)
                .ok_or_else(|| Error::InvalidQuery(format!("'{}' needs a numeric value", s)))
        };

        let query = match name.as_str() {
            "exact" => SearchQuery::Exact(value()?),
            "eqplus" => SearchQuery::EqPlus(value()?),
            "eqminus" => SearchQuery::EqMinus(value()?),
            "lt" => SearchQuery::Lt,
            "gt" => SearchQuery::Gt,
            "lte" => SearchQuery::Lte,
            "gte" => SearchQuery::Gte,
            "eq" => SearchQuery::Eq,
            "neq" => SearchQuery::Neq,
            _ => return Err(Error::InvalidQuery(format!("unknown search kind '{}'", s))),
        };
        Ok(query)
    }
}
