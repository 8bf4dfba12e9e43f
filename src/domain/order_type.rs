//! Order type tokens found in the `Type` column of a closed trade.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    Buy,
    Sell,
    BuyLimit,
    SellLimit,
    BuyStop,
    SellStop,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Buy => "buy",
            OrderType::Sell => "sell",
            OrderType::BuyLimit => "buy limit",
            OrderType::SellLimit => "sell limit",
            OrderType::BuyStop => "buy stop",
            OrderType::SellStop => "sell stop",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order type: {0:?}")]
pub struct UnknownOrderType(pub String);

impl FromStr for OrderType {
    type Err = UnknownOrderType;

    /// Case-insensitive; runs of whitespace, `_` and `-` between words are
    /// treated as one space, so `Buy Limit`, `buy_limit` and `BUY-LIMIT` match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        match normalized.as_str() {
            "buy" => Ok(OrderType::Buy),
            "sell" => Ok(OrderType::Sell),
            "buy limit" => Ok(OrderType::BuyLimit),
            "sell limit" => Ok(OrderType::SellLimit),
            "buy stop" => Ok(OrderType::BuyStop),
            "sell stop" => Ok(OrderType::SellStop),
            _ => Err(UnknownOrderType(s.to_string())),
        }
    }
}
