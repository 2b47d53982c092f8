//! Display metadata for well-known currencies.

use serde::Serialize;

/// Gradient used for currencies without an entry in [`CURRENCY_META`].
pub const DEFAULT_ACCENT: &str = "from-slate-800/80 to-slate-900/80";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyMeta {
    pub symbol: &'static str,
    pub emoji: Option<&'static str>,
    pub accent: &'static str,
}

const CURRENCY_META: &[(&str, CurrencyMeta)] = &[
    (
        "USD",
        CurrencyMeta {
            symbol: "$",
            emoji: Some("🇺🇸"),
            accent: "from-blue-900/90 via-indigo-700/80 to-sky-600/70",
        },
    ),
    (
        "EUR",
        CurrencyMeta {
            symbol: "€",
            emoji: Some("🇪🇺"),
            accent: "from-indigo-900/90 via-violet-700/80 to-purple-600/70",
        },
    ),
    (
        "CNY",
        CurrencyMeta {
            symbol: "¥",
            emoji: Some("🇨🇳"),
            accent: "from-rose-900/90 via-red-700/80 to-amber-600/70",
        },
    ),
];

impl CurrencyMeta {
    /// Metadata for `code`, or an empty symbol with the neutral accent.
    pub fn lookup(code: &str) -> Self {
        CURRENCY_META
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, meta)| *meta)
            .unwrap_or(Self {
                symbol: "",
                emoji: None,
                accent: DEFAULT_ACCENT,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_currency() {
        let usd = CurrencyMeta::lookup("USD");
        assert_eq!(usd.symbol, "$");
        assert_eq!(usd.emoji, Some("🇺🇸"));
    }

    #[test]
    fn test_unknown_currency_falls_back() {
        let meta = CurrencyMeta::lookup("KZT");
        assert_eq!(meta.symbol, "");
        assert_eq!(meta.emoji, None);
        assert_eq!(meta.accent, DEFAULT_ACCENT);
    }
}
