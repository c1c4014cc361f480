use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct ParseSelectionError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! selection_enum {
    (
        $name:ident, $kind:literal {
            $($variant:ident => ($wire:literal, $label:literal)),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Value sent on the wire as a query parameter.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Human-readable option label.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseSelectionError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let needle = value.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| ParseSelectionError {
                        kind: $kind,
                        value: value.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|candidate| candidate.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

// `Default` must stay the first variant; the macro marks it `#[default]`.
selection_enum!(SourceSystem, "source" {
    Default => ("default", "Default"),
    Github => ("github", "GitHub"),
    Stripe => ("stripe", "Stripe"),
    Shopify => ("shopify", "Shopify"),
    Wix => ("wix", "Wix"),
    Cloudflare => ("cloudflare", "Cloudflare"),
    Webflow => ("webflow", "Webflow"),
});

selection_enum!(OutputFormat, "format" {
    Default => ("default", "Default"),
    Slack => ("slack", "Slack"),
    Discord => ("discord", "Discord"),
    MsTeams => ("msteams", "Microsoft Teams"),
    Email => ("email", "Email"),
});

/// Arguments of a single request cycle, captured when the cycle is triggered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransformRequest {
    pub source: SourceSystem,
    pub format: OutputFormat,
    pub payload: String,
}

impl TransformRequest {
    pub fn new(source: SourceSystem, format: OutputFormat, payload: impl Into<String>) -> Self {
        Self {
            source,
            format,
            payload: payload.into(),
        }
    }

    pub fn query_pairs(&self) -> [(&'static str, &'static str); 2] {
        [
            ("source", self.source.as_str()),
            ("format", self.format.as_str()),
        ]
    }
}
