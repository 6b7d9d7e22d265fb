//! Card issuers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Payment network or issuing company chosen for the card.
///
/// The textual form is the upper-case code used on the wire and in the
/// issuer chooser:
///
/// ```
/// use card_entry::core::CardIssuer;
///
/// let issuer: CardIssuer = "visa".parse().unwrap();
/// assert_eq!(issuer, CardIssuer::Visa);
/// assert_eq!(issuer.to_string(), "VISA");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardIssuer {
    Visa,
    Mastercard,
    Amex,
    Bc,
    Shinhan,
    KakaoBank,
    Hyundai,
    Woori,
    Lotte,
    Hana,
    Kookmin,
}

impl CardIssuer {
    /// Every supported issuer, in chooser order.
    pub const ALL: [CardIssuer; 11] = [
        CardIssuer::Visa,
        CardIssuer::Mastercard,
        CardIssuer::Amex,
        CardIssuer::Bc,
        CardIssuer::Shinhan,
        CardIssuer::KakaoBank,
        CardIssuer::Hyundai,
        CardIssuer::Woori,
        CardIssuer::Lotte,
        CardIssuer::Hana,
        CardIssuer::Kookmin,
    ];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            CardIssuer::Visa => "VISA",
            CardIssuer::Mastercard => "MASTERCARD",
            CardIssuer::Amex => "AMEX",
            CardIssuer::Bc => "BC",
            CardIssuer::Shinhan => "SHINHAN",
            CardIssuer::KakaoBank => "KAKAOBANK",
            CardIssuer::Hyundai => "HYUNDAI",
            CardIssuer::Woori => "WOORI",
            CardIssuer::Lotte => "LOTTE",
            CardIssuer::Hana => "HANA",
            CardIssuer::Kookmin => "KOOKMIN",
        }
    }
}

impl std::fmt::Display for CardIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Unknown issuer code.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown card issuer `{0}`")]
pub struct ParseIssuerError(pub String);

impl FromStr for CardIssuer {
    type Err = ParseIssuerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        CardIssuer::ALL
            .into_iter()
            .find(|issuer| issuer.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ParseIssuerError(s.to_string()))
    }
}

impl PartialEq<&str> for CardIssuer {
    fn eq(&self, other: &&str) -> bool {
        self.code() == *other
    }
}
