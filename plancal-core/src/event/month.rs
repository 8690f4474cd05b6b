use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{ParseError, UnknownMonthSnafu};

/// Month of a planning, named the French way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FrenchMonth {
    Janvier,
    Fevrier,
    Mars,
    Avril,
    Mai,
    Juin,
    #[default]
    Juillet,
    Aout,
    Septembre,
    Octobre,
    Novembre,
    Decembre,
}

impl FrenchMonth {
    pub const ALL: [FrenchMonth; 12] = [
        FrenchMonth::Janvier,
        FrenchMonth::Fevrier,
        FrenchMonth::Mars,
        FrenchMonth::Avril,
        FrenchMonth::Mai,
        FrenchMonth::Juin,
        FrenchMonth::Juillet,
        FrenchMonth::Aout,
        FrenchMonth::Septembre,
        FrenchMonth::Octobre,
        FrenchMonth::Novembre,
        FrenchMonth::Decembre,
    ];

    /// 1 for January through 12 for December.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            FrenchMonth::Janvier => "janvier",
            FrenchMonth::Fevrier => "février",
            FrenchMonth::Mars => "mars",
            FrenchMonth::Avril => "avril",
            FrenchMonth::Mai => "mai",
            FrenchMonth::Juin => "juin",
            FrenchMonth::Juillet => "juillet",
            FrenchMonth::Aout => "août",
            FrenchMonth::Septembre => "septembre",
            FrenchMonth::Octobre => "octobre",
            FrenchMonth::Novembre => "novembre",
            FrenchMonth::Decembre => "décembre",
        }
    }
}


impl fmt::Display for FrenchMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FrenchMonth {
    type Err = ParseError;

    /// Case-insensitive; `fevrier`, `aout` and `decembre` are accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = strip_accents(&s.trim().to_lowercase());

        FrenchMonth::ALL
            .into_iter()
            .find(|month| strip_accents(month.name()) == name)
            .ok_or_else(|| UnknownMonthSnafu { name: s }.build())
    }
}

fn strip_accents(name: &str) -> String {
    name.replace('é', "e").replace('û', "u")
}

impl TryFrom<String> for FrenchMonth {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FrenchMonth> for String {
    fn from(month: FrenchMonth) -> Self {
        month.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_numbers() {
        for (idx, month) in FrenchMonth::ALL.into_iter().enumerate() {
            assert_eq!(month.number(), idx as u32 + 1);
            assert_eq!(month.name().parse::<FrenchMonth>(), Ok(month));
        }
    }

    #[test]
    fn test_parse_month_names() {
        assert_eq!("juillet".parse::<FrenchMonth>(), Ok(FrenchMonth::Juillet));
        assert_eq!(" Août ".parse::<FrenchMonth>(), Ok(FrenchMonth::Aout));
        assert_eq!("aout".parse::<FrenchMonth>(), Ok(FrenchMonth::Aout));
        assert_eq!("DECEMBRE".parse::<FrenchMonth>(), Ok(FrenchMonth::Decembre));
        assert_eq!("fevrier".parse::<FrenchMonth>(), Ok(FrenchMonth::Fevrier));
        assert!("july".parse::<FrenchMonth>().is_err());
    }

    #[test]
    fn test_serde_uses_french_name() {
        let json = serde_json::to_string(&FrenchMonth::Fevrier).expect("serialize");
        assert_eq!(json, "\"février\"");
        let month: FrenchMonth = serde_json::from_str("\"mars\"").expect("deserialize");
        assert_eq!(month, FrenchMonth::Mars);
    }
}
