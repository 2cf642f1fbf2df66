use std::{collections::HashMap, fmt, str::FromStr};

use lazy_static::lazy_static;
use serde::{de, Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Colour {
    Pink,
    White,
    Blue,
    Yellow,
    Orange,
    Black,
    Red,
    Green,
    /// Grey route, claimable with cards of any single colour.
    Wild,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown route colour: {0:?}")]
pub struct UnknownColour(pub String);

lazy_static! {
    static ref NAMES: HashMap<&'static str, Colour> = {
        use Colour::*;

        let mut names: HashMap<_, _> = Colour::ALL.iter().map(|&c| (c.as_str(), c)).collect();
        names.insert("gray", Wild);
        names.insert("grey", Wild);
        names
    };
}

impl Colour {
    pub const ALL: [Colour; 9] = [
        Colour::Pink,
        Colour::White,
        Colour::Blue,
        Colour::Yellow,
        Colour::Orange,
        Colour::Black,
        Colour::Red,
        Colour::Green,
        Colour::Wild,
    ];

    /// The name used for this colour in map files. Wild routes are spelled `""`.
    pub fn as_str(self) -> &'static str {
        use Colour::*;

        match self {
            Pink => "pink",
            White => "white",
            Blue => "blue",
            Yellow => "yellow",
            Orange => "orange",
            Black => "black",
            Red => "red",
            Green => "green",
            Wild => "",
        }
    }

    pub fn is_wild(self) -> bool {
        self == Colour::Wild
    }
}

impl Default for Colour {
    fn default() -> Self {
        Colour::Wild
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Colour::Wild => write!(f, "wild"),
            c => write!(f, "{}", c.as_str()),
        }
    }
}

impl FromStr for Colour {
    type Err = UnknownColour;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| UnknownColour(s.into()))
    }
}

impl<'de> Deserialize<'de> for Colour {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        use Colour::*;

        let parsed: Vec<_> = ["red", "Pink", " green ", "", "gray", "grey"]
            .iter()
            .map(|s| s.parse::<Colour>().unwrap())
            .collect();
        assert_eq!(parsed, vec![Red, Pink, Green, Wild, Wild, Wild]);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(
            "purple".parse::<Colour>(),
            Err(UnknownColour("purple".into()))
        );
    }

    #[test]
    fn test_names_round_trip() {
        for &c in Colour::ALL.iter() {
            assert_eq!(c.as_str().parse::<Colour>().unwrap(), c);
        }
    }

    #[test]
    fn test_deserialize() {
        let colours: Vec<Colour> = serde_json::from_str(r#"["black", ""]"#).unwrap();
        assert_eq!(colours, vec![Colour::Black, Colour::Wild]);

        let err = serde_json::from_str::<Colour>(r#""mauve""#).unwrap_err();
        assert!(err.to_string().contains("mauve"));
    }
}
