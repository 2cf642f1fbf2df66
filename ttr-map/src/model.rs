use std::{
    collections::{BTreeMap, HashMap},
    convert::TryFrom,
    iter::FromIterator,
};

use derive_more::Display;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::colour::Colour;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "{} ({})", name, key)]
pub struct City {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Display)]
#[serde(try_from = "RawRoute")]
#[display(fmt = "{}-{} ({}, {})", "cities.0", "cities.1", length, colour)]
pub struct Route {
    pub cities: (String, String),
    pub length: u32,
    pub colour: Colour,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Display)]
#[serde(try_from = "RawTicket")]
#[display(fmt = "{}-{} : {}", "cities.0", "cities.1", points)]
pub struct Ticket {
    pub cities: (String, String),
    pub points: u32,
}

/// Points scored for claiming a route, by route length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "HashMap<String, u32>")]
pub struct LengthScale(BTreeMap<u32, u32>);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameMap {
    pub name: String,
    #[serde(deserialize_with = "city_table")]
    pub cities: Vec<City>,
    #[serde(default, alias = "segments")]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub length_scale: LengthScale,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Expected 2 cities, found {0:?}")]
    WrongCityCount(Vec<String>),
    #[error("Length scale key is not a route length: {0:?}")]
    BadLength(String),
}

#[derive(Deserialize)]
struct RawRoute {
    cities: Vec<String>,
    #[serde(default, alias = "colour")]
    color: Colour,
    #[serde(default)]
    length: u32,
}

#[derive(Deserialize)]
struct RawTicket {
    cities: Vec<String>,
    #[serde(default)]
    points: u32,
}

fn city_pair(cities: Vec<String>) -> Result<(String, String), ModelError> {
    <[String; 2]>::try_from(cities)
        .map(|[a, b]| (a, b))
        .map_err(ModelError::WrongCityCount)
}

impl TryFrom<RawRoute> for Route {
    type Error = ModelError;

    fn try_from(raw: RawRoute) -> Result<Self, Self::Error> {
        Ok(Route {
            cities: city_pair(raw.cities)?,
            length: raw.length,
            colour: raw.color,
        })
    }
}

impl TryFrom<RawTicket> for Ticket {
    type Error = ModelError;

    fn try_from(raw: RawTicket) -> Result<Self, Self::Error> {
        Ok(Ticket {
            cities: city_pair(raw.cities)?,
            points: raw.points,
        })
    }
}

impl TryFrom<HashMap<String, u32>> for LengthScale {
    type Error = ModelError;

    fn try_from(raw: HashMap<String, u32>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(k, v)| {
                k.trim()
                    .parse()
                    .map(|len| (len, v))
                    .map_err(|_| ModelError::BadLength(k))
            })
            .collect::<Result<_, _>>()
            .map(LengthScale)
    }
}

impl FromIterator<(u32, u32)> for LengthScale {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(it: I) -> Self {
        LengthScale(it.into_iter().collect())
    }
}

impl LengthScale {
    pub fn points(&self, length: u32) -> Option<u32> {
        self.0.get(&length).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }
}

fn city_table<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<City>, D::Error> {
    let table = BTreeMap::<String, String>::deserialize(deserializer)?;
    Ok(table
        .into_iter()
        .map(|(key, name)| City { key, name })
        .collect())
}

impl City {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        City {
            key: key.into(),
            name: name.into(),
        }
    }
}

impl Route {
    pub fn new(a: impl Into<String>, b: impl Into<String>, length: u32, colour: Colour) -> Self {
        Route {
            cities: (a.into(), b.into()),
            length,
            colour,
        }
    }
}

impl Ticket {
    pub fn new(a: impl Into<String>, b: impl Into<String>, points: u32) -> Self {
        Ticket {
            cities: (a.into(), b.into()),
            points,
        }
    }
}

impl GameMap {
    pub fn city(&self, key: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.key == key)
    }

    pub fn points_for_length(&self, length: u32) -> Option<u32> {
        self.length_scale.points(length)
    }
}
