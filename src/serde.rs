//! Serde support: principal types serialize as their canonical ISO
//! strings.

use core::fmt;
use core::marker::PhantomData;
use core::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::components::{LocalDate, LocalDateTime, LocalTime, OffsetDateTime, ZoneOffset, ZonedDateTime};
use crate::error::CivilError;
use crate::zone::ZoneId;

struct IsoVisitor<T>(PhantomData<T>);

impl<T> de::Visitor<'_> for IsoVisitor<T>
where
    T: FromStr<Err = CivilError>,
{
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an ISO-8601 formatted string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(E::custom)
    }
}

macro_rules! iso_string_serde {
    ($($type:ty),+ $(,)?) => {
        $(
            impl Serialize for $type {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $type {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    deserializer.deserialize_str(IsoVisitor(PhantomData))
                }
            }
        )+
    };
}

iso_string_serde!(
    LocalDate,
    LocalTime,
    LocalDateTime,
    OffsetDateTime,
    ZonedDateTime,
    ZoneOffset,
    ZoneId,
);
