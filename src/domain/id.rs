//! String identifiers for sectors and deals.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

string_id! {
    /// Name of a sector, e.g. `Retail`.
    ///
    /// Sectors carry no data of their own; capital and target weight are
    /// keyed by this id in an [`AllocationRequest`](super::AllocationRequest).
    SectorId
}

string_id! {
    /// Caller-chosen deal identifier, unique within a request.
    DealId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_id_displays_inner_name() {
        let id = SectorId::from("Defence");
        assert_eq!(id.to_string(), "Defence");
        assert_eq!(id.as_str(), "Defence");
    }

    #[test]
    fn deal_id_serializes_as_plain_string() {
        let id = DealId::new("D1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"D1\"");
    }

    #[test]
    fn ids_order_by_name() {
        let mut ids = vec![SectorId::from("Retail"), SectorId::from("Defence")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "Defence");
    }
}
