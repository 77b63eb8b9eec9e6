use std::fmt;
use std::io::Write;
use std::str::FromStr;

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};

pub mod favorite;
pub mod log;
pub mod property;
pub mod user;

pub use favorite::Favorite;
pub use log::{NewPropertyLog, PropertyLog};
pub use property::{NewProperty, Property, PropertyChanges, PropertyFilters, PropertyWithAgent};
pub use user::{NewUser, User, UserWithSecret};

/// Closed string-backed enums stored as `Text` columns. The database keeps
/// the lowercase tag; everything above the store layer works with the
/// variant and gets exhaustiveness checking from the compiler.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow,
        )]
        #[diesel(sql_type = Text)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($tag => Ok(Self::$variant),)+
                    other => Err(format!(
                        concat!("invalid ", stringify!($name), ": {}"),
                        other
                    )),
                }
            }
        }

        impl ToSql<Text, Pg> for $name {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                out.write_all(self.as_str().as_bytes())?;
                Ok(IsNull::No)
            }
        }

        impl FromSql<Text, Pg> for $name {
            fn from_sql(value: PgValue<'_>) -> deserialize::Result<Self> {
                let raw = std::str::from_utf8(value.as_bytes())?;
                Self::from_str(raw).map_err(Into::into)
            }
        }
    };
}

text_enum!(Role {
    Customer => "customer",
    Agent => "agent",
    Admin => "admin",
});

text_enum!(PropertyStatus {
    ForSale => "for_sale",
    ForRent => "for_rent",
    Sold => "sold",
    Rented => "rented",
});

impl PropertyStatus {
    /// Statuses visible in the default public listing. Sold and rented
    /// properties stay fetchable by id but drop out of browse results.
    pub const PUBLIC: [PropertyStatus; 2] = [PropertyStatus::ForSale, PropertyStatus::ForRent];
}

text_enum!(PropertyType {
    House => "house",
    Apartment => "apartment",
    Land => "land",
    Commercial => "commercial",
});

text_enum!(LogAction {
    Create => "create",
    Edit => "edit",
    Delete => "delete",
    Sold => "sold",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_tags_round_trip() {
        for role in [Role::Customer, Role::Agent, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("administrator".parse::<Role>().is_err());
    }

    #[test]
    fn status_tags_round_trip() {
        for status in [
            PropertyStatus::ForSale,
            PropertyStatus::ForRent,
            PropertyStatus::Sold,
            PropertyStatus::Rented,
        ] {
            assert_eq!(status.as_str().parse::<PropertyStatus>().unwrap(), status);
        }
    }

    #[test]
    fn public_statuses_exclude_terminal_states() {
        assert!(!PropertyStatus::PUBLIC.contains(&PropertyStatus::Sold));
        assert!(!PropertyStatus::PUBLIC.contains(&PropertyStatus::Rented));
    }

    #[test]
    fn enums_serialize_to_db_tags() {
        assert_eq!(
            serde_json::to_value(PropertyStatus::ForSale).unwrap(),
            serde_json::json!("for_sale")
        );
        assert_eq!(
            serde_json::to_value(LogAction::Sold).unwrap(),
            serde_json::json!("sold")
        );
    }
}
