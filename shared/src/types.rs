//! Common types shared between the server and its clients

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unix timestamp in milliseconds
pub type UnixMillis = i64;

/// Caller role, resolved by the upstream identity gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operator: composes menus, locks days, generates invoices
    Operator,
    /// Business employee: places and cancels own orders
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operator" => Ok(Self::Operator),
            "employee" => Ok(Self::Employee),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("operator".parse::<Role>(), Ok(Role::Operator));
        assert_eq!("employee".parse::<Role>(), Ok(Role::Employee));
        assert!("chef".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Operator).unwrap(), "\"operator\"");
        let role: Role = serde_json::from_str("\"employee\"").unwrap();
        assert_eq!(role, Role::Employee);
    }
}
