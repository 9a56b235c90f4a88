//! Structured render model handed to the output layer, one variant per display mode.

use serde::Serialize;

use crate::classify::{Classification, DisplayMode, InfoPayload};
use crate::types::{ListMeta, UserRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum View {
    UserList {
        users: Vec<UserRecord>,
        total: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        meta: Option<ListMeta>,
    },
    SingleUser {
        user: UserRecord,
    },
    Info(InfoPayload),
    /// Nothing to show; the display is cleared.
    Empty,
}

impl View {
    pub fn mode(&self) -> DisplayMode {
        match self {
            Self::UserList { .. } => DisplayMode::UserList,
            Self::SingleUser { .. } => DisplayMode::SingleUser,
            Self::Info(_) => DisplayMode::Info,
            Self::Empty => DisplayMode::Empty,
        }
    }
}

impl From<Classification> for View {
    fn from(classification: Classification) -> Self {
        match classification {
            Classification::UserList { users, total, meta } => Self::UserList { users, total, meta },
            Classification::SingleUser { user, .. } => Self::SingleUser { user },
            Classification::Info(info) => Self::Info(info),
            Classification::Error { .. } => Self::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn server_error_clears_the_display() {
        let view = View::from(Classification::Error {
            message: "User not found".into(),
        });
        assert_eq!(view, View::Empty);
        assert_eq!(view.mode(), DisplayMode::Empty);
    }

    #[test]
    fn serializes_with_mode_tag() {
        let view = View::UserList {
            users: vec![],
            total: 0,
            meta: None,
        };
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({"mode": "user_list", "users": [], "total": 0})
        );
        assert_eq!(serde_json::to_value(View::Empty).unwrap(), json!({"mode": "empty"}));
    }
}
