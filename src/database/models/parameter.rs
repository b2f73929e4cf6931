use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Where a parameter is placed when the request is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Header,
    Query,
    FormBody,
    JsonBody,
}

impl ParamKind {
    /// Column value used by the relational store
    pub fn code(self) -> i16 {
        match self {
            ParamKind::Header => 0,
            ParamKind::Query => 1,
            ParamKind::FormBody => 2,
            ParamKind::JsonBody => 3,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(ParamKind::Header),
            1 => Some(ParamKind::Query),
            2 => Some(ParamKind::FormBody),
            3 => Some(ParamKind::JsonBody),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub id: EntityId,
    pub kind: ParamKind,
    pub key: String,
    pub value: String,
    pub request_id: EntityId,
}

/// Parameter as supplied by a caller; ids are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParameter {
    pub kind: ParamKind,
    pub key: String,
    #[serde(default)]
    pub value: String,
}
