use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{NewParameter, Owned, Parameter};
use crate::types::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Connect,
    Options,
    Trace,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            "CONNECT" => Ok(HttpMethod::Connect),
            "OPTIONS" => Ok(HttpMethod::Options),
            "TRACE" => Ok(HttpMethod::Trace),
            other => Err(format!("unknown HTTP method '{}'", other)),
        }
    }
}

/// Protocol scheme the request is sent with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[serde(alias = "http://")]
    Http,
    #[serde(alias = "https://")]
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" | "http://" => Ok(Scheme::Http),
            "https" | "https://" => Ok(Scheme::Https),
            other => Err(format!("unknown scheme '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: EntityId,
    pub folder_id: EntityId,
    /// Copy of the folder owner taken at creation
    pub user_id: String,
    pub name: String,
    pub url: String,
    pub protocol_header: Scheme,
    pub method: HttpMethod,
    pub result: String,
    /// Only populated by detail lookups and writes that replace the set
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl Owned for Request {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

/// Everything needed to create a request except its owner,
/// which always comes from the verified caller.
#[derive(Debug, Clone)]
pub struct RequestDraft {
    pub folder_id: EntityId,
    pub name: String,
    pub url: String,
    pub protocol_header: Scheme,
    pub method: HttpMethod,
    pub parameters: Vec<NewParameter>,
}

/// The mutable content of a request. Identity, name, folder and owner
/// are deliberately absent: an update can only ever touch these fields.
#[derive(Debug, Clone)]
pub struct RequestContent {
    pub url: String,
    pub protocol_header: Scheme,
    pub method: HttpMethod,
    pub parameters: Vec<NewParameter>,
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_round_trips_through_column_text() {
        for m in ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "CONNECT", "OPTIONS", "TRACE"] {
            assert_eq!(m.parse::<HttpMethod>().unwrap().as_str(), m);
        }
        assert!("get".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn scheme_accepts_prefix_spelling() {
        let s: Scheme = serde_json::from_str("\"https://\"").unwrap();
        assert_eq!(s, Scheme::Https);
        assert_eq!(serde_json::to_string(&Scheme::Http).unwrap(), "\"http\"");
        assert_eq!("http://".parse::<Scheme>().unwrap(), Scheme::Http);
        assert_eq!("https".parse::<Scheme>().unwrap().as_str(), "https");
        assert!("ftp".parse::<Scheme>().is_err());
    }
}
