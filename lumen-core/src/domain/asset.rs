use crate::foundation::{AnchorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Issuer marker used in asset keys for the ledger's native asset.
pub const NATIVE_ISSUER: &str = "native";

/// An asset reference in `code:issuer` form, with `issuer = "native"` denoting
/// the native asset.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct AssetKey {
    pub code: String,
    /// `None` for the native asset.
    pub issuer: Option<String>,
}

impl AssetKey {
    pub fn native(code: impl Into<String>) -> Self {
        Self { code: code.into(), issuer: None }
    }

    pub fn issued(code: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self { code: code.into(), issuer: Some(issuer.into()) }
    }

    pub fn is_native(&self) -> bool {
        self.issuer.is_none()
    }
}

impl FromStr for AssetKey {
    type Err = AnchorError;

    fn from_str(s: &str) -> Result<Self> {
        let (code, issuer) = s.split_once(':').ok_or_else(|| AnchorError::ParseError(format!("asset key missing ':' separator: {s}")))?;
        if code.is_empty() {
            return Err(AnchorError::ParseError(format!("asset key has empty code: {s}")));
        }
        if issuer.is_empty() {
            return Err(AnchorError::ParseError(format!("asset key has empty issuer: {s}")));
        }
        if issuer == NATIVE_ISSUER {
            Ok(AssetKey::native(code))
        } else {
            Ok(AssetKey::issued(code, issuer))
        }
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.issuer {
            Some(issuer) => write!(f, "{}:{}", self.code, issuer),
            None => write!(f, "{}:{}", self.code, NATIVE_ISSUER),
        }
    }
}

/// Resolved target of a deposit. Immutable value, recomputed per route/leg.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DepositAsset {
    pub code: String,
    /// Absent when native.
    pub issuer: Option<String>,
    pub is_native: bool,
}

impl From<&AssetKey> for DepositAsset {
    fn from(key: &AssetKey) -> Self {
        Self { code: key.code.clone(), issuer: key.issuer.clone(), is_native: key.is_native() }
    }
}

impl DepositAsset {
    /// The `code:issuer` key form, used for trustline lookups.
    pub fn key_string(&self) -> String {
        match &self.issuer {
            Some(issuer) => format!("{}:{}", self.code, issuer),
            None => format!("{}:{}", self.code, NATIVE_ISSUER),
        }
    }
}

/// One hop of a route, as provided by the external routing service.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub from: AssetKey,
    pub to: AssetKey,
}

/// Ordered asset path of a route, as provided by the external routing service.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub path: Vec<AssetKey>,
}

impl Route {
    pub fn new(path: Vec<AssetKey>) -> Self {
        Self { path }
    }

    pub fn destination(&self) -> Option<&AssetKey> {
        self.path.last()
    }

    pub fn passes_through_native(&self) -> bool {
        self.path.iter().any(AssetKey::is_native)
    }
}

/// Determines which asset a deposit must credit, from a route leg when one is
/// available and otherwise from the route's final hop.
///
/// Ordered rules: native -> non-native credits the non-native `to`; non-native
/// -> native credits native `to`; the degenerate cases (both native or both
/// non-native) default to `to`; with no leg at all, the route destination wins.
pub fn resolve_deposit_asset(leg: Option<&Leg>, route: &Route) -> Result<DepositAsset> {
    let key = match leg {
        Some(leg) => &leg.to,
        None => route
            .destination()
            .ok_or_else(|| AnchorError::AssetUndeterminable("no leg information and empty route path".to_string()))?,
    };
    if key.code.is_empty() {
        return Err(AnchorError::AssetUndeterminable(format!("resolved asset has empty code: {key}")));
    }
    Ok(DepositAsset::from(key))
}
