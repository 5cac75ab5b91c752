//! Client registry
//!
//! The fixed enumeration of remote clients a host can opt into, the bitmask
//! set used to request them, and the permission scopes each one implies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;

/// Permission scope strings implied by each client
pub mod scopes {
    /// Scope for the games service
    pub const GAMES: &str = "https://www.googleapis.com/auth/games";
    /// Scope for the social (plus) service
    pub const PLUS_LOGIN: &str = "https://www.googleapis.com/auth/plus.login";
    /// Scope for the cloud app-state service
    pub const APP_STATE: &str = "https://www.googleapis.com/auth/appstate";
}

/// Identifier of a remote client
///
/// Declaration order is the connection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientId {
    /// Games service (leaderboards, achievements, invitations)
    Games,
    /// Social service
    #[serde(alias = "plus")]
    Social,
    /// Cloud app-state storage
    AppState,
}

impl ClientId {
    /// Number of known clients
    pub const COUNT: usize = 3;

    /// All clients, in connection priority order
    pub const ALL: [ClientId; Self::COUNT] = [ClientId::Games, ClientId::Social, ClientId::AppState];

    /// Bit of this client in a [`ClientSet`]
    pub const fn bit(self) -> u8 {
        match self {
            ClientId::Games => 0x01,
            ClientId::Social => 0x02,
            ClientId::AppState => 0x04,
        }
    }

    /// Position of this client in priority order, usable as a table index
    pub const fn index(self) -> usize {
        match self {
            ClientId::Games => 0,
            ClientId::Social => 1,
            ClientId::AppState => 2,
        }
    }

    /// Configuration name of this client
    pub const fn name(self) -> &'static str {
        match self {
            ClientId::Games => "games",
            ClientId::Social => "social",
            ClientId::AppState => "app_state",
        }
    }

    /// Scopes implied by requesting this client
    pub const fn scopes(self) -> &'static [&'static str] {
        match self {
            ClientId::Games => &[scopes::GAMES],
            ClientId::Social => &[scopes::PLUS_LOGIN],
            ClientId::AppState => &[scopes::APP_STATE],
        }
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClientId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "games" => Ok(ClientId::Games),
            "social" | "plus" => Ok(ClientId::Social),
            "app_state" | "appstate" => Ok(ClientId::AppState),
            _ => Err(RegistryError::UnknownClient(s.to_string())),
        }
    }
}

/// Immutable bitmask set of clients
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<ClientId>", from = "Vec<ClientId>")]
pub struct ClientSet(u8);

impl ClientSet {
    /// The empty set
    pub const NONE: ClientSet = ClientSet(0x00);

    /// Every known client
    pub const ALL: ClientSet = ClientSet(0x07);

    /// Build a set from raw bits, discarding unknown bits
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bits of this set
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether the client is in this set
    pub const fn contains(self, id: ClientId) -> bool {
        self.0 & id.bit() != 0
    }

    /// This set with the client added
    pub const fn with(self, id: ClientId) -> Self {
        Self(self.0 | id.bit())
    }

    /// This set with the client removed
    pub const fn without(self, id: ClientId) -> Self {
        Self(self.0 & !id.bit())
    }

    pub const fn union(self, other: ClientSet) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersection(self, other: ClientSet) -> Self {
        Self(self.0 & other.0)
    }

    /// Clients in `self` that are not in `other`
    pub const fn difference(self, other: ClientSet) -> Self {
        Self(self.0 & !other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn is_subset(self, other: ClientSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// First client of this set in priority order
    pub fn first(self) -> Option<ClientId> {
        self.iter().next()
    }

    /// Iterate the clients of this set in priority order
    pub fn iter(self) -> impl Iterator<Item = ClientId> {
        ClientId::ALL.into_iter().filter(move |id| self.contains(*id))
    }
}

impl From<ClientId> for ClientSet {
    fn from(id: ClientId) -> Self {
        Self(id.bit())
    }
}

impl FromIterator<ClientId> for ClientSet {
    fn from_iter<I: IntoIterator<Item = ClientId>>(iter: I) -> Self {
        iter.into_iter().fold(ClientSet::NONE, ClientSet::with)
    }
}

impl From<Vec<ClientId>> for ClientSet {
    fn from(ids: Vec<ClientId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<ClientSet> for Vec<ClientId> {
    fn from(set: ClientSet) -> Self {
        set.iter().collect()
    }
}

impl FromStr for ClientSet {
    type Err = RegistryError;

    /// Parse a comma- or `|`-separated list of client names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split([',', '|'])
            .map(str::trim)
            .filter(|part| !part.is_empty() && *part != "none")
            .map(ClientId::from_str)
            .collect()
    }
}

impl fmt::Debug for ClientSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ClientSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.iter().map(ClientId::name).collect();
        f.write_str(&names.join("|"))
    }
}

/// Derive the ordered scopes implied by a set of clients
pub fn derive_scopes(set: ClientSet) -> Vec<&'static str> {
    set.iter().flat_map(|id| id.scopes().iter().copied()).collect()
}

/// Bitmask test for a single client
pub fn is_requested(set: ClientSet, id: ClientId) -> bool {
    set.contains(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_has_no_scopes() {
        assert!(derive_scopes(ClientSet::NONE).is_empty());
    }

    #[test]
    fn test_scopes_follow_priority_order() {
        let set: ClientSet = [ClientId::AppState, ClientId::Games].into_iter().collect();
        assert_eq!(derive_scopes(set), vec![scopes::GAMES, scopes::APP_STATE]);

        assert_eq!(
            derive_scopes(ClientSet::ALL),
            vec![scopes::GAMES, scopes::PLUS_LOGIN, scopes::APP_STATE]
        );
    }

    #[test]
    fn test_is_requested() {
        let set = ClientSet::from(ClientId::Social);
        assert!(is_requested(set, ClientId::Social));
        assert!(!is_requested(set, ClientId::Games));
        assert!(!is_requested(set, ClientId::AppState));
    }

    #[test]
    fn test_bits_match_bitmask_layout() {
        assert_eq!(ClientSet::ALL.bits(), 0x07);
        assert_eq!(ClientSet::from_bits(0xff), ClientSet::ALL);
        assert_eq!(
            ClientSet::from_bits(0x05),
            ClientSet::from(ClientId::Games).with(ClientId::AppState)
        );
    }

    #[test]
    fn test_set_algebra() {
        let requested = ClientSet::ALL;
        let connected = ClientSet::from(ClientId::Games);

        let pending = requested.difference(connected);
        assert_eq!(pending.len(), 2);
        assert_eq!(pending.first(), Some(ClientId::Social));
        assert!(connected.is_subset(requested));
        assert!(!requested.is_subset(connected));
        assert_eq!(pending.union(connected), requested);
        assert!(pending.intersection(connected).is_empty());
        assert_eq!(requested.without(ClientId::Social).len(), 2);
    }

    #[test]
    fn test_iter_is_priority_ordered() {
        let set = ClientSet::from(ClientId::AppState).with(ClientId::Games);
        let order: Vec<ClientId> = set.iter().collect();
        assert_eq!(order, vec![ClientId::Games, ClientId::AppState]);
    }

    #[test]
    fn test_client_id_parsing() {
        assert_eq!("games".parse::<ClientId>().unwrap(), ClientId::Games);
        assert_eq!("PLUS".parse::<ClientId>().unwrap(), ClientId::Social);
        assert_eq!("app-state".parse::<ClientId>().unwrap(), ClientId::AppState);
        assert!(matches!(
            "chat".parse::<ClientId>(),
            Err(RegistryError::UnknownClient(name)) if name == "chat"
        ));
    }

    #[test]
    fn test_client_set_parsing_and_display() {
        let set: ClientSet = "games, app_state".parse().unwrap();
        assert_eq!(set.to_string(), "games|app_state");
        assert_eq!("none".parse::<ClientSet>().unwrap(), ClientSet::NONE);
        assert_eq!(ClientSet::NONE.to_string(), "none");
    }

    #[test]
    fn test_client_set_serde_as_names() {
        let set = ClientSet::from(ClientId::Games).with(ClientId::Social);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["games","social"]"#);

        let parsed: ClientSet = serde_json::from_str(r#"["app_state","plus"]"#).unwrap();
        assert_eq!(parsed, ClientSet::from(ClientId::Social).with(ClientId::AppState));
    }
}
