// ---------------------------------------------------------------------------
// Delegate trait + ordered delegate list
// ---------------------------------------------------------------------------

use std::fmt;

use tracing::warn;

/// A pluggable stateful behaviour unit (one phase or subsystem of a turn).
///
/// The engine constructs delegates through a registry keyed by
/// [`DelegateType::TYPE_KEY`], calls [`Delegate::initialize`] with the
/// instance name, and only then hands it persisted state, if any.
pub trait Delegate: Send + Sync + 'static {
    fn initialize(&mut self, name: &str, display_name: &str);

    fn name(&self) -> &str;

    fn display_name(&self) -> &str;

    /// Stable textual identifier used to find this delegate's constructor
    /// when a save is loaded.
    fn type_key(&self) -> &'static str;

    /// Serialize the delegate's state.
    /// Return `None` for delegates that carry no state.
    fn save_state(&self) -> Option<Vec<u8>>;

    /// Restore previously saved state.
    fn load_state(&mut self, state: &[u8]) -> Result<(), DelegateStateError>;
}

/// A delegate type that can be constructed from nothing and registered.
pub trait DelegateType: Delegate + Default {
    /// Must be stable across versions (used for lookup on load).
    const TYPE_KEY: &'static str;
}

/// Returned by [`Delegate::load_state`] when a state blob is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateStateError(pub String);

impl fmt::Display for DelegateStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for DelegateStateError {}

/// Decode a bitcode state blob, reporting failures as a `DelegateStateError`.
/// Use this in `Delegate::load_state` implementations.
pub fn decode_state<T: bitcode::DecodeOwned>(
    name: &str,
    bytes: &[u8],
) -> Result<T, DelegateStateError> {
    bitcode::decode(bytes).map_err(|e| {
        DelegateStateError(format!(
            "delegate {}: failed to decode {} bytes of state: {}",
            name,
            bytes.len(),
            e
        ))
    })
}

/// Name and display name shared by every delegate implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelegateIdentity {
    pub name: String,
    pub display_name: String,
}

impl DelegateIdentity {
    pub fn set(&mut self, name: &str, display_name: &str) {
        self.name = name.to_string();
        self.display_name = display_name.to_string();
    }
}

/// Delegates of a running game, in insertion order.
///
/// Names are unique; the order is the order delegates are persisted in.
#[derive(Default)]
pub struct DelegateList {
    delegates: Vec<Box<dyn Delegate>>,
}

impl DelegateList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a delegate. Returns `false` (and drops the delegate) when a
    /// delegate with the same name is already present.
    pub fn add_delegate(&mut self, delegate: Box<dyn Delegate>) -> bool {
        if self.contains(delegate.name()) {
            warn!(
                "DelegateList: duplicate delegate name '{}' ignored",
                delegate.name()
            );
            return false;
        }
        self.delegates.push(delegate);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.delegates.iter().any(|d| d.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Delegate> {
        self.delegates
            .iter()
            .find(|d| d.name() == name)
            .map(|d| d.as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Delegate + 'static)> {
        self.delegates
            .iter_mut()
            .find(|d| d.name() == name)
            .map(|d| d.as_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Delegate> {
        self.delegates.iter().map(|d| d.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.delegates.iter().map(|d| d.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl fmt::Debug for DelegateList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.delegates.iter().map(|d| (d.name(), d.type_key())))
            .finish()
    }
}
