//! Capability Probe
//!
//! Decides whether a given wallet brand is present in the host environment.
//! The host is always passed in explicitly so the probe stays testable
//! without a real browser runtime; nothing here reads ambient global state.

use std::sync::Arc;

use super::provider::EthereumProvider;

/// Description of the provider object(s) the host exposes.
///
/// Some hosts expose a single provider, some multiplex several wallet
/// extensions behind one object with a candidate list, and non-browser
/// hosts expose nothing at all.
#[derive(Clone, Default)]
pub enum HostEnvironment {
    /// No provider is exposed (e.g. a non-browser environment)
    #[default]
    Absent,
    /// A single provider object
    Single(Arc<dyn EthereumProvider>),
    /// An ordered list of candidate providers
    Multiplexed(Vec<Arc<dyn EthereumProvider>>),
}

impl HostEnvironment {
    /// Find the provider matching a vendor flag.
    ///
    /// Multiplexed hosts are scanned in order and the first candidate with
    /// the flag set wins. A host with no provider reports absent rather
    /// than failing. The facade calls this once at construction and
    /// memoizes the result; capability changes after that are not observed.
    pub fn probe(&self, vendor_flag: &str) -> Option<Arc<dyn EthereumProvider>> {
        match self {
            HostEnvironment::Absent => None,
            HostEnvironment::Single(provider) => {
                provider.has_vendor_flag(vendor_flag).then(|| provider.clone())
            }
            HostEnvironment::Multiplexed(candidates) => candidates
                .iter()
                .find(|candidate| candidate.has_vendor_flag(vendor_flag))
                .cloned(),
        }
    }
}
