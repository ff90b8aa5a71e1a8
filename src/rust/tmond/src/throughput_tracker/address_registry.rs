use super::throughput_entry::AddressDirectionStat;
use fxhash::FxHashMap;
use tmon_utils::units::SendRecvOrder;
use tracing::debug;

/// Stable identifier of a tracked address, valid for the life of the
/// process. Handles are dense and assigned in first-seen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct AddressHandle(usize);

impl AddressHandle {
    pub(crate) fn index(&self) -> usize {
        self.0
    }
}

/// Outcome of looking an address up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddressLookup {
    Tracked(AddressHandle),
    /// The registry is full; the address only counts towards the
    /// global totals.
    NotTracked,
}

#[derive(Debug)]
pub(crate) struct TrackedAddress {
    pub(crate) address: String,
    pub(crate) stats: SendRecvOrder<AddressDirectionStat>,
}

/// Append-only, capped map from address strings to per-direction stats.
/// Entries are never removed and handles are never reused.
#[derive(Debug)]
pub(crate) struct AddressRegistry {
    max_addresses: usize,
    index: FxHashMap<String, AddressHandle>,
    entries: Vec<TrackedAddress>,
    reported_full: bool,
}

impl AddressRegistry {
    pub(crate) fn new(max_addresses: usize) -> Self {
        Self {
            max_addresses,
            index: FxHashMap::default(),
            entries: Vec::new(),
            reported_full: false,
        }
    }

    pub(crate) fn lookup_or_create(&mut self, address: &str) -> AddressLookup {
        if let Some(handle) = self.index.get(address) {
            return AddressLookup::Tracked(*handle);
        }
        if self.entries.len() >= self.max_addresses {
            if !self.reported_full {
                debug!(
                    "Address registry full ({} entries), {address} and later addresses are counted globally only",
                    self.max_addresses
                );
                self.reported_full = true;
            }
            return AddressLookup::NotTracked;
        }
        let handle = AddressHandle(self.entries.len());
        self.entries.push(TrackedAddress {
            address: address.to_string(),
            stats: SendRecvOrder::default(),
        });
        self.index.insert(address.to_string(), handle);
        AddressLookup::Tracked(handle)
    }

    pub(crate) fn get_mut(&mut self, handle: AddressHandle) -> &mut TrackedAddress {
        &mut self.entries[handle.index()]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TrackedAddress> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrackedAddress> {
        self.entries.iter_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
