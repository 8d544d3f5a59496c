// ── Device reads and writes ──
//
// Thin typed wrappers over `Session::call`: each function issues the
// device call(s) for one concern and converts the records once. They run
// on a session the caller already holds, so every call a command makes
// happens under one acquisition.

use tracing::debug;

use crate::config::{FirewallConfig, RankSide};
use crate::device::DeviceLink;
use crate::error::CoreError;
use crate::model::{
    AddressListEntry, EntryId, FilterRule, Interface, Lease, LogEntry, Queue, SystemResource,
};
use crate::names::NameMap;
use crate::ranking::{Ranked, rank_queues};
use crate::session::Session;

pub const LEASES: &str = "/ip/dhcp-server/lease";
pub const QUEUES: &str = "/queue/simple";
pub const RESOURCE: &str = "/system/resource";
pub const LOG: &str = "/log";
pub const INTERFACES: &str = "/interface";
pub const FILTER_RULES: &str = "/ip/firewall/filter";
pub const ADDRESS_LIST: &str = "/ip/firewall/address-list";
pub const BACKUP: &str = "/system/backup";

pub async fn leases<L: DeviceLink>(session: &mut Session<'_, L>) -> Result<Vec<Lease>, CoreError> {
    Ok(session.print(LEASES).await?.iter().map(Lease::from).collect())
}

pub async fn queues<L: DeviceLink>(session: &mut Session<'_, L>) -> Result<Vec<Queue>, CoreError> {
    Ok(session.print(QUEUES).await?.iter().map(Queue::from).collect())
}

/// Leases first, then queues. The name map is built once and used for
/// every queue in the reply.
pub async fn named_queues<L: DeviceLink>(
    session: &mut Session<'_, L>,
) -> Result<(Vec<Queue>, NameMap), CoreError> {
    let names = NameMap::from_leases(&leases(session).await?);
    let queues = queues(session).await?;
    debug!(queues = queues.len(), named = names.len(), "resolved queue names");
    Ok((queues, names))
}

pub async fn top_consumers<L: DeviceLink>(
    session: &mut Session<'_, L>,
    side: RankSide,
    limit: usize,
) -> Result<Vec<Ranked>, CoreError> {
    let (queues, names) = named_queues(session).await?;
    Ok(rank_queues(&queues, &names, side, limit))
}

/// First `/system/resource` record. An empty reply yields all-unknown fields.
pub async fn system_resource<L: DeviceLink>(
    session: &mut Session<'_, L>,
) -> Result<SystemResource, CoreError> {
    Ok(session
        .print(RESOURCE)
        .await?
        .first()
        .map(SystemResource::from)
        .unwrap_or_default())
}

pub async fn logs<L: DeviceLink>(session: &mut Session<'_, L>) -> Result<Vec<LogEntry>, CoreError> {
    Ok(session.print(LOG).await?.iter().map(LogEntry::from).collect())
}

pub async fn interfaces<L: DeviceLink>(
    session: &mut Session<'_, L>,
) -> Result<Vec<Interface>, CoreError> {
    Ok(session.print(INTERFACES).await?.iter().map(Interface::from).collect())
}

pub async fn filter_rules<L: DeviceLink>(
    session: &mut Session<'_, L>,
) -> Result<Vec<FilterRule>, CoreError> {
    Ok(session.print(FILTER_RULES).await?.iter().map(FilterRule::from).collect())
}

// ── Mutations ────────────────────────────────────────────────────────

/// Save a configuration backup under `name` (the device appends `.backup`).
pub async fn save_backup<L: DeviceLink>(
    session: &mut Session<'_, L>,
    name: &str,
) -> Result<(), CoreError> {
    session.call(BACKUP, "save", &[("name", name)]).await?;
    Ok(())
}

pub async fn add_to_address_list<L: DeviceLink>(
    session: &mut Session<'_, L>,
    firewall: &FirewallConfig,
    address: &str,
) -> Result<(), CoreError> {
    session
        .call(
            ADDRESS_LIST,
            "add",
            &[
                ("list", firewall.block_list.as_str()),
                ("address", address),
                ("comment", firewall.block_comment.as_str()),
            ],
        )
        .await?;
    Ok(())
}

/// Entries of `list` whose address is exactly `address`. Records without
/// an `.id` cannot be removed and are skipped.
pub async fn find_address_list_entries<L: DeviceLink>(
    session: &mut Session<'_, L>,
    list: &str,
    address: &str,
) -> Result<Vec<AddressListEntry>, CoreError> {
    let records = session.print(ADDRESS_LIST).await?;
    Ok(records
        .iter()
        .filter_map(|record| AddressListEntry::try_from(record).ok())
        .filter(|entry| entry.list == list && entry.address == address)
        .collect())
}

pub async fn remove_address_list_entry<L: DeviceLink>(
    session: &mut Session<'_, L>,
    id: &EntryId,
) -> Result<(), CoreError> {
    session
        .call(ADDRESS_LIST, "remove", &[(".id", id.as_str())])
        .await?;
    Ok(())
}

/// Remove every `(block_list, address)` entry. Returns how many went;
/// no match at all is `NotFound`.
pub async fn unblock_address<L: DeviceLink>(
    session: &mut Session<'_, L>,
    firewall: &FirewallConfig,
    address: &str,
) -> Result<usize, CoreError> {
    let entries = find_address_list_entries(session, &firewall.block_list, address).await?;
    if entries.is_empty() {
        return Err(CoreError::NotFound {
            what: address.to_owned(),
        });
    }
    for entry in &entries {
        remove_address_list_entry(session, &entry.id).await?;
    }
    Ok(entries.len())
}
