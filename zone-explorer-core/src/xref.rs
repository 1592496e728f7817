//! Zone id → zone name lookup for member scopes

use std::collections::HashMap;

use zone_explorer_provider::Member;

use crate::types::AppZone;

/// Scope key prefix of a zone-scoped resource group.
pub const ZONE_SCOPE_PREFIX: &str = "com.cloudflare.api.account.zone.";

/// Build a zone-id→name map from an account's cached zones. Absent → empty.
pub fn zone_name_lookup(zones: Option<&[AppZone]>) -> HashMap<String, String> {
    zones
        .unwrap_or_default()
        .iter()
        .map(|z| (z.id.clone(), z.name.clone()))
        .collect()
}

/// Zone id encoded in a resource-group scope key, if it is zone-scoped.
pub fn scope_zone_id(scope_key: &str) -> Option<&str> {
    scope_key
        .strip_prefix(ZONE_SCOPE_PREFIX)
        .filter(|id| !id.is_empty() && *id != "*")
}

/// Distinct zone ids a member's policies are scoped to, in policy order.
pub fn member_zone_ids(member: &Member) -> Vec<&str> {
    let mut ids: Vec<&str> = Vec::new();
    let keys = member
        .policies
        .iter()
        .flat_map(|p| &p.resource_groups)
        .flat_map(|g| &g.scope_keys);
    for id in keys.filter_map(|k| scope_zone_id(k)) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Names of the zones a member is scoped to. Ids missing from `lookup` are
/// shown as-is.
pub fn member_scope_names(member: &Member, lookup: &HashMap<String, String>) -> Vec<String> {
    member_zone_ids(member)
        .into_iter()
        .map(|id| lookup.get(id).cloned().unwrap_or_else(|| id.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{app_zone, member};

    #[test]
    fn lookup_from_absent_zones_is_empty() {
        assert!(zone_name_lookup(None).is_empty());
    }

    #[test]
    fn lookup_maps_ids_to_names() {
        let zones = vec![
            app_zone("acc", "z1", "example.com"),
            app_zone("acc", "z2", "example.org"),
        ];
        let lookup = zone_name_lookup(Some(zones.as_slice()));
        assert_eq!(lookup.get("z2").map(String::as_str), Some("example.org"));
    }

    #[test]
    fn scope_keys() {
        assert_eq!(scope_zone_id("com.cloudflare.api.account.zone.abc"), Some("abc"));
        assert_eq!(scope_zone_id("com.cloudflare.api.account.abc"), None);
        assert_eq!(scope_zone_id("com.cloudflare.api.account.zone."), None);
        assert_eq!(scope_zone_id("com.cloudflare.api.account.zone.*"), None);
        assert_eq!(scope_zone_id("*"), None);
    }

    #[test]
    fn unknown_zone_falls_back_to_raw_id() {
        let m = member("m1", "dev@example.com", &["z1", "z9", "z1"]);
        let zones = vec![app_zone("acc", "z1", "example.com")];
        let names = member_scope_names(&m, &zone_name_lookup(Some(zones.as_slice())));
        assert_eq!(names, vec!["example.com", "z9"]);
    }
}
