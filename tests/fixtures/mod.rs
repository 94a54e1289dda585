//! Page context documents and endpoint responses shared by the integration tests.

use serde_json::{Value, json};

pub const PAGE_ID: &str = "{5ED52178-8F06-49BE-9D4C-F191E650189E}";
pub const PAGE_CANONICAL: &str = "5ED521788F0649BE9D4CF191E650189E";
pub const PAGE_PATH: &str = "/sitecore/content/Site/Home";

pub const TEXT_ID: &str = "{AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE}";
pub const TEXT_CANONICAL: &str = "AAAAAAAABBBBCCCCDDDDEEEEEEEEEEEE";

pub const PROMO_HYPHENATED: &str = "11111111-2222-3333-4444-555555555555";
pub const PROMO_CANONICAL: &str = "11111111222233334444555555555555";

/// Page with no presentation details.
pub fn bare_page() -> Value {
    json!({
        "pageInfo": { "id": PAGE_ID, "path": PAGE_PATH }
    })
}

/// Page whose renderings reference one item by id, one page-local item,
/// one dynamic query and, inside a placeholder, the first item again.
pub fn page_with_datasources() -> Value {
    let details = json!({
        "devices": [{
            "id": "default",
            "renderings": [
                { "id": "r1", "dataSource": format!("{TEXT_ID}|local:/Data/Text 1") },
                { "id": "r2", "dataSource": "query:./*[@@templatename='Card']" }
            ],
            "placeholders": [{
                "key": "main",
                "renderings": [{ "id": "r3", "datasource": TEXT_ID.to_lowercase() }]
            }]
        }]
    });

    json!({
        "pageInfo": {
            "id": PAGE_ID,
            "path": PAGE_PATH,
            "presentationDetails": details.to_string()
        },
        "siteInfo": { "name": "Site" }
    })
}

/// `{ "path0": { "itemId": ... } }` for a single resolved path.
pub fn resolved_promo() -> Value {
    json!({ "path0": { "itemId": PROMO_HYPHENATED } })
}

/// Authoring payload for an item.
pub fn authoring_item(name: &str, version: u64) -> Value {
    json!({
        "itemId": "ignored",
        "name": name,
        "path": format!("{PAGE_PATH}/{name}"),
        "version": version,
        "template": { "name": "Sample Item" },
        "language": { "name": "en" },
        "fields": { "nodes": [] }
    })
}

/// Live payload for an item.
pub fn live_item(name: &str, version: u64) -> Value {
    json!({
        "id": "ignored",
        "name": name,
        "version": version,
        "language": { "name": "en" }
    })
}
