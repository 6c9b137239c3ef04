//! Cursor/offset pagination over a [`StoreMap`].
//!
//! One iterator abstraction serves both modules: a resumable ascending scan
//! keyed by the last returned record key. Offset, limit, and total-count are
//! derived views over that scan, so no module duplicates paging logic.
//!
//! Cursors are the base64 of the last returned key and are opaque to
//! callers; a request may carry a cursor or an offset, never both.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::ModuleError;
use crate::store::StoreMap;

/// Cap applied when a request leaves `limit` unset (zero).
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Paging directive attached to a list query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Opaque continuation cursor from a previous response. Resumes the scan
    /// strictly after the record it encodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Number of records to skip from the start of the ascending order.
    /// Mutually exclusive with `key`.
    #[serde(default)]
    pub offset: u64,
    /// Maximum records to return. Zero means [`DEFAULT_PAGE_LIMIT`].
    #[serde(default)]
    pub limit: u64,
    /// Whether to also compute the exact total record count.
    #[serde(default)]
    pub count_total: bool,
}

/// Paging trailer attached to a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Cursor for the next page; absent when the scan is exhausted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_key: Option<String>,
    /// Exact total record count, present iff `count_total` was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

fn encode_cursor(key: &str) -> String {
    BASE64.encode(key.as_bytes())
}

fn decode_cursor(cursor: &str) -> Result<String, ModuleError> {
    let raw = BASE64
        .decode(cursor)
        .map_err(|e| ModuleError::InvalidArgument(format!("invalid pagination cursor: {e}")))?;
    String::from_utf8(raw)
        .map_err(|e| ModuleError::InvalidArgument(format!("invalid pagination cursor: {e}")))
}

/// Collect one page of records from `map` per the paging directive.
///
/// Records come back in ascending key order, at most `limit` of them, with a
/// continuation cursor while more remain. `count_total` adds the exact live
/// total, independent of the page window.
///
/// # Errors
///
/// [`ModuleError::InvalidArgument`] when both a cursor and an offset are
/// supplied, or the cursor fails to decode; [`ModuleError::Internal`] on a
/// storage fault.
pub fn paginate<V>(
    map: &StoreMap<V>,
    req: &PageRequest,
) -> Result<(Vec<(String, V)>, PageResponse), ModuleError>
where
    V: Serialize + DeserializeOwned,
{
    if req.key.is_some() && req.offset > 0 {
        return Err(ModuleError::InvalidArgument(
            "either a cursor or an offset is expected, got both".to_string(),
        ));
    }

    let limit = effective_limit(req.limit)?;
    let offset = usize::try_from(req.offset)
        .map_err(|_| ModuleError::InvalidArgument("offset out of range".to_string()))?;
    let start_after = req.key.as_deref().map(decode_cursor).transpose()?;

    // Fetch one record past the window to learn whether another page exists.
    let wanted = offset
        .checked_add(limit)
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| ModuleError::InvalidArgument("page window out of range".to_string()))?;

    let mut items = map.scan_after(start_after.as_deref(), wanted)?;
    let has_more = items.len() == wanted;
    if has_more {
        items.pop();
    }
    let page: Vec<(String, V)> = items.into_iter().skip(offset).collect();

    let next_key = if has_more {
        page.last().map(|(key, _)| encode_cursor(key))
    } else {
        None
    };
    let total = if req.count_total {
        Some(map.count()?)
    } else {
        None
    };

    Ok((page, PageResponse { next_key, total }))
}

fn effective_limit(limit: u64) -> Result<usize, ModuleError> {
    let capped = if limit == 0 { DEFAULT_PAGE_LIMIT } else { limit };
    usize::try_from(capped)
        .map_err(|_| ModuleError::InvalidArgument("limit out of range".to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::store::{MemStore, StoreEngine};

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Row {
        id: String,
    }

    fn seeded_map(keys: &[&str]) -> StoreMap<Row> {
        let engine: Arc<dyn StoreEngine> = Arc::new(MemStore::new());
        let map = StoreMap::new(engine, "row/value/");
        for key in keys {
            map.set(key, &Row { id: (*key).to_string() }).unwrap();
        }
        map
    }

    fn page_keys(page: &[(String, Row)]) -> Vec<String> {
        page.iter().map(|(k, _)| k.clone()).collect()
    }

    #[test]
    fn offset_window_selects_expected_keys() {
        let map = seeded_map(&["0", "1", "2", "3", "4"]);
        let req = PageRequest {
            offset: 2,
            limit: 2,
            ..PageRequest::default()
        };

        let (page, resp) = paginate(&map, &req).unwrap();
        assert_eq!(page_keys(&page), vec!["2", "3"]);
        assert!(resp.next_key.is_some());
    }

    #[test]
    fn offset_beyond_end_yields_empty_page() {
        let map = seeded_map(&["a", "b"]);
        let req = PageRequest {
            offset: 10,
            limit: 2,
            ..PageRequest::default()
        };

        let (page, resp) = paginate(&map, &req).unwrap();
        assert!(page.is_empty());
        assert!(resp.next_key.is_none());
    }

    #[test]
    fn cursor_chain_reproduces_full_sorted_set() {
        let map = seeded_map(&["e", "a", "c", "b", "d"]);

        let mut collected = Vec::new();
        let mut req = PageRequest {
            limit: 2,
            ..PageRequest::default()
        };
        loop {
            let (page, resp) = paginate(&map, &req).unwrap();
            collected.extend(page_keys(&page));
            match resp.next_key {
                Some(key) => req.key = Some(key),
                None => break,
            }
        }

        assert_eq!(collected, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn cursor_and_offset_together_is_invalid() {
        let map = seeded_map(&["a"]);
        let req = PageRequest {
            key: Some(encode_cursor("a")),
            offset: 1,
            ..PageRequest::default()
        };

        let err = paginate(&map, &req).unwrap_err();
        assert!(matches!(err, ModuleError::InvalidArgument(_)));
    }

    #[test]
    fn undecodable_cursor_is_invalid() {
        let map = seeded_map(&["a"]);
        let req = PageRequest {
            key: Some("%%%not-base64%%%".to_string()),
            ..PageRequest::default()
        };

        let err = paginate(&map, &req).unwrap_err();
        assert!(matches!(err, ModuleError::InvalidArgument(_)));
    }

    #[test]
    fn zero_limit_applies_default_cap() {
        let map = seeded_map(&["a", "b", "c"]);

        let (page, resp) = paginate(&map, &PageRequest::default()).unwrap();
        assert_eq!(page.len(), 3);
        assert!(resp.next_key.is_none());
    }

    #[test]
    fn count_total_is_independent_of_window() {
        let map = seeded_map(&["a", "b", "c", "d"]);
        let req = PageRequest {
            offset: 1,
            limit: 1,
            count_total: true,
            ..PageRequest::default()
        };

        let (page, resp) = paginate(&map, &req).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(resp.total, Some(4));
    }

    #[test]
    fn exhausted_scan_has_no_next_cursor() {
        let map = seeded_map(&["a", "b"]);
        let req = PageRequest {
            limit: 2,
            ..PageRequest::default()
        };

        let (page, resp) = paginate(&map, &req).unwrap();
        assert_eq!(page.len(), 2);
        assert!(resp.next_key.is_none());
    }

    proptest! {
        /// Concatenating cursor pages reproduces the full sorted set with no
        /// duplicates or omissions, for any page size >= 1.
        #[test]
        fn cursor_pagination_is_lossless(
            keys in proptest::collection::btree_set("[a-z0-9]{1,8}", 1..40),
            page_size in 1u64..=7,
        ) {
            let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
            let map = seeded_map(&key_refs);

            let mut collected = Vec::new();
            let mut req = PageRequest { limit: page_size, ..PageRequest::default() };
            loop {
                let (page, resp) = paginate(&map, &req).unwrap();
                prop_assert!(page.len() <= page_size as usize);
                collected.extend(page_keys(&page));
                match resp.next_key {
                    Some(key) => req.key = Some(key),
                    None => break,
                }
            }

            let expected: Vec<String> = keys.iter().cloned().collect();
            prop_assert_eq!(collected, expected);
        }
    }
}
