use crate::mapper::fields::{require_fields, Fields};
use crate::mapper::{MapError, MapResult};
use serde_json::Value;

/// Fields a cursor page of ids must carry
pub const ID_PAGE_FIELDS: [&str; 2] = ["ids", "next_cursor"];

/// One step of a cursor-paginated id list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPage {
    pub ids: Vec<i64>,

    /// Cursor for the next step; `0` means the list is exhausted
    pub next_cursor: i64,
}

impl IdPage {
    pub fn is_last(&self) -> bool {
        self.next_cursor == 0
    }
}

/// Maps a `friendships/friends/ids` response
pub fn map_id_page(obj: &Value) -> MapResult<IdPage> {
    require_fields(obj, "id_page", &ID_PAGE_FIELDS)?;
    let f = Fields::new(obj, "id_page");

    let malformed = MapError::MalformedField {
        entity: "id_page",
        field: "ids",
        expected: "list of integers",
    };

    let ids = f
        .raw("ids")?
        .as_array()
        .ok_or_else(|| malformed.clone())?
        .iter()
        .map(|id| id.as_i64().ok_or_else(|| malformed.clone()))
        .collect::<MapResult<Vec<_>>>()?;

    Ok(IdPage {
        ids,
        next_cursor: f.int("next_cursor")?,
    })
}
