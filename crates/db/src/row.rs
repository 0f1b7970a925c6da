//! The dialect-agnostic row projection.

/// One furniture row, normalized across dialects.
///
/// `sprite_id` is the join key to the catalog item id; `id` is the row's own
/// surrogate key, used only for duplicate collapsing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedDbRow {
    pub id: i64,
    pub sprite_id: i64,
    pub item_name: String,
    pub public_name: String,
    pub width: i64,
    pub length: i64,
    pub can_sit: bool,
    pub can_walk: bool,
    pub can_lay: bool,
}
