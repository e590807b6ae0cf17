//! Flatten, filter and paginate capability layer trees.
//!
//! WMS and WMTS documents are fetched once and searched many times; both
//! adapters run their layers through the same steps here.

/// A node of a capabilities layer tree.
pub trait LayerNode: Sized {
    /// `Name` for WMS, `ows:Identifier` for WMTS.
    fn identity(&self) -> Option<&str>;
    fn title(&self) -> Option<&str>;
    fn abstract_text(&self) -> Option<&str>;
    fn children(&self) -> &[Self];
}

/// Leaves that carry an identity, in depth-first order. Group layers never
/// appear themselves, only their descendants do.
pub fn flatten_layers<L: LayerNode>(layers: &[L]) -> Vec<&L> {
    layers
        .iter()
        .flat_map(|layer| {
            if layer.children().is_empty() {
                if layer.identity().is_some() {
                    vec![layer]
                } else {
                    Vec::new()
                }
            } else {
                flatten_layers(layer.children())
            }
        })
        .collect()
}

/// Case-insensitive substring match against identity, then title, then
/// abstract. No text, or blank text, matches everything.
pub fn matches_text<L: LayerNode>(layer: &L, text: Option<&str>) -> bool {
    let needle = match text.map(str::trim) {
        None | Some("") => return true,
        Some(text) => text.to_lowercase(),
    };
    [layer.identity(), layer.title(), layer.abstract_text()]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// One page of an already filtered list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub matched: u32,
    pub returned: u32,
    pub next_record: u32,
    pub items: Vec<T>,
}

/// Slices `items[(start-1)..(start-1)+max]`. A start position of 0 is read
/// as 1.
///
/// `next_record` is `start_position + returned + 1`, which overshoots the
/// last record by one; callers depend on this arithmetic so it is kept as is.
/// It saturates at `u32::MAX`.
pub fn paginate<T: Clone>(items: &[T], start_position: u32, max_records: u32) -> Page<T> {
    let offset = start_position.saturating_sub(1) as usize;
    let page: Vec<T> = items
        .iter()
        .skip(offset)
        .take(max_records as usize)
        .cloned()
        .collect();
    let returned = page.len() as u32;
    Page {
        matched: items.len() as u32,
        returned,
        next_record: start_position.saturating_add(returned).saturating_add(1),
        items: page,
    }
}
