use crate::core::location::extract_location;
use crate::domain::model::{Event, TextBlock};

/// Picks the map center for an event.
///
/// The description is scanned first, then each block in the given order; the
/// first text with a location hint wins. Without any hint the center falls
/// back to `"<name>, <country>"`, dropping blank parts. The result is empty
/// only when name and country are both blank.
///
/// An empty center is never sent to the map service: `BatchRunner` fails the
/// event with `UnresolvableLocation` and `StaticMapClient` rejects it too,
/// since the service cannot place a marker on an empty string.
pub fn resolve_center<'a, I>(
    name: Option<&str>,
    country: Option<&str>,
    description: Option<&'a str>,
    block_texts: I,
) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    std::iter::once(description)
        .chain(block_texts.into_iter().map(Some))
        .find_map(extract_location)
        .unwrap_or_else(|| fallback_center(name, country))
}

fn fallback_center(name: Option<&str>, country: Option<&str>) -> String {
    [name, country]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Event {
    /// Center for this event given its blocks, already in priority order.
    pub fn center(&self, blocks: &[TextBlock]) -> String {
        resolve_center(
            self.name.as_deref(),
            self.country.as_deref(),
            self.description.as_deref(),
            blocks.iter().map(|b| b.content.as_str()),
        )
    }
}
