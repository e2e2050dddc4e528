/// Projection of a model record into the text that gets embedded
use crate::domain::entities::ModelEntry;

/// Build the descriptive text for `model`.
///
/// Parts are joined by single spaces in a fixed order: name, notes, model type,
/// developer, license, version, tags, source links. Missing parts contribute an
/// empty string, so the number of separators never changes. The text is not
/// normalized; that is left to the embedding provider.
pub fn model_text(model: &ModelEntry) -> String {
    let details = model.details();
    let tags = details.tags.join(" ");
    let source_links = details.source_links.join(" ");
    let parts: [&str; 8] = [
        details.name.as_str(),
        details.notes.as_deref().unwrap_or(""),
        details.model_type.as_deref().unwrap_or(""),
        details.developer.as_deref().unwrap_or(""),
        details.license.as_deref().unwrap_or(""),
        details.version.as_deref().unwrap_or(""),
        &tags,
        &source_links,
    ];
    parts.join(" ")
}
