/// The six component kinds a `$ref` pointer can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Schemas,
    Parameters,
    RequestBodies,
    Responses,
    Headers,
    SecuritySchemes,
}

impl ComponentKind {
    fn from_section(section: &str) -> Option<Self> {
        match section {
            "schemas" => Some(Self::Schemas),
            "parameters" => Some(Self::Parameters),
            "requestBodies" => Some(Self::RequestBodies),
            "responses" => Some(Self::Responses),
            "headers" => Some(Self::Headers),
            "securitySchemes" => Some(Self::SecuritySchemes),
            _ => None,
        }
    }
}

/// Split a `$ref` string into its component kind and key. Accepts the full
/// `#/components/<kind>/<key>` form as well as a bare `<kind>/<key>` tail;
/// anything else (external files, URLs, unknown sections) yields `None` so
/// callers can skip it silently.
pub fn split_ref(ref_path: &str) -> Option<(ComponentKind, &str)> {
    let tail = ref_path
        .strip_prefix("#/components/")
        .unwrap_or(ref_path);
    let (section, key) = tail.rsplit_once('/')?;
    let section = section.rsplit('/').next().unwrap_or(section);
    if key.is_empty() {
        return None;
    }
    Some((ComponentKind::from_section(section)?, key))
}
