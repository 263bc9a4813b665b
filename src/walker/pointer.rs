use serde_json::Value;

pub const ROOT: &str = "#";

/// Resolve a local `$ref` (`#`, `#/$defs/Name`, any `#/json/pointer`).
/// External documents are not fetched.
pub fn resolve<'r>(root: &'r Value, reference: &str) -> Option<&'r Value> {
    let pointer = reference.strip_prefix(ROOT)?;
    if pointer.is_empty() {
        return Some(root);
    }
    root.pointer(pointer)
}

/// Last pointer segment, unescaped; used as a naming hint.
pub fn last_segment(reference: &str) -> Option<String> {
    let pointer = reference.strip_prefix(ROOT)?;
    pointer
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
}

pub fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// `$defs` (or legacy `definitions`) of the root document, in document order.
pub fn definitions(root: &Value) -> impl Iterator<Item = (String, &Value)> {
    ["$defs", "definitions"].into_iter().flat_map(move |container| {
        root.get(container)
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(move |defs| {
                defs.iter().map(move |(key, schema)| (format!("{ROOT}/{container}/{}", escape(key)), schema))
            })
    })
}
