use std::collections::HashMap;

/// Name-value mapping carried by SYN_STREAM, SYN_REPLY and HEADERS frames.
/// A name can have more than one value and the order of the values of one
/// name is the order in which they were added.
pub type Headers = HashMap<String, Vec<String>>;

/// Append a value to the values of a name.
pub fn add(headers: &mut Headers, name: &str, value: &str) {
    headers.entry(name.to_string()).or_default().push(value.to_string());
}

/// Add the contents of `new_headers` to `headers`. The merge is additive,
/// values already present are kept and the new ones are appended after them.
pub fn merge(headers: &mut Headers, new_headers: &Headers) {
    for (name, values) in new_headers {
        for value in values {
            add(headers, name, value);
        }
    }
}
