//! URL path helpers

/// Join URL path segments with exactly one `/` between them.
///
/// The first segment keeps its leading part untouched (scheme, host, or a
/// leading `/`); empty segments are skipped. No trailing slash is added.
pub fn path_join<S: AsRef<str>>(parts: &[S]) -> String {
    let mut iter = parts.iter();
    let mut out = match iter.next() {
        Some(first) => first.as_ref().trim_end_matches('/').to_string(),
        None => return String::new(),
    };
    for part in iter {
        let part = part.as_ref().trim_matches('/');
        if part.is_empty() {
            continue;
        }
        out.push('/');
        out.push_str(part);
    }
    out
}
