//! Header precedence
//!
//! Final headers are built fresh for every request from three read-only
//! layers; nothing is shared or mutated between calls.

use http::HeaderMap;

/// Merge header layers, lowest precedence first.
///
/// Precedence: `per_call` > `defaults` > `injected`. A name present in a
/// higher layer replaces every value of that name from lower layers. Names
/// compare case-insensitively.
pub fn merge_headers(injected: &HeaderMap, defaults: &HeaderMap, per_call: &HeaderMap) -> HeaderMap {
    let mut merged = injected.clone();
    for layer in [defaults, per_call] {
        for name in layer.keys() {
            merged.remove(name);
            for value in layer.get_all(name) {
                merged.append(name.clone(), value.clone());
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use pretty_assertions::assert_eq;

    fn map(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (k, v) in pairs {
            headers.append(*k, HeaderValue::from_static(v));
        }
        headers
    }

    #[test]
    fn test_per_call_beats_defaults_beats_injected() {
        let injected = map(&[("authorization", "Bearer t"), ("abstract-api-version", "22")]);
        let defaults = map(&[("abstract-api-version", "8"), ("user-agent", "sdk")]);
        let per_call = map(&[("User-Agent", "custom")]);

        let merged = merge_headers(&injected, &defaults, &per_call);

        assert_eq!(merged["authorization"], "Bearer t");
        assert_eq!(merged["abstract-api-version"], "8");
        assert_eq!(merged["user-agent"], "custom");
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_higher_layer_replaces_all_values() {
        let injected = map(&[("accept", "a"), ("accept", "b")]);
        let per_call = map(&[("accept", "c")]);

        let merged = merge_headers(&injected, &HeaderMap::new(), &per_call);
        let values: Vec<_> = merged.get_all("accept").iter().collect();
        assert_eq!(values, vec!["c"]);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let injected = map(&[("x-a", "1")]);
        let defaults = map(&[("x-a", "2")]);
        let _ = merge_headers(&injected, &defaults, &HeaderMap::new());
        assert_eq!(injected["x-a"], "1");
        assert_eq!(defaults["x-a"], "2");
    }
}
