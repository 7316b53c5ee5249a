use sha2::{Digest, Sha256};

/// Compute a deterministic plan hash: the plan content serialized as
/// canonical JSON (keys sorted, no insignificant whitespace), then
/// SHA-256 hex-digested. This is presence/equality-only — the
/// cryptographic validity of the plan is delegated to the external
/// MCP server (spec §9, Glossary "Plan hash").
pub fn compute_plan_hash(plan: &serde_json::Value) -> String {
    let canonical = canonicalize(plan);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Serialize a JSON value with object keys sorted recursively, so that
/// two structurally-equal values with differently-ordered keys hash
/// identically.
fn canonicalize(value: &serde_json::Value) -> String {
    fn sorted(value: &serde_json::Value) -> serde_json::Value {
        match value {
            serde_json::Value::Object(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                let mut sorted_map = serde_json::Map::new();
                for (k, v) in entries {
                    sorted_map.insert(k.clone(), sorted(v));
                }
                serde_json::Value::Object(sorted_map)
            }
            serde_json::Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(sorted).collect())
            }
            other => other.clone(),
        }
    }

    sorted(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identical_content_hashes_identically_regardless_of_key_order() {
        let a = json!({"steps": [1, 2], "title": "x"});
        let b = json!({"title": "x", "steps": [1, 2]});
        assert_eq!(compute_plan_hash(&a), compute_plan_hash(&b));
    }

    #[test]
    fn different_content_hashes_differently() {
        let a = json!({"steps": [1]});
        let b = json!({"steps": [2]});
        assert_ne!(compute_plan_hash(&a), compute_plan_hash(&b));
    }

    #[test]
    fn is_idempotent() {
        let plan = json!({"steps": [1, 2, 3]});
        assert_eq!(compute_plan_hash(&plan), compute_plan_hash(&plan));
    }

    #[test]
    fn known_digest_of_empty_object() {
        // sha256("{}"
        let empty = json!({});
        let hash = compute_plan_hash(&empty);
        assert_eq!(
            hash,
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }
}
