//! Versioned shape validation for lockfile documents
//!
//! Validation never throws: every problem is reported through
//! [`ValidationReport`] so callers can render diagnostics without unwinding.

use serde_json::Value;

use crate::config::lockfile::SCHEMA_VERSION;

/// Result of validating a lockfile document against the schema
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// True when no errors were found (warnings alone do not invalidate)
    pub valid: bool,

    /// Schema violations
    pub errors: Vec<String>,

    /// Suspicious but tolerated findings
    pub warnings: Vec<String>,

    /// Schema version the document was validated against
    pub schema_version: String,
}

impl ValidationReport {
    /// Report for a document that does not exist on disk
    pub fn missing() -> Self {
        Self {
            valid: false,
            errors: vec!["lockfile does not exist".to_string()],
            warnings: Vec::new(),
            schema_version: SCHEMA_VERSION.to_string(),
        }
    }

    /// Report for a document that could not be parsed as JSON
    pub fn unparsable(reason: &str) -> Self {
        Self {
            valid: false,
            errors: vec![format!("lockfile is not valid JSON: {reason}")],
            warnings: Vec::new(),
            schema_version: SCHEMA_VERSION.to_string(),
        }
    }
}

const HEADER_FIELDS: [&str; 4] = ["schemaRef", "version", "generatedAt", "generatedBy"];
const KNOWN_KEYS: [&str; 8] = [
    "schemaRef",
    "version",
    "generatedAt",
    "generatedBy",
    "bundles",
    "sources",
    "hubs",
    "profiles",
];

/// Validate a parsed lockfile document against the current schema
pub fn validate_value(data: &Value) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let Some(root) = data.as_object() else {
        return ValidationReport {
            valid: false,
            errors: vec!["document root must be an object".to_string()],
            warnings,
            schema_version: SCHEMA_VERSION.to_string(),
        };
    };

    for field in HEADER_FIELDS {
        if !root.get(field).is_some_and(Value::is_string) {
            errors.push(format!("missing or non-string header field '{field}'"));
        }
    }

    if let Some(version) = root.get("version").and_then(Value::as_str) {
        if !version.starts_with("1.") {
            errors.push(format!("unsupported schema version '{version}'"));
        }
    }

    for key in root.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warnings.push(format!("unknown top-level key '{key}'"));
        }
    }

    validate_bundles(root.get("bundles"), &mut errors, &mut warnings);
    validate_sources(root.get("sources"), &mut errors);
    check_source_references(root, &mut warnings);

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
        schema_version: SCHEMA_VERSION.to_string(),
    }
}

fn validate_bundles(bundles: Option<&Value>, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    let Some(bundles) = bundles else {
        errors.push("missing 'bundles' map".to_string());
        return;
    };
    let Some(bundles) = bundles.as_object() else {
        errors.push("'bundles' must be an object".to_string());
        return;
    };

    if bundles.is_empty() {
        warnings.push("document contains no bundles".to_string());
    }

    for (id, entry) in bundles {
        let Some(entry) = entry.as_object() else {
            errors.push(format!("bundle '{id}' must be an object"));
            continue;
        };

        for field in ["version", "sourceId", "sourceType", "installedAt"] {
            if !entry.get(field).is_some_and(Value::is_string) {
                errors.push(format!("bundle '{id}' missing string field '{field}'"));
            }
        }

        if entry.contains_key("commitMode") {
            warnings.push(format!(
                "bundle '{id}' carries a legacy 'commitMode' field (ignored; the document a bundle lives in decides its commit mode)"
            ));
        }

        validate_bundle_files(id, entry.get("files"), errors);
    }
}

fn validate_bundle_files(id: &str, files: Option<&Value>, errors: &mut Vec<String>) {
    let Some(files) = files.and_then(Value::as_array) else {
        errors.push(format!("bundle '{id}' missing 'files' list"));
        return;
    };

    for (index, file) in files.iter().enumerate() {
        let valid = file.as_object().is_some_and(|f| {
            f.get("path").is_some_and(Value::is_string)
                && f.get("checksum").is_some_and(Value::is_string)
        });
        if !valid {
            errors.push(format!(
                "bundle '{id}' file #{index} must be a {{path, checksum}} object"
            ));
        }
    }
}

fn validate_sources(sources: Option<&Value>, errors: &mut Vec<String>) {
    let Some(sources) = sources else {
        errors.push("missing 'sources' map".to_string());
        return;
    };
    let Some(sources) = sources.as_object() else {
        errors.push("'sources' must be an object".to_string());
        return;
    };

    for (id, entry) in sources {
        let valid = entry.as_object().is_some_and(|e| {
            e.get("type").is_some_and(Value::is_string) && e.get("url").is_some_and(Value::is_string)
        });
        if !valid {
            errors.push(format!("source '{id}' must carry string 'type' and 'url'"));
        }
    }
}

/// Bundles pointing at sources absent from the document are tolerated (the
/// id may be a legacy key another tool still maintains) but worth flagging.
fn check_source_references(root: &serde_json::Map<String, Value>, warnings: &mut Vec<String>) {
    let Some(bundles) = root.get("bundles").and_then(Value::as_object) else {
        return;
    };
    let sources = root.get("sources").and_then(Value::as_object);

    for (id, entry) in bundles {
        let Some(source_id) = entry.get("sourceId").and_then(Value::as_str) else {
            continue;
        };
        let known = sources.is_some_and(|s| s.contains_key(source_id));
        if !known {
            warnings.push(format!(
                "bundle '{id}' references unknown source '{source_id}'"
            ));
        }
    }
}
