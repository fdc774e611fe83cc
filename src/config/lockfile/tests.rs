//! Unit tests for the lockfile document model

use super::*;

fn sample_entry(source_id: &str) -> BundleEntry {
    BundleEntry {
        version: "1.0.0".to_string(),
        source_id: source_id.to_string(),
        source_type: "github".to_string(),
        installed_at: "2026-08-04T12:00:00Z".to_string(),
        files: vec![FileChecksum::new(
            ".github/prompts/review.prompt.md",
            "blake3:abc123",
        )],
        hub: None,
        profile: None,
    }
}

#[test]
fn test_lockfile_new_has_header() {
    let doc = Lockfile::new();
    assert_eq!(doc.schema_ref, SCHEMA_REF);
    assert_eq!(doc.version, SCHEMA_VERSION);
    assert!(doc.generated_by.starts_with("promptreg@"));
    assert!(doc.is_empty());
}

#[test]
fn test_lockfile_round_trip() {
    let mut doc = Lockfile::new();
    doc.insert_bundle("code-review", sample_entry("github-0123456789ab"));
    doc.sources.insert(
        "github-0123456789ab".to_string(),
        SourceEntry::new("github", "https://github.com/acme/prompts"),
    );

    let json = doc.to_json().unwrap();
    let parsed = Lockfile::from_json(&json, LOCKFILE_NAME).unwrap();

    let entry = parsed.find_bundle("code-review").unwrap();
    assert_eq!(entry.version, "1.0.0");
    assert_eq!(entry.source_id, "github-0123456789ab");
    assert_eq!(entry.files.len(), 1);
    assert_eq!(entry.files[0].path, ".github/prompts/review.prompt.md");
}

#[test]
fn test_serialized_form_is_two_space_indented_with_trailing_newline() {
    let mut doc = Lockfile::new();
    doc.insert_bundle("b1", sample_entry("s1"));

    let json = doc.to_json().unwrap();
    assert!(json.contains("\n  \"schemaRef\""));
    assert!(json.ends_with('\n'));
}

#[test]
fn test_hubs_and_profiles_omitted_when_empty() {
    let mut doc = Lockfile::new();
    doc.insert_bundle("b1", sample_entry("s1"));

    let json = doc.to_json().unwrap();
    assert!(!json.contains("\"hubs\""));
    assert!(!json.contains("\"profiles\""));

    doc.hubs.insert(
        "my-hub".to_string(),
        HubEntry {
            name: "My Hub".to_string(),
            url: "https://hub.example.com".to_string(),
        },
    );
    let json = doc.to_json().unwrap();
    assert!(json.contains("\"hubs\""));
}

#[test]
fn test_commit_mode_key_never_serialized_and_ignored_on_read() {
    // Hand-edited documents from older tool versions may carry a stale
    // commitMode inside a bundle entry; reading must tolerate it and a
    // rewrite must drop it.
    let json = r#"{
  "schemaRef": "https://promptreg.dev/schemas/lockfile/v1.json",
  "version": "1.0.0",
  "generatedAt": "2026-08-04T12:00:00Z",
  "generatedBy": "promptreg@0.1.0",
  "bundles": {
    "b1": {
      "version": "1.0.0",
      "sourceId": "s1",
      "sourceType": "github",
      "installedAt": "2026-08-04T12:00:00Z",
      "commitMode": "local-only",
      "files": []
    }
  },
  "sources": {
    "s1": { "type": "github", "url": "https://github.com/acme/prompts" }
  }
}"#;

    let doc = Lockfile::from_json(json, LOCKFILE_NAME).unwrap();
    assert!(doc.contains("b1"));
    assert!(!doc.to_json().unwrap().contains("commitMode"));
}

#[test]
fn test_legacy_source_id_round_trips_unaltered() {
    let legacy_id = "hub-my-hub-github-source";
    let mut doc = Lockfile::new();
    doc.insert_bundle("b1", sample_entry(legacy_id));
    doc.sources.insert(
        legacy_id.to_string(),
        SourceEntry::new("github", "https://github.com/acme/prompts"),
    );

    let parsed = Lockfile::from_json(&doc.to_json().unwrap(), LOCKFILE_NAME).unwrap();
    assert!(parsed.sources.contains_key(legacy_id));
    assert_eq!(parsed.find_bundle("b1").unwrap().source_id, legacy_id);
}

#[test]
fn test_from_json_rejects_invalid_json() {
    let result = Lockfile::from_json("{ not json", LOCKFILE_NAME);
    assert!(result.is_err());
}

#[test]
fn test_prune_orphan_sources() {
    let mut doc = Lockfile::new();
    doc.insert_bundle("b1", sample_entry("s1"));
    doc.insert_bundle("b2", sample_entry("s1"));
    doc.sources.insert(
        "s1".to_string(),
        SourceEntry::new("github", "https://github.com/acme/prompts"),
    );
    doc.sources.insert(
        "s2".to_string(),
        SourceEntry::new("github", "https://github.com/acme/other"),
    );

    let pruned = doc.prune_orphan_sources();
    assert_eq!(pruned, vec!["s2".to_string()]);
    assert!(doc.sources.contains_key("s1"));

    doc.remove_bundle("b1");
    assert!(doc.prune_orphan_sources().is_empty(), "s1 still referenced");

    doc.remove_bundle("b2");
    assert_eq!(doc.prune_orphan_sources(), vec!["s1".to_string()]);
    assert!(doc.sources.is_empty());
}

#[test]
fn test_prune_orphan_refs_drops_stale_profile_members() {
    let mut doc = Lockfile::new();
    doc.insert_bundle("b1", sample_entry("s1"));
    doc.profiles.insert(
        "starter".to_string(),
        ProfileEntry {
            name: "Starter".to_string(),
            bundle_ids: vec!["b1".to_string(), "gone".to_string()],
        },
    );

    doc.prune_orphan_refs();
    assert_eq!(doc.profiles["starter"].bundle_ids, vec!["b1".to_string()]);

    doc.remove_bundle("b1");
    doc.prune_orphan_refs();
    assert!(doc.profiles.is_empty());
}

#[test]
fn test_source_id_is_deterministic() {
    let a = SourceEntry::new("github", "https://github.com/acme/prompts");
    let b = SourceEntry::new("github", "https://github.com/acme/prompts");
    assert_eq!(a.id(), b.id());

    let id = a.id();
    let (prefix, hash) = id.split_once('-').unwrap();
    assert_eq!(prefix, "github");
    assert_eq!(hash.len(), 12);

    let mut c = SourceEntry::new("github", "https://github.com/acme/prompts");
    c.branch = Some("main".to_string());
    assert_ne!(a.id(), c.id());
}
