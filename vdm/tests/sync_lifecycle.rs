//! End-to-end reconcile runs for file entries over a scripted HTTP client.

use std::fs;

use vdm::core::spec::{MetaRecord, RemoteType};
use vdm::fetch::FileFetcher;
use vdm::io::meta::read_meta;
use vdm::sync::{SyncState, reconcile};
use vdm::test_support::{ScriptedFetcher, ScriptedHttp, ScriptedResponse, file_entry};

#[test]
fn file_entries_are_fetched_once_then_skipped() {
    let temp = tempfile::tempdir().expect("tempdir");
    let proto = file_entry("https://example.test/api.proto", temp.path().join("deps/api.proto"));
    let blob = file_entry("https://example.test/blob.bin", temp.path().join("deps/blob.bin"));
    let entries = vec![proto.clone(), blob.clone()];

    let file = FileFetcher::new(ScriptedHttp::new(vec![
        ScriptedResponse::ok(b"syntax = \"proto3\";\n".to_vec()),
        ScriptedResponse::ok(vec![0, 159, 146, 150]),
    ]));
    let report = reconcile(&entries, &ScriptedFetcher::new(), &file).expect("first sync");

    assert_eq!(report.fetched(), 2);
    assert_eq!(
        file.client().requests(),
        vec![
            "https://example.test/api.proto".to_string(),
            "https://example.test/blob.bin".to_string()
        ]
    );
    assert_eq!(fs::read(&blob.destination).expect("read"), vec![0, 159, 146, 150]);
    let record = read_meta(&proto).expect("read").expect("present");
    assert_eq!(record.kind, RemoteType::File);
    assert_eq!(record.source, "https://example.test/api.proto");
    assert_eq!(record.version, "");

    let idle = FileFetcher::new(ScriptedHttp::new(Vec::new()));
    let report = reconcile(&entries, &ScriptedFetcher::new(), &idle).expect("second sync");
    assert_eq!(report.skipped(), 2);
    assert!(idle.client().requests().is_empty());
}

#[test]
fn declared_file_version_does_not_trigger_refetch() {
    let temp = tempfile::tempdir().expect("tempdir");
    let entry = file_entry("https://example.test/a.txt", temp.path().join("a.txt"));
    let file = FileFetcher::new(ScriptedHttp::new(vec![ScriptedResponse::ok(b"a".to_vec())]));
    reconcile(std::slice::from_ref(&entry), &ScriptedFetcher::new(), &file).expect("sync");

    let mut versioned = entry.clone();
    versioned.version = "v2".to_string();
    let idle = FileFetcher::new(ScriptedHttp::new(Vec::new()));
    let report =
        reconcile(std::slice::from_ref(&versioned), &ScriptedFetcher::new(), &idle).expect("sync");

    assert_eq!(report.outcomes[0].state, SyncState::Skipped);
    assert!(idle.client().requests().is_empty());
}

#[test]
fn changed_source_replaces_downloaded_content() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dest = temp.path().join("deps/schema.json");
    let old = file_entry("https://old.example/schema.json", &dest);
    let file = FileFetcher::new(ScriptedHttp::new(vec![ScriptedResponse::ok(b"old".to_vec())]));
    reconcile(std::slice::from_ref(&old), &ScriptedFetcher::new(), &file).expect("sync");

    let new = file_entry("https://new.example/schema.json", &dest);
    let file = FileFetcher::new(ScriptedHttp::new(vec![ScriptedResponse::ok(b"new".to_vec())]));
    let report = reconcile(std::slice::from_ref(&new), &ScriptedFetcher::new(), &file).expect("sync");

    assert_eq!(report.fetched(), 1);
    assert_eq!(fs::read_to_string(&dest).expect("read"), "new");
    assert_eq!(
        read_meta(&new).expect("read").expect("present"),
        MetaRecord::from_entry(&new)
    );
}

#[test]
fn failed_download_leaves_no_record() {
    let temp = tempfile::tempdir().expect("tempdir");
    let ok = file_entry("https://example.test/ok.txt", temp.path().join("ok.txt"));
    let gone = file_entry("https://example.test/gone.txt", temp.path().join("gone.txt"));
    let never = file_entry("https://example.test/never.txt", temp.path().join("never.txt"));
    let file = FileFetcher::new(ScriptedHttp::new(vec![
        ScriptedResponse::ok(b"ok".to_vec()),
        ScriptedResponse::status(404),
    ]));

    reconcile(
        &[ok.clone(), gone.clone(), never.clone()],
        &ScriptedFetcher::new(),
        &file,
    )
    .expect_err("should fail");

    assert_eq!(file.client().requests().len(), 2);
    assert!(read_meta(&ok).expect("read").is_some());
    assert!(read_meta(&gone).expect("read").is_none());
    assert!(!gone.destination.exists());
    assert!(!never.destination.exists());
}

#[test]
fn revert_after_failed_source_change_restores_the_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dest = temp.path().join("deps/f.bin");
    let old = file_entry("https://old.example/f.bin", &dest);
    let file = FileFetcher::new(ScriptedHttp::new(vec![ScriptedResponse::ok(b"old".to_vec())]));
    reconcile(std::slice::from_ref(&old), &ScriptedFetcher::new(), &file).expect("first sync");

    let new = file_entry("https://new.example/f.bin", &dest);
    let missing = FileFetcher::new(ScriptedHttp::new(vec![ScriptedResponse::status(404)]));
    reconcile(std::slice::from_ref(&new), &ScriptedFetcher::new(), &missing)
        .expect_err("404 should fail");
    assert!(!dest.exists());
    assert!(read_meta(&old).expect("read").is_none());

    let file = FileFetcher::new(ScriptedHttp::new(vec![ScriptedResponse::ok(b"old".to_vec())]));
    let report =
        reconcile(std::slice::from_ref(&old), &ScriptedFetcher::new(), &file).expect("revert");

    assert_eq!(report.outcomes[0].state, SyncState::Fetched);
    assert_eq!(file.client().requests(), vec!["https://old.example/f.bin".to_string()]);
    assert_eq!(fs::read_to_string(&dest).expect("read"), "old");
}

#[test]
fn sibling_files_sharing_a_stem_stay_idempotent() {
    let temp = tempfile::tempdir().expect("tempdir");
    let entries = vec![
        file_entry("https://example.test/api.tmp", temp.path().join("deps/api.tmp")),
        file_entry("https://example.test/api.proto", temp.path().join("deps/api.proto")),
    ];
    let file = FileFetcher::new(ScriptedHttp::new(vec![
        ScriptedResponse::ok(b"tmp".to_vec()),
        ScriptedResponse::ok(b"proto".to_vec()),
    ]));
    reconcile(&entries, &ScriptedFetcher::new(), &file).expect("first sync");
    for entry in &entries {
        assert_eq!(
            read_meta(entry).expect("read"),
            Some(MetaRecord::from_entry(entry))
        );
    }

    let idle = FileFetcher::new(ScriptedHttp::new(Vec::new()));
    let report = reconcile(&entries, &ScriptedFetcher::new(), &idle).expect("second sync");
    assert_eq!(report.skipped(), 2);
    assert!(idle.client().requests().is_empty());
}
