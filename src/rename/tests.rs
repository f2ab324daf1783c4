use super::*;

#[test]
fn test_builtin_lookup() {
    let tables = RenameTables::builtin();
    let e = tables.identifiers.get("cudaMalloc").unwrap();
    assert_eq!(e.hip, "hipMalloc");
    assert_eq!(e.kind, ConvKind::Memory);
    assert_eq!(e.api, ApiFamily::Runtime);
    assert!(!e.is_unsupported(TargetFlavor::Hip));
    assert!(tables.identifiers.get("notCuda").is_none());
}

#[test]
fn test_builtin_tables_have_no_missing_targets() {
    let tables = RenameTables::builtin();
    assert!(tables.validate(Path::new("<builtin>")).is_ok());
    assert!(!tables.headers.is_empty());
    assert!(!tables.device_functions.is_empty());
}

#[test]
fn test_target_spelling_per_flavor() {
    let tables = RenameTables::builtin();
    let blas = tables.identifiers.get("cublasCreate").unwrap();
    assert_eq!(blas.target(TargetFlavor::Hip), "hipblasCreate");
    assert_eq!(blas.target(TargetFlavor::Roc), "rocblas_create_handle");
    // No ROC spelling: falls back to HIP.
    let rt = tables.identifiers.get("cudaFree").unwrap();
    assert_eq!(rt.target(TargetFlavor::Roc), "hipFree");
}

#[test]
fn test_flavor_specific_support() {
    let e = RenameEntry::new("hipblasLtCreate", ConvKind::Other, ApiFamily::Blas)
        .with_support(SupportTier::RocUnsupported);
    assert!(!e.is_unsupported(TargetFlavor::Hip));
    assert!(e.is_unsupported(TargetFlavor::Roc));
    let partial = e.clone().with_support(SupportTier::Partial);
    assert!(!partial.is_unsupported(TargetFlavor::Roc));
}

#[test]
fn test_from_json_with_defaults() {
    let json = r#"{
        "identifiers": {
            "cuFoo": { "hip": "hipFoo", "kind": "memory" },
            "cuBar": { "hip": "", "support": "unsupported" }
        },
        "device_functions": {
            "__shfl_sync": { "hip": "__shfl", "kind": "device_func" }
        }
    }"#;
    let tables = RenameTables::from_json(json, Path::new("t.json")).unwrap();
    let foo = tables.identifiers.get("cuFoo").unwrap();
    assert_eq!(foo.api, ApiFamily::Runtime);
    assert_eq!(foo.support, SupportTier::Full);
    assert_eq!(foo.roc, "");
    assert!(tables.identifiers.get("cuBar").unwrap().is_unsupported(TargetFlavor::Hip));
    assert!(tables.headers.is_empty());
    assert_eq!(tables.device_functions.len(), 1);
}

#[test]
fn test_from_json_rejects_empty_identifier_target() {
    let json = r#"{ "identifiers": { "cuFoo": { "hip": "" } } }"#;
    let err = RenameTables::from_json(json, Path::new("t.json")).unwrap_err();
    assert!(matches!(err, TableError::EmptyTarget { ref name, .. } if name == "cuFoo"));
}

#[test]
fn test_from_json_reports_syntax_errors() {
    let err = RenameTables::from_json("{ nope", Path::new("bad.json")).unwrap_err();
    assert!(err.to_string().contains("bad.json"));
}

#[test]
fn test_overlay_wins() {
    let mut tables = RenameTables::builtin();
    let mut user = RenameTables::default();
    user.identifiers.insert(
        "cudaMalloc",
        RenameEntry::new("myMalloc", ConvKind::Memory, ApiFamily::Runtime),
    );
    tables.extend(user);
    assert_eq!(tables.identifiers.get("cudaMalloc").unwrap().hip, "myMalloc");
    assert!(tables.identifiers.get("cudaFree").is_some());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("renames.json");
    std::fs::write(&path, r#"{ "headers": { "foo_cuda.h": { "hip": "foo_hip.h", "kind": "include" } } }"#)
        .unwrap();
    let tables = RenameTables::load(&path).unwrap();
    assert_eq!(tables.headers.get("foo_cuda.h").unwrap().hip, "foo_hip.h");
    assert!(matches!(
        RenameTables::load(&dir.path().join("missing.json")),
        Err(TableError::Io { .. })
    ));
}

#[test]
fn test_lookup_all_tables() {
    let tables = RenameTables::builtin();
    let hits = tables.lookup("cuda_runtime.h");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0, "header");
    assert!(tables.lookup("printf").is_empty());
}

#[test]
fn test_flavor_from_str() {
    assert_eq!("ROC".parse::<TargetFlavor>(), Ok(TargetFlavor::Roc));
    assert!("cuda".parse::<TargetFlavor>().is_err());
}
