use std::fs;

use super::*;

const KERNEL: &str = "#include <cuda_runtime.h>\n\
                      __global__ void k(float* p) {}\n\
                      int main() { float* p; cudaMalloc(&p, 4); k<<<1, 1>>>(p); cudaFree(p); }\n";

fn tables() -> RenameTables {
    RenameTables::builtin()
}

#[test]
fn test_convert_source() {
    let conv = convert_source(KERNEL, &tables(), &ConvertOptions::default()).unwrap();
    let out = apply_edits(KERNEL, &conv.edits);
    assert!(out.starts_with("#include <hip/hip_runtime.h>\n"));
    assert!(out.contains("hipMalloc(&p, 4); hipLaunchKernelGGL(k, dim3(1), dim3(1), 0, 0, p); hipFree(p);"));
}

#[test]
fn test_convert_path_and_write_sibling() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("k.cu");
    fs::write(&input, KERNEL).unwrap();

    let file = convert_path(&input, &tables(), &ConvertOptions::default()).unwrap();
    assert!(!file.is_unchanged());
    assert_eq!(file.source, KERNEL);

    let written = write_output(&file, &OutputMode::Sibling).unwrap().unwrap();
    assert_eq!(written, dir.path().join("k.cu.hip"));
    assert_eq!(fs::read_to_string(&written).unwrap(), file.output);
    assert_eq!(fs::read_to_string(&input).unwrap(), KERNEL);
}

#[test]
fn test_inplace_keeps_backup() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("k.cu");
    fs::write(&input, KERNEL).unwrap();

    let file = convert_path(&input, &tables(), &ConvertOptions::default()).unwrap();
    write_output(&file, &OutputMode::InPlace { backup: true }).unwrap();
    assert_eq!(fs::read_to_string(&input).unwrap(), file.output);
    assert_eq!(
        fs::read_to_string(dir.path().join("k.cu.prehip")).unwrap(),
        KERNEL
    );
}

#[test]
fn test_no_output_mode_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("k.cu");
    fs::write(&input, KERNEL).unwrap();

    let file = convert_path(&input, &tables(), &ConvertOptions::default()).unwrap();
    assert_eq!(write_output(&file, &OutputMode::None).unwrap(), None);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.cu");
    let err = convert_path(&missing, &tables(), &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, FileError::Read { .. }));
    assert_eq!(err.path(), missing.as_path());
    assert!(err.to_string().starts_with("cannot read"));
}

#[test]
fn test_batch_keeps_input_order_and_sums_stats() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = Vec::new();
    for i in 0..8 {
        let path = dir.path().join(format!("k{}.cu", i));
        fs::write(&path, KERNEL).unwrap();
        paths.push(path);
    }
    paths.insert(3, dir.path().join("missing.cu"));

    let report = convert_batch(&paths, &tables(), &ConvertOptions::default());
    assert_eq!(report.results.len(), 9);
    for (path, result) in paths.iter().zip(&report.results) {
        match result {
            Ok(file) => assert_eq!(&file.path, path),
            Err(e) => assert_eq!(e.path(), path.as_path()),
        }
    }
    assert_eq!(report.failed(), 1);
    assert_eq!(report.stats.files_converted, 8);
    assert_eq!(report.stats.files_failed, 1);
    assert_eq!(report.stats.counters["cudaMalloc"].count, 8);
    assert_eq!(report.stats.counters["cudaLaunchKernel"].count, 8);
}
