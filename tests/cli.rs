use std::fs;
use std::process::Command;

const KERNEL: &str = "#include <cuda_runtime.h>\n__global__ void k(float* p) {}\nint main() { cudaFree(0); k<<<1, 1>>>(0); }\n";

fn hipify() -> Command {
    Command::new(env!("CARGO_BIN_EXE_hipify"))
}

#[test]
fn test_examine_saves_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("k.cu");
    let stats = dir.path().join("stats.json");
    fs::write(&input, KERNEL).unwrap();

    let status = hipify()
        .arg("examine")
        .arg("--stats-json")
        .arg(&stats)
        .arg(&input)
        .status()
        .unwrap();
    assert!(status.success());
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&stats).unwrap()).unwrap();
    assert_eq!(json["counters"]["cudaFree"]["count"], 1);
    assert!(!dir.path().join("k.cu.hip").exists());
}

#[test]
fn test_unwritable_statistics_file_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("k.cu");
    fs::write(&input, KERNEL).unwrap();

    let output = hipify()
        .arg("convert")
        .arg("--no-output")
        .arg("--stats-json")
        .arg(dir.path().join("missing").join("stats.json"))
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot write"), "{}", stderr);
}
