use super::*;

fn runtime(stats: &mut Statistics, name: &str, unsupported: bool) {
    stats.record(
        name,
        ConvKind::Memory,
        ApiFamily::Runtime,
        SupportTier::Full,
        unsupported,
    );
}

#[test]
fn test_record_counts_per_name() {
    let mut s = Statistics::new();
    runtime(&mut s, "cudaMalloc", false);
    runtime(&mut s, "cudaMalloc", false);
    runtime(&mut s, "cudaSetValidDevices", true);
    assert_eq!(s.counters["cudaMalloc"].count, 2);
    assert_eq!(s.converted, 2);
    assert_eq!(s.unsupported, 1);
    assert!((s.conversion_percent() - 66.666).abs() < 0.01);
}

#[test]
fn test_touched_lines_are_distinct() {
    let mut s = Statistics::new();
    s.line_touched(3);
    s.line_touched(3);
    s.line_touched(7);
    s.bytes_changed(10);
    s.bytes_changed(0);
    assert_eq!(s.lines_touched(), 2);
    assert_eq!(s.bytes_changed, 10);
}

#[test]
fn test_merge_is_additive() {
    let mut a = Statistics::new();
    runtime(&mut a, "cudaFree", false);
    a.line_touched(1);
    a.bytes_changed(8);
    a.files_converted = 1;

    let mut b = Statistics::new();
    runtime(&mut b, "cudaFree", false);
    runtime(&mut b, "cudaMalloc", false);
    b.line_touched(1);
    b.line_touched(2);
    b.files_converted = 1;

    let mut total = Statistics::new();
    total.merge(&a);
    total.merge(&b);
    assert_eq!(total.counters["cudaFree"].count, 2);
    assert_eq!(total.counters["cudaMalloc"].count, 1);
    assert_eq!(total.converted, 3);
    // Line 1 of two different files counts twice.
    assert_eq!(total.lines_touched(), 3);
    assert_eq!(total.bytes_changed, 8);
    assert_eq!(total.files_converted, 2);
}

#[test]
fn test_shared_statistics_from_threads() {
    let shared = SharedStatistics::new();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let mut s = Statistics::new();
                runtime(&mut s, "cudaMemcpy", false);
                shared.add(&s);
            });
        }
    });
    let total = shared.into_inner();
    assert_eq!(total.counters["cudaMemcpy"].count, 4);
}

#[test]
fn test_render_lists_names_and_types() {
    let mut s = Statistics::new();
    runtime(&mut s, "cudaMalloc", false);
    runtime(&mut s, "cudaSetValidDevices", true);
    let text = s.render("a.cu");
    assert!(text.contains("CONVERTED refs count: 1"), "{}", text);
    assert!(text.contains("memory: 1"), "{}", text);
    assert!(text.contains("CUDA RT API: 1"), "{}", text);
    assert!(text.contains("UNCONVERTED refs by names:\n    cudaSetValidDevices: 1"), "{}", text);
}

#[test]
fn test_json_report() {
    let mut s = Statistics::new();
    runtime(&mut s, "cudaMalloc", false);
    let json: serde_json::Value = serde_json::from_str(&s.to_json()).unwrap();
    assert_eq!(json["converted"], 1);
    assert_eq!(json["counters"]["cudaMalloc"]["kind"], "memory");
    assert_eq!(json["counters"]["cudaMalloc"]["api"], "runtime");
}
