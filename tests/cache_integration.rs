use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use svcmap::{AnalysisCache, ManifestFacts, ProjectAnalysis, ProjectAnalyzer, TreeScanner};
use tempfile::TempDir;

const WRITERS: usize = 8;

fn empty_analysis(path: &Path) -> ProjectAnalysis {
    ProjectAnalysis::new(
        path.to_path_buf(),
        vec![],
        ManifestFacts::default(),
        vec![],
        vec![],
    )
}

fn project_dirs(root: &Path, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let dir = root.join(format!("project_{i}"));
            fs::create_dir_all(&dir).unwrap();
            dir
        })
        .collect()
}

#[test]
fn test_concurrent_writers_all_retrievable() {
    let root = TempDir::new().unwrap();
    let dirs = project_dirs(root.path(), WRITERS);
    let cache = AnalysisCache::default();

    thread::scope(|s| {
        for dir in &dirs {
            let cache = &cache;
            s.spawn(move || cache.put(dir, empty_analysis(dir)));
        }
    });

    assert_eq!(cache.len(), WRITERS);
    for dir in &dirs {
        let cached = cache.get(dir).unwrap();
        assert_eq!(cached.project_path(), dir.as_path());
    }
}

#[test]
fn test_concurrent_readers_and_writers_on_one_path() {
    let root = TempDir::new().unwrap();
    let cache = AnalysisCache::default();
    cache.put(root.path(), empty_analysis(root.path()));

    thread::scope(|s| {
        for _ in 0..WRITERS {
            s.spawn(|| {
                for _ in 0..50 {
                    assert!(cache.get(root.path()).is_some());
                    cache.put(root.path(), empty_analysis(root.path()));
                }
            });
        }
    });

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().hits, (WRITERS * 50) as u64);
}

#[test]
fn test_analyzers_sharing_a_cache() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("user.api"),
        "service user-api {\n  @handler Ping\n  get /ping\n}\n",
    )
    .unwrap();
    let cache = Arc::new(AnalysisCache::new(Duration::from_secs(60)));

    let first = ProjectAnalyzer::new(TreeScanner::default(), Arc::clone(&cache));
    let second = ProjectAnalyzer::new(TreeScanner::default(), Arc::clone(&cache));

    let scanned = first.analyze(root.path()).unwrap();
    let cached = second.analyze(root.path()).unwrap();

    assert!(!scanned.from_cache);
    assert!(cached.from_cache);
    assert_eq!(cached.analysis.summary().total_endpoints, 1);
    assert_eq!(cache.stats().hits, 1);
}

#[test]
fn test_parallel_analyze_calls_agree() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("order.proto"),
        "service Order {\n  rpc Get(Req) returns (Resp);\n}\n",
    )
    .unwrap();
    let analyzer = ProjectAnalyzer::new(TreeScanner::default(), Arc::new(AnalysisCache::default()));

    let totals: Vec<usize> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| analyzer.analyze(root.path()).unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().analysis.summary().total_rpc_methods)
            .collect()
    });

    assert_eq!(totals, vec![1; 4]);
    assert_eq!(analyzer.cache().len(), 1);
}
