//! Test for connection retry logic
//!
//! Run with: cargo test --test connection_retry_test -- --nocapture

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use centavo_core::adapters::duckdb::DuckDbRepository;

/// Test that concurrent connection attempts work with retry logic
#[test]
fn test_concurrent_connections() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.duckdb");

    // Create initial database
    {
        let repo = DuckDbRepository::new(&db_path).unwrap();
        repo.ensure_schema().unwrap();
    }

    // Use a barrier to synchronize thread starts
    let barrier = Arc::new(Barrier::new(3));
    let db_path = Arc::new(db_path);

    let mut handles = vec![];

    // Spawn 3 threads that all try to open connections simultaneously
    for i in 0..3 {
        let barrier = Arc::clone(&barrier);
        let db_path = Arc::clone(&db_path);

        let handle = thread::spawn(move || {
            // Wait for all threads to be ready
            barrier.wait();

            let start = Instant::now();
            println!("Thread {}: Attempting to open connection...", i);

            match DuckDbRepository::new(&db_path) {
                Ok(_repo) => {
                    let elapsed = start.elapsed();
                    println!("Thread {}: SUCCESS after {:?}", i, elapsed);
                    // Hold the connection briefly to create contention
                    thread::sleep(Duration::from_millis(100));
                    Ok(elapsed)
                }
                Err(e) => {
                    let elapsed = start.elapsed();
                    println!("Thread {}: FAILED after {:?}: {}", i, elapsed, e);
                    Err(e.to_string())
                }
            }
        });

        handles.push(handle);
    }

    // Collect results
    let mut successes = 0;
    let mut failures = 0;

    for handle in handles {
        match handle.join().unwrap() {
            Ok(_) => successes += 1,
            Err(_) => failures += 1,
        }
    }

    println!("\nResults: {} successes, {} failures", successes, failures);

    // All should succeed (with retries)
    assert_eq!(
        successes, 3,
        "All connections should succeed with retry logic"
    );
    assert_eq!(failures, 0, "No connections should fail");
}

/// Test that multiple sequential connections work
/// Note: On macOS/Linux, DuckDB allows concurrent read connections,
/// so we test that connections can be opened sequentially without issues.
/// The retry logic primarily helps on Windows where file locking is stricter.
#[test]
fn test_sequential_connections() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test_sequential.duckdb");

    // Open and close connections multiple times
    for i in 0..5 {
        let start = Instant::now();
        let repo = DuckDbRepository::new(&db_path).unwrap();
        repo.ensure_schema().unwrap();
        let elapsed = start.elapsed();
        println!("Connection {}: opened in {:?}", i, elapsed);
        // Connection dropped at end of loop
    }

    println!("All sequential connections succeeded");
}
