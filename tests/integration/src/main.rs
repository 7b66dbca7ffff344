//! Integration Test Harness
//!
//! Runs all integration test categories and prints a summary.
//!
//! # Usage
//!
//! Run all tests:
//! ```text
//! cargo run -p integration-tests
//! ```
//!
//! Run specific test categories:
//! ```text
//! cargo test -p integration-tests --test ndr_wire_tests
//! cargo test -p integration-tests --test dispatch_tests
//! cargo test -p integration-tests --test orpc_tests
//! cargo test -p integration-tests --test csvp_tests
//! ```
//!
//! Run with increased logging:
//! ```text
//! RUST_LOG=debug cargo run -p integration-tests
//! ```

mod common;

use std::process::Command;
use std::time::{Duration, Instant};

/// Test category, one `[[test]]` target
struct TestCategory {
    name: &'static str,
    description: &'static str,
    target: &'static str,
}

const TEST_CATEGORIES: &[TestCategory] = &[
    TestCategory {
        name: "NDR Wire Tests",
        description: "Byte layout of primitives, pointers, arrays, strings and unions",
        target: "ndr_wire_tests",
    },
    TestCategory {
        name: "Dispatch Tests",
        description: "Opnum routing across interface inheritance, faults, cancellation",
        target: "dispatch_tests",
    },
    TestCategory {
        name: "ORPC Tests",
        description: "IRemUnknown and IDispatch calls through an object exporter",
        target: "orpc_tests",
    },
    TestCategory {
        name: "CSVP Tests",
        description: "IClusterStorage2 sector reads and writes against an in-memory disk",
        target: "csvp_tests",
    },
];

/// Outcome of one category run
struct CategoryRun {
    name: &'static str,
    passed: bool,
    duration: Duration,
    detail: String,
}

fn rule(c: char) -> String {
    std::iter::repeat(c).take(80).collect()
}

fn run(category: &TestCategory) -> CategoryRun {
    println!("\n{}\nRunning: {} ({})\n{}", rule('='), category.name, category.description, rule('='));

    let start = Instant::now();
    let output = Command::new("cargo")
        .args(["test", "-p", "integration-tests", "--test", category.target, "--", "--nocapture"])
        .output();
    let duration = start.elapsed();

    let (passed, detail) = match output {
        Ok(output) => {
            print!("{}", String::from_utf8_lossy(&output.stdout));
            eprint!("{}", String::from_utf8_lossy(&output.stderr));
            match output.status.code() {
                Some(0) => (true, "PASSED".to_string()),
                code => (false, format!("FAILED (exit code: {:?})", code)),
            }
        }
        Err(e) => (false, format!("could not run cargo: {}", e)),
    };

    CategoryRun {
        name: category.name,
        passed,
        duration,
        detail,
    }
}

fn print_summary(runs: &[CategoryRun], total: Duration) -> usize {
    let failed = runs.iter().filter(|run| !run.passed).count();

    println!("\n{}\nSUMMARY\n{}", rule('='), rule('='));
    println!(
        "{} categories, {} passed, {} failed in {:?}\n",
        runs.len(),
        runs.len() - failed,
        failed,
        total
    );
    println!("{:<30} {:<8} {:<15} {}", "Category", "Status", "Duration", "Details");
    println!("{}", rule('-'));
    for run in runs {
        let status = if run.passed { "PASS" } else { "FAIL" };
        println!("{:<30} {:<8} {:<15?} {}", run.name, status, run.duration, run.detail);
    }
    println!("{}", rule('='));
    failed
}

fn main() {
    common::init_logging();

    println!("{}\n  NDR / ORPC integration suite\n{}", rule('='), rule('='));
    for (i, category) in TEST_CATEGORIES.iter().enumerate() {
        println!("  {}. {} [{}]", i + 1, category.name, category.target);
    }

    let start = Instant::now();
    let runs: Vec<CategoryRun> = TEST_CATEGORIES.iter().map(run).collect();

    if print_summary(&runs, start.elapsed()) > 0 {
        std::process::exit(1);
    }
}
