use std::process::Command;

use chrono::TimeZone;

/// Short commit hash, or "dev" outside a git checkout.
fn commit_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "dev".to_string())
}

/// Local build time with the zone abbreviation, e.g. `2026-03-01 18:04 CET`.
fn build_stamp() -> String {
    let now = chrono::Local::now();
    let zone = iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse::<chrono_tz::Tz>().ok())
        .map(|tz| tz.from_utc_datetime(&now.naive_utc()).format("%Z").to_string())
        .unwrap_or_default();
    format!("{} {}", now.format("%Y-%m-%d %H:%M"), zone)
        .trim_end()
        .to_string()
}

fn main() {
    println!("cargo:rustc-env=INKWELL_BUILD_HASH={}", commit_hash());
    println!("cargo:rustc-env=INKWELL_BUILD_STAMP={}", build_stamp());

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
}
