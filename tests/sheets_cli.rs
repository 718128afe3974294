mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::str::contains;

use common::solid_png;

fn cmd() -> Command {
    cargo_bin_cmd!("sheets")
}

#[test]
fn fourteen_badges_three_sheets() {
    let badges = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    for i in 0..14 {
        solid_png(&badges.path().join(format!("{:02}_badge.png", i)), 20, 25, [i as u8 * 10, 0, 0]);
    }
    cmd()
        .arg("-i")
        .arg(badges.path())
        .arg("-o")
        .arg(out.path())
        .args(["--sheet-width", "120", "--sheet-height", "80", "--cell-width", "30", "--cell-height", "35"])
        .args(["--margin", "2", "--spacing", "2"])
        .assert()
        .success()
        .stdout(contains("3 sheet(s) from 14 badge(s), 0 failed"));

    for n in 1..=3 {
        assert!(out.path().join(format!("a4_sheet_{}.png", n)).is_file());
    }
    assert!(!out.path().join("a4_sheet_4.png").exists());

    // Sheet 3 holds badges 12 and 13, in that order.
    let last = image::open(out.path().join("a4_sheet_3.png")).unwrap().to_rgb8();
    assert_eq!(last.get_pixel(2, 2).0, [120, 0, 0]);
    assert_eq!(last.get_pixel(34, 2).0, [130, 0, 0]);
    assert_eq!(last.get_pixel(66, 2).0, [255, 255, 255]);
}

#[test]
fn grid_too_large_for_sheet() {
    let badges = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    cmd()
        .arg("-i")
        .arg(badges.path())
        .arg("-o")
        .arg(out.path())
        .args(["--columns", "4", "--capacity", "8"])
        .assert()
        .failure()
        .stderr(contains("Sheet layout aborted"));
}

#[test]
fn missing_badge_directory() {
    let out = tempfile::tempdir().unwrap();
    cmd()
        .arg("-i")
        .arg(out.path().join("nowhere"))
        .arg("-o")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(contains("badge directory"));
}
