use std::fs;
use std::io::{BufRead, Cursor};
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

use super::*;
use crate::safety::SafetyManager;
use crate::test_utils::{grey_image, MemoryCodec, RecordingViewer};
use crate::types::DuplicateGroup;
use crate::viewer::PreviewSize;

type TestSession = Session<MemoryCodec, RecordingViewer, SafetyManager>;

struct Fixture {
    dir: TempDir,
    session: TestSession,
}

impl Fixture {
    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn send(&mut self, lines: &[&str]) {
        for line in lines {
            self.session.handle_line(line);
        }
    }
}

/// Group 0: a, b, c (400x200); group 1: d, e (150x300)
fn fixture() -> Fixture {
    let dir = tempdir().unwrap();
    let mut codec = MemoryCodec::new();
    let mut file = |name: &str, width: u32, height: u32| {
        let path = dir.path().join(name);
        fs::write(&path, name).unwrap();
        codec = std::mem::take(&mut codec).with(path.clone(), grey_image(width, height, 1));
        path
    };

    let groups = vec![
        DuplicateGroup::new(vec![
            file("a.png", 400, 200),
            file("b.png", 400, 200),
            file("c.png", 400, 200),
        ]),
        DuplicateGroup::new(vec![file("d.png", 150, 300), file("e.png", 150, 300)]),
    ];

    let session = Session::new(
        DuplicateStore::new(groups),
        codec,
        RecordingViewer::default(),
        SafetyManager,
    );
    Fixture { dir, session }
}

#[test]
fn test_select_and_back() {
    let mut f = fixture();

    f.send(&["1"]);
    assert_eq!(f.session.state(), SessionState::GroupView(1));

    f.send(&["b"]);
    assert_eq!(f.session.state(), SessionState::Overview);

    f.send(&["0", "q"]);
    assert_eq!(f.session.state(), SessionState::Overview);
}

#[test]
fn test_invalid_selection_sets_status() {
    let mut f = fixture();

    f.send(&["7"]);

    assert_eq!(f.session.state(), SessionState::Overview);
    assert!(f.session.status().unwrap().contains("out of range"));
}

#[test]
fn test_malformed_input_keeps_state() {
    let mut f = fixture();
    f.send(&["0"]);
    let before = f.session.store().clone();

    for line in ["", "d", "d 9", "n x", "c 0 5", "zz", "e out.txt"] {
        assert_eq!(f.session.handle_line(line), Flow::Continue);
        assert_eq!(f.session.state(), SessionState::GroupView(0));
        assert!(f.session.status().is_some(), "no status for {:?}", line);
    }

    assert_eq!(f.session.store(), &before);
    assert!(f.session.viewer().requests.is_empty());
}

#[test]
fn test_delete_member_stays_in_group() {
    let mut f = fixture();

    f.send(&["0", "d 1"]);

    assert_eq!(f.session.state(), SessionState::GroupView(0));
    assert!(!f.path("b.png").exists());
    assert_eq!(
        f.session.store().group(0).unwrap().members(),
        &[f.path("a.png"), f.path("c.png")]
    );
}

#[test]
fn test_collapse_returns_to_overview() {
    let mut f = fixture();

    f.send(&["1", "n 0"]);

    assert_eq!(f.session.state(), SessionState::Overview);
    assert_eq!(f.session.store().group_count(), 1);
    assert!(f.path("d.png").exists());
    assert_eq!(f.session.status(), Some("Group 1 resolved"));
}

#[test]
fn test_delete_all_but_first() {
    let mut f = fixture();

    f.send(&["0", "d a"]);

    assert_eq!(f.session.state(), SessionState::Overview);
    assert!(f.path("a.png").exists());
    assert!(!f.path("b.png").exists());
    assert!(!f.path("c.png").exists());
    assert_eq!(f.session.store().group_count(), 1);
}

#[test]
fn test_failed_deletion_leaves_group() {
    let mut f = fixture();
    fs::remove_file(f.path("e.png")).unwrap();

    f.send(&["1", "d 1"]);

    assert_eq!(f.session.state(), SessionState::GroupView(1));
    assert_eq!(f.session.store().group(1).unwrap().len(), 2);
    assert!(f.session.status().unwrap().starts_with("Failed to delete"));
}

#[test]
fn test_compare_all_uses_first_image_size() {
    let mut f = fixture();

    f.send(&["0", "c a"]);

    let requests = &f.session.viewer().requests;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].paths.len(), 3);
    assert_eq!(
        requests[0].size,
        PreviewSize {
            width: 1000,
            height: 500
        }
    );
}

#[test]
fn test_compare_subset_deduplicates_indices() {
    let mut f = fixture();

    f.send(&["s 300", "1", "c 1 0 1"]);

    let requests = &f.session.viewer().requests;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].paths, vec![f.path("d.png"), f.path("e.png")]);
    assert_eq!(
        requests[0].size,
        PreviewSize {
            width: 150,
            height: 300
        }
    );
}

#[test]
fn test_compare_subset_shows_path_order() {
    let mut f = fixture();

    f.send(&["0", "c 2 0"]);

    let requests = &f.session.viewer().requests;
    assert_eq!(requests[0].paths, vec![f.path("a.png"), f.path("c.png")]);
}

#[test]
fn test_viewer_failure_is_a_status_message() {
    let mut f = fixture();
    f.session.viewer.fail = true;

    f.send(&["0", "c a"]);

    assert_eq!(f.session.state(), SessionState::GroupView(0));
    assert!(f.session.status().unwrap().contains("Viewer error"));
}

#[test]
fn test_preview_size_is_clamped() {
    let mut f = fixture();

    f.send(&["s 10"]);
    assert_eq!(f.session.largest_dimension(), MIN_LARGEST_DIMENSION);

    f.send(&["s 640"]);
    assert_eq!(f.session.largest_dimension(), 640);
}

#[test]
fn test_export_and_conflict() {
    let mut f = fixture();
    let destination = f.path("report.txt");
    let command = format!("e {}", destination.display());

    f.send(&[command.as_str()]);
    assert!(f.session.status().unwrap().starts_with("File written"));
    let written = fs::read_to_string(&destination).unwrap();
    assert_eq!(written, f.session.store().export());

    f.send(&[command.as_str()]);
    assert!(f.session.status().unwrap().starts_with("File already exists"));
    assert_eq!(fs::read_to_string(&destination).unwrap(), written);
}

#[test]
fn test_run_until_quit() {
    let mut f = fixture();
    let mut input = Cursor::new("0\nd 2\nq\nq\n");
    let mut out = Vec::new();

    f.session
        .run(|buf| input.read_line(buf), &mut out)
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("[0] 3 items"));
    assert!(text.contains("[1] 2 items"));
    assert!(text.contains(&format!("[2] {}", f.path("c.png").display())));
    assert!(!f.path("c.png").exists());
}

#[test]
fn test_run_ends_when_no_group_is_left() {
    let mut f = fixture();
    // The trailing command is never read
    let mut input = Cursor::new("0\nd a\n0\nd a\nq\n");
    let mut out = Vec::new();

    f.session
        .run(|buf| input.read_line(buf), &mut out)
        .unwrap();

    assert!(f.session.store().is_empty());
    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with("No duplicate groups left to review.\n"));
    let mut rest = String::new();
    input.read_line(&mut rest).unwrap();
    assert_eq!(rest, "q\n");
}

#[test]
fn test_run_stops_at_end_of_input() {
    let mut f = fixture();
    let mut input = Cursor::new("1\n");
    let mut out = Vec::new();

    f.session
        .run(|buf| input.read_line(buf), &mut out)
        .unwrap();

    assert_eq!(f.session.state(), SessionState::GroupView(1));
    assert_eq!(f.session.store().group_count(), 2);
}

#[test]
fn test_status_is_shown_once() {
    let mut f = fixture();
    let mut input = Cursor::new("x\n\n");
    let mut out = Vec::new();

    f.session.run(|buf| input.read_line(buf), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("'x' is not a group number").count(), 1);
}

#[test]
fn test_clear_screen_is_optional() {
    let f = fixture();
    let mut plain = Vec::new();
    f.session.render(&mut plain).unwrap();
    assert!(plain.starts_with(HEADER.as_bytes()));

    let session = f.session.with_clear_screen(true);
    let mut cleared = Vec::new();
    session.render(&mut cleared).unwrap();
    assert!(cleared.starts_with(CLEAR_SCREEN.as_bytes()));
}
