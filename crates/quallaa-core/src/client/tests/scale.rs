use std::collections::HashSet;
use std::fmt::Write as _;

use super::{open_workspace, write_note};

// A medium vault: 1000 notes, 5 outgoing links each, all resolvable.
#[test]
fn thousand_note_vault_scans_fully_connected() {
    let (temp, app) = open_workspace();
    for i in 0..1000usize {
        let mut body = String::new();
        for j in 0..5usize {
            let target = (i * 7 + j * 13) % 1000;
            writeln!(body, "hop {j}: [[note-{target:04}]]").expect("format");
        }
        write_note(temp.path(), &format!("note-{i:04}.md"), &body);
    }

    let report = app.scan_workspace().expect("scan");
    assert_eq!(report.stats.notes, 1000);
    assert_eq!(report.stats.links, 5000);
    assert_eq!(report.stats.resolved_links, 5000);
    assert_eq!(report.stats.broken_links, 0);

    let snapshot = app.graph_snapshot().expect("snapshot");
    assert_eq!(snapshot.nodes.len(), 1000);
    assert_eq!(snapshot.edges.len(), 5000);

    let nodes: HashSet<_> = snapshot.nodes.iter().map(|node| node.key.clone()).collect();
    assert!(snapshot.edges.iter().all(|edge| nodes.contains(&edge.target)));

    // A rescan of an untouched vault reindexes nothing by content.
    let second = app.scan_workspace().expect("rescan");
    assert_eq!(second.unchanged, 1000);
    assert_eq!(second.stats, report.stats);
}
