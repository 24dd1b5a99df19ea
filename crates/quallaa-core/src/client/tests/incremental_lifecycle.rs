use std::sync::mpsc::TryRecvError;

use super::{key, open_workspace, write_note};

#[test]
fn creating_the_target_heals_broken_links() {
    let (temp, app) = open_workspace();
    write_note(temp.path(), "daily.md", "follow up in [[Roadmap]]");
    app.scan_workspace().expect("scan");
    assert_eq!(app.broken_links().expect("broken").len(), 1);

    write_note(temp.path(), "Roadmap.md", "Q3 plans");
    app.on_created(&key("Roadmap.md"), "Q3 plans").expect("create");

    assert!(app.broken_links().expect("broken").is_empty());
    let backlinks = app.backlinks_for("Roadmap").expect("backlinks");
    assert_eq!(backlinks.len(), 1);
    assert_eq!(backlinks[0].source, key("daily.md"));
}

#[test]
fn edits_replace_the_outgoing_link_set() {
    let (temp, app) = open_workspace();
    write_note(temp.path(), "a.md", "see [[b]]");
    write_note(temp.path(), "b.md", "");
    write_note(temp.path(), "c.md", "");
    app.scan_workspace().expect("scan");

    app.on_changed(&key("a.md"), "see [[c]] instead").expect("change");

    assert!(app.backlinks_for("b").expect("backlinks").is_empty());
    let backlinks = app.backlinks_for("c").expect("backlinks");
    assert_eq!(backlinks.len(), 1);
    assert_eq!(backlinks[0].source, key("a.md"));
}

#[test]
fn unchanged_content_is_a_silent_no_op() {
    let (temp, app) = open_workspace();
    write_note(temp.path(), "a.md", "stable text");
    app.scan_workspace().expect("scan");

    let events = app.subscribe();
    app.on_changed(&key("a.md"), "stable text").expect("change");
    assert_eq!(events.try_recv().unwrap_err(), TryRecvError::Empty);

    app.on_changed(&key("a.md"), "new text").expect("change");
    assert_eq!(events.try_recv().expect("event").key, key("a.md"));
}

#[test]
fn deleting_a_note_unresolves_inbound_links() {
    let (temp, app) = open_workspace();
    write_note(temp.path(), "a.md", "[[b]]");
    write_note(temp.path(), "b.md", "");
    app.scan_workspace().expect("scan");
    assert_eq!(app.stats().expect("stats").resolved_links, 1);

    app.on_deleted(&key("b.md")).expect("delete");

    let stats = app.stats().expect("stats");
    assert_eq!(stats.notes, 1);
    assert_eq!(stats.resolved_links, 0);
    assert_eq!(stats.broken_links, 1);

    let snapshot = app.graph_snapshot().expect("snapshot");
    assert_eq!(snapshot.nodes.len(), 1);
    assert!(snapshot.edges.is_empty());
}

#[test]
fn rename_rebinds_backlinks_to_the_new_key() {
    let (temp, app) = open_workspace();
    write_note(temp.path(), "a.md", "read [[Old Name]]");
    write_note(temp.path(), "Old Name.md", "body");
    app.scan_workspace().expect("scan");

    app.on_renamed(&key("Old Name.md"), &key("New Name.md"), "body")
        .expect("rename");

    // The source still says [[Old Name]], so after the rename that link is
    // broken rather than silently rewritten.
    assert!(app.backlinks_for("New Name").expect("backlinks").is_empty());
    let broken = app.broken_links().expect("broken");
    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].raw_target, "Old Name");

    // A rename into a name the source already points at rebinds immediately.
    app.on_renamed(&key("New Name.md"), &key("Old Name.md"), "body")
        .expect("rename back");
    let backlinks = app.backlinks_for("Old Name").expect("backlinks");
    assert_eq!(backlinks.len(), 1);
    assert_eq!(backlinks[0].source, key("a.md"));
}

#[test]
fn alias_edits_cascade_to_other_notes() {
    let (temp, app) = open_workspace();
    write_note(temp.path(), "hub.md", "see [[PKB]]");
    write_note(temp.path(), "Knowledge Base.md", "");
    app.scan_workspace().expect("scan");
    assert_eq!(app.broken_links().expect("broken").len(), 1);

    app.on_changed(
        &key("Knowledge Base.md"),
        "---\naliases: [PKB]\n---\nbody",
    )
    .expect("change");

    let backlinks = app.backlinks_for("Knowledge Base").expect("backlinks");
    assert_eq!(backlinks.len(), 1);
    assert_eq!(backlinks[0].source, key("hub.md"));
}
