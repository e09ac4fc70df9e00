//! End-to-end engine scenarios.
//!
//! These tests drive the public `GridEngine` surface the way a host
//! application would: seed, edit, paste, sync, undo/redo, and observe
//! events through a collector.

use std::cell::RefCell;
use std::rc::Rc;

use mapgrid_config::EngineSettings;
use mapgrid_core::{ColumnId, EditRegion, RowId};
use serde_json::json;

use crate::column::{Column, StaticColumn};
use crate::edits::RegionEdit;
use crate::events::{EventCollector, GridEvent};
use crate::grid::GridEngine;
use crate::layout::ColumnLayout;
use crate::mapping::MappingCell;
use crate::rows::Row;

fn mapping_engine() -> GridEngine {
    GridEngine::new(
        vec![Row::new("A"), Row::new("B"), Row::new("C")],
        Vec::new(),
        vec![
            Column::new("X"),
            Column::new("Y"),
            Column::new("Z"),
            Column::decomposed("W", "spec", "unit"),
        ],
        vec![StaticColumn::new("name")],
        ColumnLayout::flat(&["name", "X", "Y", "Z", "W_spec", "W_unit"]),
        &EngineSettings::default(),
    )
}

#[test]
fn undo_redo_symmetry_over_many_commits() {
    let mut engine = mapping_engine();
    let commits = 6;
    for i in 0..commits {
        engine.set_cell(&RowId::from("A"), "X", json!(format!("v{i}")));
    }
    let final_rows = engine.rows().to_vec();
    let final_cells = engine.cells().to_vec();

    for _ in 0..commits {
        assert!(engine.undo());
    }
    assert!(!engine.can_undo());
    assert_eq!(engine.get(&RowId::from("A"), &ColumnId::from("X")), json!(""));

    for _ in 0..commits {
        assert!(engine.redo());
    }
    assert!(!engine.can_redo());
    assert_eq!(engine.rows(), final_rows.as_slice());
    assert_eq!(engine.cells(), final_cells.as_slice());
}

#[test]
fn redo_invalidated_by_fresh_commit() {
    let mut engine = mapping_engine();
    engine.set_cell(&RowId::from("A"), "X", json!("1"));
    engine.set_cell(&RowId::from("A"), "X", json!("2"));
    engine.undo();
    assert!(engine.can_redo());

    engine.set_cell(&RowId::from("A"), "Y", json!("9"));
    assert!(!engine.can_redo());
}

#[test]
fn paste_region_is_one_undo_step() {
    let mut engine = mapping_engine();
    let before = engine.history_len();

    // 3x3 paste over three mapping columns.
    let edit = RegionEdit::new(
        EditRegion::new(0, 3, vec!["X".into(), "Y".into(), "Z".into()]),
        (0..3)
            .map(|r| (0..3).map(|c| Some(json!(format!("{r}{c}")))).collect())
            .collect(),
    );
    assert!(engine.apply_region(&edit));
    assert_eq!(engine.history_len(), before + 1);
    assert_eq!(engine.cells().len(), 9);

    // One undo clears the entire paste.
    engine.undo();
    assert!(engine.cells().is_empty());
}

#[test]
fn history_cap_discards_oldest() {
    let settings = EngineSettings {
        history_cap: 50,
        ..EngineSettings::default()
    };
    let mut engine = GridEngine::new(
        vec![Row::new("A")],
        Vec::new(),
        vec![Column::new("X")],
        Vec::new(),
        ColumnLayout::flat(&["X"]),
        &settings,
    );

    for i in 0..60 {
        engine.set_cell(&RowId::from("A"), "X", json!(i.to_string()));
    }
    assert_eq!(engine.history_len(), 50);

    // Walking all the way back lands on commit 10, not the seed state.
    while engine.can_undo() {
        engine.undo();
    }
    assert_eq!(engine.get(&RowId::from("A"), &ColumnId::from("X")), json!("10"));
}

#[test]
fn removing_a_row_filters_its_mappings() {
    let settings = EngineSettings::default();
    let mut engine = GridEngine::new(
        vec![Row::new("1"), Row::new("2")],
        vec![
            MappingCell::new("1", "X", json!("a")),
            MappingCell::new("2", "X", json!("b")),
        ],
        vec![Column::new("X")],
        Vec::new(),
        ColumnLayout::flat(&["X"]),
        &settings,
    );
    assert_eq!(engine.cells().len(), 2);

    engine.sync_rows(vec![Row::new("1")]);
    assert_eq!(engine.cells().len(), 1);
    assert_eq!(engine.cells()[0].row, RowId::from("1"));
}

#[test]
fn decomposed_round_trip_both_write_orders() {
    for order in [[(0usize, "24"), (1usize, "bit")], [(1, "bit"), (0, "24")]] {
        let mut engine = mapping_engine();
        for (part, text) in order {
            let prop = if part == 0 { "W_spec" } else { "W_unit" };
            assert!(engine.set_cell(&RowId::from("A"), prop, json!(text)));
        }
        assert_eq!(
            engine.get(&RowId::from("A"), &ColumnId::from("W")),
            json!(["24", "bit"])
        );
    }
}

#[test]
fn paste_region_mixed_static_and_dynamic() {
    let mut engine = mapping_engine();
    let before = engine.history_len();

    let edit = RegionEdit::new(
        EditRegion::new(0, 2, vec!["name".into(), "X".into()]),
        vec![
            vec![Some(json!("first")), Some(json!("10"))],
            vec![Some(json!("second")), None],
        ],
    );
    assert!(engine.apply_region(&edit));

    // Static and dynamic halves both applied, one history entry total.
    assert_eq!(engine.history_len(), before + 1);
    assert_eq!(engine.rows()[0].field("name"), json!("first"));
    assert_eq!(engine.rows()[1].field("name"), json!("second"));
    assert_eq!(engine.get(&RowId::from("A"), &ColumnId::from("X")), json!("10"));
    // The None cell left B's mapping untouched.
    assert_eq!(engine.get(&RowId::from("B"), &ColumnId::from("X")), json!(""));
}

#[test]
fn region_of_only_skipped_cells_creates_no_history() {
    let mut engine = mapping_engine();
    let before = engine.history_len();

    let edit = RegionEdit::new(
        EditRegion::new(0, 1, vec!["bogus".into()]),
        vec![vec![Some(json!("x"))]],
    );
    assert!(!engine.apply_region(&edit));
    assert_eq!(engine.history_len(), before);
}

#[test]
fn events_emitted_per_commit_and_echo_not_recommitted() {
    let mut engine = mapping_engine();
    let collector = Rc::new(RefCell::new(EventCollector::new()));
    let sink = Rc::clone(&collector);
    engine.set_on_event(Box::new(move |event| sink.borrow_mut().push(event)));

    engine.set_cell(&RowId::from("A"), "name", json!("n"));
    {
        let events = collector.borrow();
        assert_eq!(events.row_updates().len(), 1);
        assert!(matches!(
            events.events().last(),
            Some(GridEvent::HistoryChanged { can_undo: true, can_redo: false })
        ));
    }

    // The host echoes the notified array back, as a reactive binding would
    // in the same tick: the engine must not commit or re-notify.
    let echoed = collector.borrow().row_updates()[0].clone();
    let depth = engine.history_len();
    engine.sync_rows(echoed);
    assert_eq!(engine.history_len(), depth);
    assert_eq!(collector.borrow().row_updates().len(), 1);
}

#[test]
fn undo_notifies_host_of_restored_rows() {
    let mut engine = mapping_engine();
    let collector = Rc::new(RefCell::new(EventCollector::new()));
    let sink = Rc::clone(&collector);
    engine.set_on_event(Box::new(move |event| sink.borrow_mut().push(event)));

    engine.set_cell(&RowId::from("A"), "name", json!("edited"));
    engine.undo();

    let events = collector.borrow();
    let updates = events.row_updates();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[1][0].field("name"), serde_json::Value::Null);
}

#[test]
fn standalone_mode_edits_rows_only() {
    let mut engine = GridEngine::standalone(
        vec![Row::new("A").with_field("qty", json!(1))],
        vec![StaticColumn::new("qty")],
        ColumnLayout::flat(&["qty"]),
        &EngineSettings::default(),
    );

    assert!(engine.set_cell(&RowId::from("A"), "qty", json!(2)));
    assert!(engine.cells().is_empty());
    assert_eq!(engine.rows()[0].field("qty"), json!(2));

    engine.undo();
    assert_eq!(engine.rows()[0].field("qty"), json!(1));
}
