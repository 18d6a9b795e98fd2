// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshots of an actor tree.
//!
//! [`dump_tree`] walks the subtree under an actor and returns one JSON
//! object per actor with its kind, state flags, geometry, and attached
//! transitions and metas, nested under `children` in paint order.
//! [`write_tree`] pretty-prints the same snapshot.

use std::io::{self, Write};

use kurbo::Rect;
use proscenium_core::actor::{ActorId, ActorStore};
use serde_json::{Map, Value, json};

/// Snapshot of `root` and everything below it.
#[must_use]
pub fn dump_tree(store: &ActorStore, root: ActorId) -> Value {
    let mut obj = Map::new();
    obj.insert("id".into(), json!(root.to_string()));
    obj.insert("type".into(), json!(store.class(root).type_name()));
    obj.insert(
        "flags".into(),
        json!({
            "visible": store.is_visible(root),
            "mapped": store.is_mapped(root),
            "realized": store.is_realized(root),
            "reactive": store.is_reactive(root),
        }),
    );
    obj.insert("allocation".into(), rect(store.allocation(root)));
    if store.z_position(root) != 0.0 {
        obj.insert("z_position".into(), json!(store.z_position(root)));
    }
    if store.opacity(root) != 255 {
        obj.insert("opacity".into(), json!(store.opacity(root)));
    }
    if let Some(clip) = store.clip(root) {
        obj.insert("clip".into(), rect(clip));
    }
    if store.needs_relayout(root) {
        obj.insert("needs_relayout".into(), json!(true));
    }
    if let Some(source) = store.clone_source(root) {
        obj.insert("clone_of".into(), json!(source.to_string()));
    }

    let transitions = store.transition_names(root);
    if !transitions.is_empty() {
        obj.insert("transitions".into(), json!(transitions));
    }
    let metas = [
        ("actions", store.action_names(root)),
        ("constraints", store.constraint_names(root)),
        ("effects", store.effect_names(root)),
    ];
    for (key, names) in metas {
        if !names.is_empty() {
            obj.insert(key.into(), json!(names));
        }
    }

    let children: Vec<Value> = store
        .children(root)
        .map(|child| dump_tree(store, child))
        .collect();
    if !children.is_empty() {
        obj.insert("children".into(), Value::Array(children));
    }
    Value::Object(obj)
}

/// Writes the snapshot of `root` as indented JSON.
pub fn write_tree(store: &ActorStore, root: ActorId, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &dump_tree(store, root))?;
    writeln!(writer)
}

fn rect(r: Rect) -> Value {
    json!({
        "x": r.x0,
        "y": r.y0,
        "width": r.width(),
        "height": r.height(),
    })
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use proscenium_core::testing::RecordingStage;

    use super::*;

    #[test]
    fn dump_nests_children_in_paint_order() {
        let mut store = ActorStore::new();
        let stage = store.create_stage(Rc::new(RecordingStage::new(100.0, 80.0)));
        store.show(stage);
        store.set_stage_mapped(stage, true);
        let a = store.create_actor();
        let b = store.create_actor();
        store.add_child(stage, a);
        store.add_child(stage, b);
        store.set_size(a, 10.0, 20.0);
        store.set_opacity(b, 128);
        store.update_stage(stage);
        let clone = store.create_clone(a);
        store.add_child(b, clone);

        let tree = dump_tree(&store, stage);
        assert_eq!(tree["allocation"]["width"], 100.0);
        assert_eq!(tree["flags"]["mapped"], true);
        let children = tree["children"].as_array().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0]["id"], a.to_string());
        assert_eq!(children[0]["allocation"]["height"], 20.0);
        assert!(children[0].get("opacity").is_none());
        assert_eq!(children[1]["opacity"], 128);
        assert_eq!(children[1]["children"][0]["type"], "Clone");
        assert_eq!(children[1]["children"][0]["clone_of"], a.to_string());
    }

    #[test]
    fn write_tree_is_parseable() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        let mut out = Vec::new();
        write_tree(&store, a, &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["type"], "Actor");
        assert_eq!(parsed["flags"]["visible"], false);
    }
}
