//! Forest operations: lookup, copy-on-write mutation and column flattening

use std::fs;

use rstest::{fixture, rstest};

use hierarchy_store::domain::{DomainError, FieldValue, Forest, Node};

fn id(s: &str) -> FieldValue {
    FieldValue::from(s)
}

fn keys(forest: &Forest) -> Vec<String> {
    forest
        .iter()
        .filter_map(|n| n.key("id").map(|v| v.to_string()))
        .collect()
}

/// `[{id:"1", children:[{id:"1-1"}, {id:"1-2"}]}]`
#[fixture]
fn two_children() -> Forest {
    Forest::new(vec![Node::new()
        .with_field("id", "1")
        .with_child(Node::new().with_field("id", "1-1"))
        .with_child(Node::new().with_field("id", "1-2"))])
}

/// Category tree of the generic table document.
#[fixture]
fn categories() -> Forest {
    let content = fs::read_to_string("tests/resources/categories.json").unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    serde_json::from_value(doc["data"].clone()).unwrap()
}

// ============================================================
// append_child
// ============================================================

#[rstest]
fn given_two_children_when_appending_then_new_child_is_last(two_children: Forest) {
    let after = two_children
        .append_child("id", &id("1"), Node::new().with_field("id", "1-3"))
        .unwrap();

    let child_ids: Vec<String> = after.roots()[0]
        .children()
        .iter()
        .map(|c| c.key("id").unwrap().to_string())
        .collect();
    assert_eq!(child_ids, vec!["1-1", "1-2", "1-3"]);
    assert_eq!(
        after.find_node("id", &id("1-3")),
        Some(&Node::new().with_field("id", "1-3"))
    );
    // input snapshot untouched
    assert_eq!(two_children.roots()[0].children().len(), 2);
}

#[rstest]
fn given_unknown_parent_when_appending_then_node_not_found(two_children: Forest) {
    let err = two_children
        .append_child("id", &id("9"), Node::new().with_field("id", "9-1"))
        .unwrap_err();

    assert!(matches!(err, DomainError::NodeNotFound { .. }));
    assert!(err.is_not_found());
}

#[rstest]
fn given_leaf_without_children_field_when_appending_then_not_upgraded(two_children: Forest) {
    let err = two_children
        .append_child("id", &id("1-1"), Node::new().with_field("id", "1-1-1"))
        .unwrap_err();

    assert_eq!(err, DomainError::ChildrenAbsent { id: id("1-1") });
    assert!(err.is_not_found());
    assert!(two_children.find_node("id", &id("1-1")).unwrap().children.is_none());
}

#[test]
fn given_leaf_with_empty_children_when_appending_then_succeeds() {
    let forest = Forest::new(vec![Node::new().with_field("id", "x").with_empty_children()]);

    let after = forest
        .append_child("id", &id("x"), Node::new().with_field("id", "x-1"))
        .unwrap();

    assert_eq!(keys(&after), vec!["x", "x-1"]);
}

#[rstest]
fn given_duplicate_id_when_appending_then_not_rejected(two_children: Forest) {
    let after = two_children
        .append_child("id", &id("1"), Node::new().with_field("id", "1-1"))
        .unwrap();

    assert_eq!(after.duplicate_keys("id"), vec![id("1-1")]);
}

// ============================================================
// remove_node
// ============================================================

#[rstest]
fn given_two_children_when_removing_first_then_one_child_left(two_children: Forest) {
    let (after, removed) = two_children.remove_node("id", &id("1-1"));

    assert!(removed);
    assert_eq!(keys(&after), vec!["1", "1-2"]);
}

#[rstest]
#[case("nope")]
#[case("")]
#[case("1-1-1")]
fn given_absent_id_when_removing_then_identity(two_children: Forest, #[case] missing: &str) {
    let (after, removed) = two_children.remove_node("id", &id(missing));

    assert!(!removed);
    assert_eq!(after, two_children);
    assert!(after.ptr_eq(&two_children));
}

#[rstest]
#[case("1", 4)]
#[case("1-1", 2)]
#[case("1-1-1", 1)]
#[case("2", 3)]
#[case("2-2", 1)]
fn given_present_id_when_removing_then_exactly_its_subtree_goes(
    categories: Forest,
    #[case] target: &str,
    #[case] subtree: usize,
) {
    let before = categories.len();
    let target_node = categories.find_node("id", &id(target)).unwrap().clone();

    let (after, removed) = categories.remove_node("id", &id(target));

    assert!(removed);
    assert_eq!(after.len(), before - subtree);
    assert_eq!(target_node.subtree_size(), subtree);
    // nothing of the subtree survives, everything else does
    for node in categories.iter() {
        let node_id = node.key("id").unwrap();
        let inside = target_node.contains_key("id", node_id);
        assert_eq!(after.contains("id", node_id), !inside, "node {}", node_id);
    }
}

#[test]
fn given_duplicate_ids_when_removing_then_only_first_pre_order_match_goes() {
    let forest = Forest::new(vec![
        Node::new()
            .with_field("id", "r")
            .with_child(Node::new().with_field("id", "d").with_field("n", 1)),
        Node::new().with_field("id", "d").with_field("n", 2),
    ]);

    let (after, removed) = forest.take_node("id", &id("d"));

    assert_eq!(removed.unwrap().field("n"), Some(&FieldValue::from(1)));
    assert_eq!(after.roots().len(), 2);
    assert!(after.roots()[0].children().is_empty());
}

// ============================================================
// find_node
// ============================================================

#[rstest]
fn given_forest_when_finding_twice_then_same_result_and_no_mutation(categories: Forest) {
    let before = categories.clone();

    let first = categories.find_node("id", &id("1-1-1")).cloned();
    let second = categories.find_node("id", &id("1-1-1")).cloned();

    assert_eq!(first, second);
    assert_eq!(
        first.unwrap().field("name"),
        Some(&FieldValue::from("Subcategory A-1-2"))
    );
    assert_eq!(categories, before);
    assert!(categories.ptr_eq(&before));
}

#[test]
fn given_integer_ids_when_finding_with_text_then_no_match() {
    let content = fs::read_to_string("tests/resources/lags.json").unwrap();
    let forest: Forest = serde_json::from_str(&content).unwrap();

    assert!(forest.find_node("id", &FieldValue::Integer(8)).is_some());
    assert!(forest.find_node("id", &id("8")).is_none());
    assert_eq!(forest.len(), 9);
    assert_eq!(forest.depth(), 4);
}

// ============================================================
// flatten_column
// ============================================================

#[rstest]
fn given_category_a_tree_when_flattening_value_then_four_pairs_in_pre_order(categories: Forest) {
    let category_a = Forest::new(vec![categories.roots()[0].clone()]);

    let view = category_a.flatten_column("value", "name");

    let pairs: Vec<(String, f64)> = view
        .entries
        .iter()
        .map(|e| (e.index.to_string(), e.value.as_f64().unwrap()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Category A".to_string(), 500.0),
            ("Subcategory A-1".to_string(), 200.0),
            ("Subcategory A-1-2".to_string(), 454.0),
            ("Subcategory A-2".to_string(), 300.0),
        ]
    );
}

#[rstest]
fn given_sparse_field_when_flattening_then_only_carriers_counted(categories: Forest) {
    // "extra" lives on 3 of the 7 nodes
    let view = categories.flatten_column("extra", "name");

    assert_eq!(categories.len(), 7);
    assert_eq!(view.len(), 3);
    let names: Vec<String> = view.entries.iter().map(|e| e.index.to_string()).collect();
    assert_eq!(names, vec!["Category A", "Subcategory A-1", "Category B"]);
}

#[rstest]
fn given_missing_index_field_when_flattening_then_node_skipped(categories: Forest) {
    let view = categories.flatten_column("value", "no-such-field");
    assert!(view.is_empty());
}

#[rstest]
fn given_value_column_when_summing_then_totals_every_node(categories: Forest) {
    let view = categories.flatten_column("value", "id");
    assert_eq!(view.numeric_total(), 500.0 + 200.0 + 454.0 + 300.0 + 750.0 + 400.0 + 350.0);
}

#[test]
fn given_null_column_value_when_flattening_then_entry_kept_with_null() {
    let forest: Forest = serde_json::from_str(
        r#"[{"name": "A", "value": 500, "children": [{"name": "A1", "value": null}]}]"#,
    )
    .unwrap();

    let view = forest.flatten_column("value", "name");

    assert_eq!(view.len(), 2);
    assert_eq!(view.entries[1].index, FieldValue::from("A1"));
    assert_eq!(view.entries[1].value, FieldValue::Null);
    let json = serde_json::to_value(&view).unwrap();
    assert!(json["data"][1]["value"].is_null());
    assert_eq!(json["data"][1]["name"], "A1");
}

#[rstest]
fn given_child_with_children_field_when_appending_then_reserved_field(two_children: Forest) {
    let mut child = Node::new().with_field("id", "1-3");
    child.set_field("children", "x");

    let err = two_children.append_child("id", &id("1"), child).unwrap_err();

    assert_eq!(
        err,
        DomainError::ReservedField {
            name: "children".into()
        }
    );
    assert!(!err.is_not_found());
}
