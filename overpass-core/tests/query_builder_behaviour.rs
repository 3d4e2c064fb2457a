//! Behavioural tests for the query builder.
//!
//! These scenarios exercise the public query-building surface end to end:
//! fragment compilation, lexicographic ordering, and the refusal of
//! unsupported element kinds.

use std::cell::RefCell;

use overpass_core::{BoundingBox, ElementKind, QueryError, Tag, build_query};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Result cell holding the outcome of a query-build request.
type QueryCell = RefCell<Result<String, QueryError>>;

#[fixture]
fn bbox() -> RefCell<Option<BoundingBox>> {
    RefCell::new(None)
}

#[fixture]
fn tags() -> RefCell<Vec<Tag>> {
    RefCell::new(Vec::new())
}

#[fixture]
fn query() -> QueryCell {
    RefCell::new(Ok(String::new()))
}

// --- Given steps ---

#[given("a bounding box around the test area")]
fn given_bbox(#[from(bbox)] bbox: &RefCell<Option<BoundingBox>>) {
    *bbox.borrow_mut() = Some(BoundingBox::new(1.5, 1.75, 2.5, 2.75));
}

#[given("a key filter and an exact-value filter")]
fn given_filters(#[from(tags)] tags: &RefCell<Vec<Tag>>) {
    *tags.borrow_mut() = vec![Tag::has_key("hello"), Tag::has_value("good", "bye")];
}

// --- When steps ---

#[when("I build a point query")]
fn build_point_query(
    #[from(bbox)] bbox: &RefCell<Option<BoundingBox>>,
    #[from(tags)] tags: &RefCell<Vec<Tag>>,
    #[from(query)] query: &QueryCell,
) {
    run_builder(ElementKind::Node, bbox, tags, query);
}

#[when("I build a line query")]
fn build_line_query(
    #[from(bbox)] bbox: &RefCell<Option<BoundingBox>>,
    #[from(tags)] tags: &RefCell<Vec<Tag>>,
    #[from(query)] query: &QueryCell,
) {
    run_builder(ElementKind::Way, bbox, tags, query);
}

#[when("I request a query for relation elements")]
fn build_relation_query(
    #[from(bbox)] bbox: &RefCell<Option<BoundingBox>>,
    #[from(tags)] tags: &RefCell<Vec<Tag>>,
    #[from(query)] query: &QueryCell,
) {
    run_builder(ElementKind::Relation, bbox, tags, query);
}

fn run_builder(
    kind: ElementKind,
    bbox: &RefCell<Option<BoundingBox>>,
    tags: &RefCell<Vec<Tag>>,
    query: &QueryCell,
) {
    let guard = bbox.borrow();
    let bbox = guard.as_ref().expect("bounding box must be initialised");
    *query.borrow_mut() = build_query(kind, bbox, &tags.borrow());
}

// --- Then steps ---

#[then("the query matches nodes with sorted filters and the bounding box")]
fn then_point_query(#[from(query)] query: &QueryCell) {
    let borrowed = query.borrow();
    let built = borrowed.as_ref().expect("expected Ok result");
    assert_eq!(built, r#"node["good"="bye"]["hello"](1.5, 1.75, 2.5, 2.75);"#);
}

#[then("the query matches ways and expands their member nodes")]
fn then_line_query(#[from(query)] query: &QueryCell) {
    let borrowed = query.borrow();
    let built = borrowed.as_ref().expect("expected Ok result");
    assert_eq!(
        built,
        r#"way["good"="bye"]["hello"](1.5, 1.75, 2.5, 2.75);(._;>;);"#,
    );
}

#[then("the query matches every node in the bounding box")]
fn then_unfiltered_query(#[from(query)] query: &QueryCell) {
    let borrowed = query.borrow();
    let built = borrowed.as_ref().expect("expected Ok result");
    assert_eq!(built, "node(1.5, 1.75, 2.5, 2.75);");
}

#[then("the builder refuses with an unsupported-kind error")]
fn then_unsupported(#[from(query)] query: &QueryCell) {
    let borrowed = query.borrow();
    assert_eq!(
        *borrowed,
        Err(QueryError::UnsupportedElementKind(ElementKind::Relation)),
    );
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/query_builder.feature", name = $title)]
        fn $fn_name(bbox: RefCell<Option<BoundingBox>>, tags: RefCell<Vec<Tag>>, query: QueryCell) {
            let _ = (bbox, tags, query);
        }
    };
}

register_scenario!(building_a_point_query, "building a point query");
register_scenario!(building_a_line_query, "building a line query");
register_scenario!(building_an_unfiltered_query, "building a query with no filters");
register_scenario!(requesting_a_relation_query, "requesting a relation query");
