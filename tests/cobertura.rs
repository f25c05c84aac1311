//! End-to-end: Cobertura fixture → records → tree.

use covmap::parsers::cobertura::CoberturaParser;
use covmap::parsers::Parser;
use covmap::tree::{build, TreeNode};

#[test]
fn parse_fixture_records() {
    let input = include_bytes!("fixtures/sample_cobertura.xml");
    let records = CoberturaParser.parse(input).unwrap();

    assert_eq!(records.len(), 3);

    let main = &records[0];
    assert_eq!(main.path, "src/main.py");
    assert_eq!(main.lines_valid, 10);
    assert_eq!(main.lines_covered, 8);
    assert_eq!(main.branches_valid, 2);
    assert_eq!(main.branches_covered, 1);

    let util = &records[1];
    assert_eq!(util.path, "src/util.py");
    assert_eq!(util.lines_valid, 2);
    assert_eq!(util.lines_covered, 2);
    assert_eq!(util.branches_valid, 0);

    let helper = &records[2];
    assert_eq!(helper.path, "lib/helper.py");
    assert_eq!(helper.lines_covered, 1);
    assert_eq!(helper.lines_valid, 4);
}

#[test]
fn fixture_tree_aggregates() {
    let input = include_bytes!("fixtures/sample_cobertura.xml");
    let records = CoberturaParser.parse(input).unwrap();
    let root = build(records).unwrap();

    assert_eq!(root.aggregate.lines_valid, 16);
    assert_eq!(root.aggregate.lines_covered, 11);
    assert_eq!(root.aggregate.branches_valid, 2);

    let src = match root.child("src").unwrap() {
        TreeNode::Directory(dir) => dir,
        TreeNode::File(_) => panic!("expected 'src' to be a directory"),
    };
    assert_eq!(src.aggregate.lines_valid, 12);
    assert_eq!(src.aggregate.lines_covered, 10);
    assert_eq!(src.children().len(), 2);
}
