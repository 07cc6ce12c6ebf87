use phylayout::annotation::{
    branch_value_labels, format_branch_value, AnnotationStore, ArrowStyle, BranchAnchor,
    BranchValue, CladeLabel, Color, HighlightExtent, HighlightStyle, LabelStyle, LineDash,
    LineStyle, LinkStyle, MarkerShape, MarkerStyle, TextOrientation, TextStyle, VerticalPosition,
};
use phylayout::layout::{Layout, LayoutConfig, Point, Rect};
use phylayout::model::{NodeIndex, PhyloTree};
use phylayout::newick::parse_str;

const NEWICK: &str = "((A:1,B:2)90:1,(C:0.5,D:1.5)0.75:2)100;";

fn find(tree: &PhyloTree, name: &str) -> NodeIndex {
    tree.nodes()
        .iter()
        .find(|n| n.name() == Some(name))
        .map(|n| n.index())
        .unwrap_or_else(|| panic!("no node named {name}"))
}

fn setup(align: bool) -> (PhyloTree, Layout) {
    let tree = parse_str(NEWICK).unwrap();
    let config = LayoutConfig::default().with_aligned_labels(align);
    let layout = Layout::compute(&tree, config).unwrap();
    (tree, layout)
}

// ============= Style Tests =============
#[test]
fn test_style_defaults() {
    let label = LabelStyle::default();
    assert_eq!(label.color, Color::new("black"));
    assert_eq!(label.size, 12.0);
    assert!(label.is_visible());
    assert!(!label.with_size(0.0).is_visible());

    let line = LineStyle::default();
    assert_eq!((line.width, line.dash), (1.0, LineDash::Solid));

    let highlight = HighlightStyle::default();
    assert_eq!(highlight.color.as_str(), "lightgrey");
    assert_eq!(highlight.alpha, 0.5);
    assert_eq!(highlight.extent, HighlightExtent::Branch);

    let link = LinkStyle::default();
    assert_eq!(link.color.as_str(), "red");
    assert_eq!(link.dash, LineDash::Dashed);
    assert_eq!(link.arrow, ArrowStyle::Forward);
    assert_eq!((link.from_anchor, link.to_anchor), (BranchAnchor::Center, BranchAnchor::Center));

    let marker = MarkerStyle::default();
    assert_eq!((marker.shape, marker.size, marker.descendants), (MarkerShape::Circle, 6.0, false));

    assert_eq!(TextStyle::default().size, 8.0);

    let clade = CladeLabel::new("Passeri");
    assert_eq!(clade.text, "Passeri");
    assert_eq!(clade.text_style.size, 10.0);
    assert_eq!(clade.orientation, TextOrientation::Horizontal);
    assert!(!clade.align);
}

#[test]
fn test_partial_styles_from_json() {
    let line: LineStyle = serde_json::from_str(r#"{"color": "red"}"#).unwrap();
    assert_eq!(line, LineStyle::default().with_color("red"));

    let highlight: HighlightStyle = serde_json::from_str(r#"{"extent": "full"}"#).unwrap();
    assert_eq!(highlight, HighlightStyle::default().with_extent(HighlightExtent::Full));

    let marker: MarkerStyle =
        serde_json::from_str(r##"{"shape": "triangle_up", "color": "#1f77b4", "descendants": true}"##)
            .unwrap();
    assert_eq!(marker.shape, MarkerShape::TriangleUp);
    assert_eq!(marker.color.to_string(), "#1f77b4");
    assert_eq!(marker.size, 6.0);
    assert!(marker.descendants);

    let clade: CladeLabel = serde_json::from_str(r#"{"text": "Corvida", "align": true}"#).unwrap();
    assert_eq!(clade, CladeLabel::new("Corvida").with_align(true));
}

#[test]
fn test_color_serializes_as_string() {
    let json = serde_json::to_string(&LabelStyle::default().with_color("navy")).unwrap();
    assert!(json.contains(r#""color":"navy""#));
    assert!(json.contains(r#""font_style":"normal""#));
}

// ============= Store Tests =============
#[test]
fn test_label_style_overrides() {
    let (tree, _) = setup(false);
    let a = find(&tree, "A");
    let b = find(&tree, "B");

    let mut store = AnnotationStore::new().with_default_label_style(LabelStyle::default().with_size(9.0));
    assert!(store.is_empty());

    store.set_label_style(a, LabelStyle::default().with_color("green"));
    assert!(!store.is_empty());
    assert_eq!(store.label_style(a).color.as_str(), "green");
    assert_eq!(store.label_style(b).size, 9.0);
}

#[test]
fn test_line_style_with_descendants() {
    let (tree, _) = setup(false);
    let a = find(&tree, "A");
    let ab = tree.parent(a).unwrap();
    let c = find(&tree, "C");
    let thick = LineStyle::default().with_width(3.0);

    let grey = LineStyle::default().with_color("grey");
    let mut store = AnnotationStore::new().with_default_line_style(grey.clone());
    store.set_line_style(&tree, ab, thick.clone(), true);
    assert_eq!(store.line_style(ab), &thick);
    assert_eq!(store.line_style(a), &thick);
    assert_eq!(store.line_style(find(&tree, "B")), &thick);
    assert_eq!(store.line_style(c), &grey);

    let dashed = LineStyle::default().with_dash(LineDash::Dotted);
    store.set_line_style(&tree, c, dashed.clone(), false);
    assert_eq!(store.line_style(c), &dashed);
    assert_eq!(store.line_style(tree.parent(c).unwrap()), &grey);
}

#[test]
fn test_resolved_highlights() {
    let (tree, layout) = setup(false);
    let ab = tree.parent(find(&tree, "A")).unwrap();

    let mut store = AnnotationStore::new();
    store.add_highlight(ab, HighlightStyle::new("salmon"));
    store.add_highlight(ab, HighlightStyle::new("gold").with_extent(HighlightExtent::Full));

    let resolved = store.resolved_highlights(&layout);
    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0].0, Rect::new(0.5, 3.0, -0.5, 1.5));
    assert_eq!(resolved[0].1.color.as_str(), "salmon");
    assert_eq!(resolved[1].0, Rect::new(0.5, 3.5, -0.5, 1.5));
}

#[test]
fn test_resolved_markers_expand_descendants() {
    let (tree, layout) = setup(true);
    let a = find(&tree, "A");
    let c = find(&tree, "C");
    let cd = tree.parent(c).unwrap();

    let mut store = AnnotationStore::new();
    store.add_marker(a, MarkerStyle::new(MarkerShape::Star));
    store.add_marker(cd, MarkerStyle::new(MarkerShape::Square).with_descendants(true));

    let resolved = store.resolved_markers(&tree, &layout);
    let nodes: Vec<NodeIndex> = resolved.iter().map(|m| m.node).collect();
    assert_eq!(nodes, vec![a, cd, c, find(&tree, "D")]);

    // Aligned leaves are marked in the label column
    assert_eq!(resolved[0].position, Point::new(3.5, 0.0));
    assert_eq!(resolved[1].position, Point::new(2.0, 2.5));
    assert_eq!(resolved[2].position, Point::new(3.5, 2.0));
    assert_eq!(resolved[3].style.shape, MarkerShape::Square);
}

#[test]
fn test_resolved_links() {
    let (tree, layout) = setup(false);
    let a = find(&tree, "A");
    let d = find(&tree, "D");

    let mut store = AnnotationStore::new();
    store.add_link(a, d, LinkStyle::default());
    store.add_link(
        d,
        a,
        LinkStyle::default()
            .with_arrow(ArrowStyle::Both)
            .with_anchors(BranchAnchor::Right, BranchAnchor::Left),
    );

    let links = store.resolved_links(&layout);
    assert_eq!(links[0].from, Point::new(1.5, 0.0));
    assert_eq!(links[0].to, Point::new(2.75, 3.0));
    assert_eq!(links[1].from, Point::new(3.5, 3.0));
    assert_eq!(links[1].to, Point::new(1.0, 0.0));
    assert_eq!(links[1].style.arrow, ArrowStyle::Both);
}

#[test]
fn test_resolved_clade_labels() {
    let (tree, layout) = setup(false);
    let ab = tree.parent(find(&tree, "A")).unwrap();

    let mut store = AnnotationStore::new();
    store.add_clade_label(ab, CladeLabel::new("AB"));
    store.add_clade_label(ab, CladeLabel::new("AB aligned").with_align(true));

    let labels = store.resolved_clade_labels(&layout);
    // Right of the furthest leaf label of the clade
    assert_eq!((labels[0].x, labels[0].y_min, labels[0].y_max), (3.0, 0.0, 1.0));
    // Label column of the whole tree
    assert_eq!(labels[1].x, 3.5);
    assert_eq!(labels[1].label.text, "AB aligned");

    // With aligned leaf labels every clade ends at the label column
    let (_, aligned) = setup(true);
    assert_eq!(store.resolved_clade_labels(&aligned)[0].x, 3.5);
}

#[test]
fn test_text_positions() {
    let (tree, layout) = setup(false);
    let c = find(&tree, "C");

    let mut store = AnnotationStore::new();
    store.add_text_on_node(c, "node", TextStyle::default());
    store.add_text_on_branch(
        c,
        "branch",
        BranchAnchor::Left,
        VerticalPosition::Bottom,
        TextStyle::default(),
    );

    let texts = store.texts();
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0].position(&layout), Point::new(2.5, 2.0));
    assert_eq!(texts[1].text, "branch");
    assert_eq!(texts[1].position(&layout), Point::new(2.0, 2.0));
}

// ============= Branch Value Tests =============
#[test]
fn test_format_branch_value() {
    assert_eq!(format_branch_value(100.0), "100");
    assert_eq!(format_branch_value(0.0), "0");
    assert_eq!(format_branch_value(0.75), "0.75");
    assert_eq!(format_branch_value(1.5), "1.50");
}

#[test]
fn test_branch_length_labels_skip_root() {
    let (tree, layout) = setup(false);
    let labels = branch_value_labels(&tree, &layout, BranchValue::Length, format_branch_value);

    let texts: Vec<&str> = labels.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["1", "1", "2", "2", "0.50", "1.50"]);
    assert!(labels.iter().all(|l| l.node != tree.root().index()));
    assert!(labels.iter().all(|l| l.anchor == BranchAnchor::Center));

    let c_label = labels.iter().find(|l| l.node == find(&tree, "C")).unwrap();
    assert_eq!(c_label.position, Point::new(2.25, 2.0));
}

#[test]
fn test_confidence_labels_include_root() {
    let (tree, layout) = setup(false);
    let labels = branch_value_labels(&tree, &layout, BranchValue::Confidence, |v| {
        format!("{v}%")
    });

    assert_eq!(labels.len(), 3);
    assert_eq!(labels[0].node, tree.root().index());
    assert_eq!(labels[0].text, "100%");
    assert_eq!(labels[0].anchor, BranchAnchor::Right);
    assert_eq!(labels[0].position, Point::new(0.0, 1.5));

    assert_eq!(labels[1].text, "90%");
    assert_eq!(labels[1].position, Point::new(0.5, 0.5));
    assert_eq!(labels[2].text, "0.75%");
}
