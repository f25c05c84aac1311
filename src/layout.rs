//! Squarified treemap layout.
//!
//! Assigns a rectangle to every tree node within a caller-supplied canvas.
//! Sibling rectangles partition their parent exactly; areas are proportional
//! to the selected size metric. Rows are formed greedily along the shorter
//! side of the remaining free rectangle, closing a row as soon as adding the
//! next child would worsen the row's worst aspect ratio (Bruls-style
//! squarification), which keeps rectangles legible at any file count.

use crate::color::{color_for, ColorScale, Rgba};
use crate::error::{CovmapError, Result};
use crate::model::Aggregate;
use crate::tree::{DirectoryNode, TreeNode};

/// Which aggregate field drives rectangle areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeMetric {
    #[default]
    LinesValid,
    LinesCovered,
    BranchesValid,
    BranchesCovered,
}

impl SizeMetric {
    #[must_use]
    pub fn extract(&self, aggregate: &Aggregate) -> u64 {
        match self {
            SizeMetric::LinesValid => aggregate.lines_valid,
            SizeMetric::LinesCovered => aggregate.lines_covered,
            SizeMetric::BranchesValid => aggregate.branches_valid,
            SizeMetric::BranchesCovered => aggregate.branches_covered,
        }
    }
}

/// One positioned, colored node of the laid-out tree.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// The size-metric value this rectangle's area is proportional to.
    pub value: u64,
    /// Line coverage ratio; `None` when the node has no measurable lines.
    pub line_ratio: Option<f64>,
    pub color: Rgba,
    /// Node name for directories, full path for files.
    pub label: String,
    /// Root = 0.
    pub depth: u32,
}

/// The full layout result: canvas dimensions plus rectangles in pre-order
/// (each directory before its children, children in placement order).
#[derive(Debug, serde::Serialize)]
pub struct Layout {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub rectangles: Vec<Rectangle>,
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Rect {
    fn area(&self) -> f64 {
        self.w * self.h
    }

    fn degenerate(x: f64, y: f64) -> Rect {
        Rect { x, y, w: 0.0, h: 0.0 }
    }
}

/// Lay out the coverage tree on a `canvas_width` x `canvas_height` canvas.
pub fn layout(
    root: &DirectoryNode,
    canvas_width: f64,
    canvas_height: f64,
    size_metric: SizeMetric,
    color_scale: ColorScale,
) -> Result<Layout> {
    if !(canvas_width.is_finite() && canvas_height.is_finite())
        || canvas_width <= 0.0
        || canvas_height <= 0.0
    {
        return Err(CovmapError::InvalidCanvasSize {
            width: canvas_width,
            height: canvas_height,
        });
    }

    let mut rectangles = Vec::new();
    let rect = Rect {
        x: 0.0,
        y: 0.0,
        w: canvas_width,
        h: canvas_height,
    };
    emit_directory(root, rect, 0, size_metric, color_scale, &mut rectangles);
    Ok(Layout {
        canvas_width,
        canvas_height,
        rectangles,
    })
}

fn emit_directory(
    dir: &DirectoryNode,
    rect: Rect,
    depth: u32,
    metric: SizeMetric,
    scale: ColorScale,
    out: &mut Vec<Rectangle>,
) {
    push_rectangle(&dir.aggregate, dir.name.clone(), rect, depth, metric, scale, out);

    // Stable sort by value descending: equal values keep first-seen order,
    // so repeated layouts over the same tree are bit-identical.
    let mut ordered: Vec<&TreeNode> = dir.children().iter().collect();
    ordered.sort_by(|a, b| {
        metric
            .extract(&b.aggregate())
            .cmp(&metric.extract(&a.aggregate()))
    });

    let total: u64 = ordered
        .iter()
        .map(|child| metric.extract(&child.aggregate()))
        .sum();

    // Zero-value children sort last and receive degenerate rectangles at the
    // parent's origin; they are still emitted so the output stays exhaustive.
    let cells = if total == 0 {
        Vec::new()
    } else {
        let areas: Vec<f64> = ordered
            .iter()
            .map(|child| metric.extract(&child.aggregate()))
            .take_while(|&v| v > 0)
            .map(|v| v as f64 / total as f64 * rect.area())
            .collect();
        squarify(&areas, rect)
    };

    for (i, child) in ordered.iter().enumerate() {
        let child_rect = cells
            .get(i)
            .copied()
            .unwrap_or_else(|| Rect::degenerate(rect.x, rect.y));
        match child {
            TreeNode::Directory(sub) => {
                emit_directory(sub, child_rect, depth + 1, metric, scale, out);
            }
            TreeNode::File(file) => {
                push_rectangle(
                    &file.aggregate(),
                    file.record.path.clone(),
                    child_rect,
                    depth + 1,
                    metric,
                    scale,
                    out,
                );
            }
        }
    }
}

fn push_rectangle(
    aggregate: &Aggregate,
    label: String,
    rect: Rect,
    depth: u32,
    metric: SizeMetric,
    scale: ColorScale,
    out: &mut Vec<Rectangle>,
) {
    let line_ratio = aggregate.line_ratio();
    out.push(Rectangle {
        x: rect.x,
        y: rect.y,
        width: rect.w,
        height: rect.h,
        value: metric.extract(aggregate),
        line_ratio,
        color: color_for(line_ratio, scale),
        label,
        depth,
    });
}

/// Partition `rect` into cells with the given areas (descending order).
/// The areas must sum to `rect.area()`.
fn squarify(areas: &[f64], rect: Rect) -> Vec<Rect> {
    let mut cells = Vec::with_capacity(areas.len());
    let mut free = rect;
    let mut row: Vec<f64> = Vec::new();

    for &area in areas {
        if row.is_empty() {
            row.push(area);
            continue;
        }
        let side = free.w.min(free.h);
        let current = worst_ratio(&row, side);
        row.push(area);
        if worst_ratio(&row, side) > current {
            // Adding this child worsened the row; close without it.
            row.pop();
            lay_row(&row, &mut free, &mut cells);
            row.clear();
            row.push(area);
        }
    }
    if !row.is_empty() {
        lay_row(&row, &mut free, &mut cells);
    }
    cells
}

/// Worst aspect ratio (max of w/h and h/w over all items) that a row with
/// these areas would have when laid along a side of the given length.
fn worst_ratio(row: &[f64], side: f64) -> f64 {
    let sum: f64 = row.iter().sum();
    if sum <= 0.0 || side <= 0.0 {
        return f64::INFINITY;
    }
    let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = row.iter().copied().fold(f64::INFINITY, f64::min);
    let side_sq = side * side;
    let sum_sq = sum * sum;
    (side_sq * max / sum_sq).max(sum_sq / (side_sq * min))
}

/// Lay a closed row as a strip along the shorter side of the free rectangle,
/// splitting the strip proportionally to each item's area, then shrink the
/// free rectangle by the consumed strip.
fn lay_row(row: &[f64], free: &mut Rect, cells: &mut Vec<Rect>) {
    let sum: f64 = row.iter().sum();
    if sum <= 0.0 || free.w.min(free.h) <= 0.0 {
        for _ in row {
            cells.push(Rect::degenerate(free.x, free.y));
        }
        return;
    }

    if free.w >= free.h {
        // Vertical strip at the left edge; items run top to bottom.
        let strip_w = sum / free.h;
        let mut y = free.y;
        for &area in row {
            let item_h = area / strip_w;
            cells.push(Rect {
                x: free.x,
                y,
                w: strip_w,
                h: item_h,
            });
            y += item_h;
        }
        free.x += strip_w;
        free.w -= strip_w;
    } else {
        // Horizontal strip at the top edge; items run left to right.
        let strip_h = sum / free.w;
        let mut x = free.x;
        for &area in row {
            let item_w = area / strip_h;
            cells.push(Rect {
                x,
                y: free.y,
                w: item_w,
                h: strip_h,
            });
            x += item_w;
        }
        free.y += strip_h;
        free.h -= strip_h;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CoverageRecord;
    use crate::tree::build;

    fn rect(w: f64, h: f64) -> Rect {
        Rect { x: 0.0, y: 0.0, w, h }
    }

    #[test]
    fn test_worst_ratio_single() {
        // One item filling a 2:1 free rect has ratio 2.
        assert!((worst_ratio(&[200.0], 10.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_worst_ratio_degenerate_side() {
        assert_eq!(worst_ratio(&[1.0], 0.0), f64::INFINITY);
    }

    #[test]
    fn test_squarify_single_fills_rect() {
        let cells = squarify(&[480_000.0], rect(800.0, 600.0));
        assert_eq!(cells.len(), 1);
        assert_eq!((cells[0].w, cells[0].h), (800.0, 600.0));
    }

    #[test]
    fn test_squarify_two_unequal() {
        // 80/20 split of an 800x600 canvas: big item takes a 640-wide column.
        let cells = squarify(&[384_000.0, 96_000.0], rect(800.0, 600.0));
        assert_eq!(cells.len(), 2);
        assert!((cells[0].w - 640.0).abs() < 1e-9);
        assert!((cells[0].h - 600.0).abs() < 1e-9);
        assert!((cells[1].x - 640.0).abs() < 1e-9);
        assert!((cells[1].w - 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_squarify_areas_preserved() {
        let areas = [40.0, 30.0, 20.0, 10.0];
        let cells = squarify(&areas, rect(10.0, 10.0));
        for (cell, area) in cells.iter().zip(areas) {
            assert!((cell.area() - area).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_canvas() {
        let root = build(vec![]).unwrap();
        for (w, h) in [(0.0, 100.0), (100.0, -1.0), (f64::NAN, 100.0)] {
            let err = layout(&root, w, h, SizeMetric::default(), ColorScale::RdYlGn).unwrap_err();
            assert!(matches!(err, CovmapError::InvalidCanvasSize { .. }));
        }
    }

    #[test]
    fn test_empty_tree_emits_root_only() {
        let root = build(vec![]).unwrap();
        let result = layout(&root, 800.0, 600.0, SizeMetric::default(), ColorScale::RdYlGn).unwrap();
        assert_eq!(result.rectangles.len(), 1);
        let rect = &result.rectangles[0];
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (0.0, 0.0, 800.0, 600.0));
        assert_eq!(rect.line_ratio, None);
        assert_eq!(rect.color, crate::color::NO_DATA_COLOR);
        assert_eq!(rect.depth, 0);
    }

    #[test]
    fn test_zero_value_children_degenerate() {
        let root = build(vec![
            CoverageRecord::new("a/big.rs", 5, 10),
            CoverageRecord::new("a/empty.rs", 0, 0),
        ])
        .unwrap();
        let result = layout(&root, 100.0, 100.0, SizeMetric::default(), ColorScale::RdYlGn).unwrap();
        let empty = result
            .rectangles
            .iter()
            .find(|r| r.label == "a/empty.rs")
            .unwrap();
        assert_eq!((empty.width, empty.height), (0.0, 0.0));
        assert_eq!(empty.color, crate::color::NO_DATA_COLOR);

        let big = result.rectangles.iter().find(|r| r.label == "a/big.rs").unwrap();
        assert!((big.width * big.height - 100.0 * 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_total_directory() {
        let root = build(vec![
            CoverageRecord::new("a/x.rs", 0, 0),
            CoverageRecord::new("a/y.rs", 0, 0),
        ])
        .unwrap();
        let result = layout(&root, 50.0, 50.0, SizeMetric::default(), ColorScale::Blues).unwrap();
        // Root, dir a, two files: all emitted.
        assert_eq!(result.rectangles.len(), 4);
        for rect in &result.rectangles[1..] {
            assert_eq!(rect.width * rect.height, 0.0);
            assert_eq!((rect.x, rect.y), (0.0, 0.0));
        }
    }

    #[test]
    fn test_preorder_and_depth() {
        let root = build(vec![CoverageRecord::new("a/b/x.rs", 1, 2)]).unwrap();
        let result = layout(&root, 10.0, 10.0, SizeMetric::default(), ColorScale::RdYlGn).unwrap();
        let labels: Vec<&str> = result.rectangles.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec![".", "a", "b", "a/b/x.rs"]);
        let depths: Vec<u32> = result.rectangles.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_size_metric_extract() {
        let record = CoverageRecord {
            path: "x".into(),
            lines_covered: 1,
            lines_valid: 2,
            branches_covered: 3,
            branches_valid: 4,
        };
        let aggregate = crate::model::Aggregate::from(&record);
        assert_eq!(SizeMetric::LinesCovered.extract(&aggregate), 1);
        assert_eq!(SizeMetric::LinesValid.extract(&aggregate), 2);
        assert_eq!(SizeMetric::BranchesCovered.extract(&aggregate), 3);
        assert_eq!(SizeMetric::BranchesValid.extract(&aggregate), 4);
    }
}
