use rand::Rng;
use serde::Serialize;

use crate::node::{Node, Position};

/// Board dimensions reported by the renderer when a round starts
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoardSize {
    pub width: f64,
    pub height: f64,
}

impl BoardSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Parse a `WIDTHxHEIGHT` string, e.g. `800x600`
    pub fn parse(s: &str) -> Option<Self> {
        let (w, h) = s.split_once(['x', 'X'])?;
        let width: f64 = w.trim().parse().ok()?;
        let height: f64 = h.trim().parse().ok()?;
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return None;
        }
        Some(Self { width, height })
    }
}

/// Uniform coordinate in `[0, extent - node_size)`, or 0 when the node does not fit.
fn sample_axis<R: Rng>(rng: &mut R, extent: f64, node_size: f64) -> f64 {
    let span = extent - node_size;
    if span > 0.0 {
        rng.gen_range(0.0..span)
    } else {
        0.0
    }
}

/// Generate `count` fresh nodes placed fully inside the board.
pub fn place_nodes<R: Rng>(
    count: usize,
    board: BoardSize,
    node_size: f64,
    lifetime_secs: f64,
    rng: &mut R,
) -> Vec<Node> {
    (0..count)
        .map(|index| {
            let x = sample_axis(rng, board.width, node_size);
            let y = sample_axis(rng, board.height, node_size);
            Node::new(index, Position::new(x, y), lifetime_secs)
        })
        .collect()
}

/// Topmost active node whose footprint contains `point`.
///
/// Later nodes are drawn above earlier ones, so the highest index wins.
pub fn node_at(nodes: &[Node], point: Position, node_size: f64) -> Option<usize> {
    nodes
        .iter()
        .rev()
        .filter(|node| node.active)
        .find(|node| {
            let Position { x, y } = node.position;
            point.x >= x && point.x < x + node_size && point.y >= y && point.y < y + node_size
        })
        .map(|node| node.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn nodes_stay_inside_board_minus_footprint() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = BoardSize::new(400.0, 300.0);
        let nodes = place_nodes(200, board, 50.0, 3.0, &mut rng);

        assert_eq!(nodes.len(), 200);
        for (i, node) in nodes.iter().enumerate() {
            assert_eq!(node.index, i);
            assert!(node.position.x >= 0.0 && node.position.x < 350.0);
            assert!(node.position.y >= 0.0 && node.position.y < 250.0);
        }
    }

    #[test]
    fn zero_sized_board_places_at_origin() {
        let mut rng = StdRng::seed_from_u64(1);
        let nodes = place_nodes(3, BoardSize::default(), 50.0, 3.0, &mut rng);
        assert!(nodes
            .iter()
            .all(|n| n.position == Position::new(0.0, 0.0)));
    }

    #[test]
    fn narrow_board_clamps_only_the_short_axis() {
        let mut rng = StdRng::seed_from_u64(2);
        let nodes = place_nodes(20, BoardSize::new(30.0, 500.0), 50.0, 3.0, &mut rng);
        assert!(nodes.iter().all(|n| n.position.x == 0.0));
        assert!(nodes.iter().any(|n| n.position.y > 0.0));
    }

    #[test]
    fn node_at_prefers_topmost_active_node() {
        let mut nodes = vec![
            Node::new(0, Position::new(0.0, 0.0), 3.0),
            Node::new(1, Position::new(20.0, 20.0), 3.0),
        ];

        assert_eq!(node_at(&nodes, Position::new(30.0, 30.0), 50.0), Some(1));
        assert_eq!(node_at(&nodes, Position::new(5.0, 5.0), 50.0), Some(0));
        assert_eq!(node_at(&nodes, Position::new(90.0, 90.0), 50.0), None);

        nodes[1].active = false;
        assert_eq!(node_at(&nodes, Position::new(30.0, 30.0), 50.0), Some(0));
    }

    #[test]
    fn footprint_excludes_far_edge() {
        let nodes = vec![Node::new(0, Position::new(10.0, 10.0), 3.0)];
        assert_eq!(node_at(&nodes, Position::new(60.0, 10.0), 50.0), None);
        assert_eq!(node_at(&nodes, Position::new(59.9, 59.9), 50.0), Some(0));
    }

    #[test]
    fn parse_board_size() {
        assert_eq!(
            BoardSize::parse("800x600"),
            Some(BoardSize::new(800.0, 600.0))
        );
        assert_eq!(BoardSize::parse("10X5"), Some(BoardSize::new(10.0, 5.0)));
        assert_eq!(BoardSize::parse("800"), None);
        assert_eq!(BoardSize::parse("-1x5"), None);
        assert_eq!(BoardSize::parse("axb"), None);
    }
}
