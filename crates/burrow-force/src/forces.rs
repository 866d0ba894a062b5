//! Velocity contributions applied once per tick, scaled by the current alpha.

use crate::graph::{ForceLink, ForceNode};
use crate::rng::XorShift64Star;
use burrow_core::{ForceConfig, Point};

/// Per-link strength and bias, derived from node degrees once per snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct LinkWeights {
    strength: Vec<f64>,
    bias: Vec<f64>,
}

impl LinkWeights {
    pub(crate) fn new(nodes: usize, links: &[ForceLink]) -> Self {
        let mut degree = vec![0usize; nodes];
        for l in links {
            degree[l.source] += 1;
            degree[l.target] += 1;
        }
        let mut weights = Self::default();
        for l in links {
            let (s, t) = (degree[l.source] as f64, degree[l.target] as f64);
            weights.strength.push(1.0 / s.min(t));
            weights.bias.push(s / (s + t));
        }
        weights
    }
}

fn nonzero(v: f64, rng: &mut XorShift64Star) -> f64 {
    if v == 0.0 { rng.jiggle() } else { v }
}

/// Springs pulling linked nodes toward `cfg.link_distance`.
pub(crate) fn apply_links(
    nodes: &mut [ForceNode],
    links: &[ForceLink],
    weights: &LinkWeights,
    cfg: &ForceConfig,
    alpha: f64,
    rng: &mut XorShift64Star,
) {
    for (i, link) in links.iter().enumerate() {
        if link.source == link.target {
            continue;
        }
        let (s, t) = (&nodes[link.source], &nodes[link.target]);
        let x = nonzero(t.x + t.vx - s.x - s.vx, rng);
        let y = nonzero(t.y + t.vy - s.y - s.vy, rng);
        let l = (x * x + y * y).sqrt();
        let k = (l - cfg.link_distance) / l * alpha * weights.strength[i];
        let (x, y) = (x * k, y * k);
        let b = weights.bias[i];

        let target = &mut nodes[link.target];
        target.vx -= x * b;
        target.vy -= y * b;
        let source = &mut nodes[link.source];
        source.vx += x * (1.0 - b);
        source.vy += y * (1.0 - b);
    }
}

/// Pairwise many-body force; negative strength repels.
pub(crate) fn apply_many_body(
    nodes: &mut [ForceNode],
    cfg: &ForceConfig,
    alpha: f64,
    rng: &mut XorShift64Star,
) {
    let min2 = cfg.charge_distance_min * cfg.charge_distance_min;
    let n = nodes.len();
    for i in 0..n {
        let (xi, yi) = (nodes[i].x, nodes[i].y);
        let (mut dvx, mut dvy) = (0.0, 0.0);
        for (j, other) in nodes.iter().enumerate() {
            if i == j {
                continue;
            }
            let x = nonzero(other.x - xi, rng);
            let y = nonzero(other.y - yi, rng);
            let mut l = x * x + y * y;
            if l < min2 {
                l = (min2 * l).sqrt();
            }
            let w = cfg.charge_strength * alpha / l;
            dvx += x * w;
            dvy += y * w;
        }
        nodes[i].vx += dvx;
        nodes[i].vy += dvy;
    }
}

/// Translates the whole snapshot so its mean sits on `center`.
pub(crate) fn apply_center(nodes: &mut [ForceNode], center: Point, strength: f64) {
    if nodes.is_empty() {
        return;
    }
    let n = nodes.len() as f64;
    let (sx, sy) = nodes
        .iter()
        .fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
    let dx = (sx / n - center.x) * strength;
    let dy = (sy / n - center.y) * strength;
    for node in nodes.iter_mut() {
        node.x -= dx;
        node.y -= dy;
    }
}

/// Keeps node centres at least two radii apart, using predicted positions.
pub(crate) fn apply_collide(
    nodes: &mut [ForceNode],
    cfg: &ForceConfig,
    rng: &mut XorShift64Star,
) {
    let r = cfg.collide_radius * 2.0;
    let r2 = r * r;
    let n = nodes.len();
    for i in 0..n {
        for j in i + 1..n {
            let xi = nodes[i].x + nodes[i].vx;
            let yi = nodes[i].y + nodes[i].vy;
            let x = xi - nodes[j].x - nodes[j].vx;
            let y = yi - nodes[j].y - nodes[j].vy;
            let l2 = x * x + y * y;
            if l2 >= r2 {
                continue;
            }
            let x = nonzero(x, rng);
            let y = nonzero(y, rng);
            let l = (x * x + y * y).sqrt();
            let k = (r - l) / l * cfg.collide_strength;
            // Equal radii split the correction evenly.
            let (x, y) = (x * k * 0.5, y * k * 0.5);
            nodes[i].vx += x;
            nodes[i].vy += y;
            nodes[j].vx -= x;
            nodes[j].vy -= y;
        }
    }
}

/// Weak per-axis pull toward `center`.
pub(crate) fn apply_gravity(nodes: &mut [ForceNode], center: Point, strength: f64, alpha: f64) {
    if strength == 0.0 {
        return;
    }
    for node in nodes.iter_mut() {
        node.vx += (center.x - node.x) * strength * alpha;
        node.vy += (center.y - node.y) * strength * alpha;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::NodeId;

    fn node(x: f64, y: f64) -> ForceNode {
        ForceNode {
            id: NodeId::new(format!("{x},{y}")),
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            fixed: None,
        }
    }

    #[test]
    fn stretched_link_pulls_endpoints_together() {
        let mut nodes = vec![node(0.0, 0.0), node(300.0, 0.0)];
        let links = [ForceLink {
            source: 0,
            target: 1,
        }];
        let weights = LinkWeights::new(2, &links);
        let mut rng = XorShift64Star::new(1);
        apply_links(&mut nodes, &links, &weights, &ForceConfig::default(), 1.0, &mut rng);
        assert!(nodes[0].vx > 0.0);
        assert!(nodes[1].vx < 0.0);
        assert_eq!(nodes[0].vx, -nodes[1].vx);
    }

    #[test]
    fn negative_charge_repels() {
        let mut nodes = vec![node(0.0, 0.0), node(10.0, 0.0)];
        let mut rng = XorShift64Star::new(1);
        apply_many_body(&mut nodes, &ForceConfig::default(), 1.0, &mut rng);
        assert!(nodes[0].vx < 0.0);
        assert!(nodes[1].vx > 0.0);
    }

    #[test]
    fn center_moves_the_mean_without_changing_shape() {
        let mut nodes = vec![node(0.0, 0.0), node(100.0, 50.0)];
        apply_center(&mut nodes, Point::new(500.0, 500.0), 1.0);
        assert_eq!(nodes[0].x, 450.0);
        assert_eq!(nodes[1].y, 525.0);
    }

    #[test]
    fn overlapping_nodes_are_pushed_apart() {
        let mut nodes = vec![node(0.0, 0.0), node(0.0, 0.0)];
        let mut rng = XorShift64Star::new(3);
        apply_collide(&mut nodes, &ForceConfig::default(), &mut rng);
        let dx = (nodes[0].x + nodes[0].vx) - (nodes[1].x + nodes[1].vx);
        let dy = (nodes[0].y + nodes[0].vy) - (nodes[1].y + nodes[1].vy);
        assert!(dx.hypot(dy) > 100.0);
    }
}
