//! Gauss-Legendre rules on the unit interval, square and triangle.

use std::f64::consts::PI;

use crate::error::{IntegrationError, Result};

const NEWTON_MAX_ITERATIONS: usize = 100;

/// An `n`-point Gauss-Legendre rule on `[0, 1]`, exact for polynomials of
/// degree `2n - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLegendre {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

/// Legendre polynomial `P_n(x)` and `P_{n-1}(x)` by the three-term
/// recurrence.
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let (mut p0, mut p1) = (1.0, x);
    for k in 2..=n {
        let kf = k as f64;
        let p2 = ((2.0 * kf - 1.0) * x * p1 - (kf - 1.0) * p0) / kf;
        p0 = p1;
        p1 = p2;
    }
    if n == 0 {
        (1.0, 0.0)
    } else {
        (p1, p0)
    }
}

/// `P_n'(x)` from `P_n(x)` and `P_{n-1}(x)`; undefined at `x = ±1`.
fn legendre_derivative(n: usize, x: f64, p: f64, prev: f64) -> f64 {
    n as f64 * (x * p - prev) / (x * x - 1.0)
}

impl GaussLegendre {
    /// Nodes and weights for an `n`-point rule.
    ///
    /// Roots of `P_n` on `[-1, 1]` are refined by Newton iteration from the
    /// Chebyshev-like initial guesses, then mapped to `[0, 1]`.
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(IntegrationError::InvalidQuadratureOrder(n));
        }
        let nf = n as f64;
        let mut nodes = vec![0.0; n];
        let mut weights = vec![0.0; n];
        for i in 0..n.div_ceil(2) {
            let mut x = (PI * (i as f64 + 0.75) / (nf + 0.5)).cos();
            for _ in 0..NEWTON_MAX_ITERATIONS {
                let (p, prev) = legendre(n, x);
                let dx = p / legendre_derivative(n, x, p, prev);
                x -= dx;
                if dx.abs() <= 1e-16 {
                    break;
                }
            }
            let (p, prev) = legendre(n, x);
            let dp = legendre_derivative(n, x, p, prev);
            let w = 1.0 / ((1.0 - x * x) * dp * dp);
            nodes[i] = (1.0 - x) / 2.0;
            nodes[n - 1 - i] = (1.0 + x) / 2.0;
            weights[i] = w;
            weights[n - 1 - i] = w;
        }
        Ok(Self { nodes, weights })
    }

    /// Number of points.
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes in increasing order.
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Weights matching [`nodes`](Self::nodes); they sum to 1.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Integrate `f` over `[0, 1]`.
    pub fn integrate(&self, f: impl Fn(f64) -> f64) -> f64 {
        self.nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(x))
            .sum()
    }
}

/// One weighted sample of a two-dimensional rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadPoint {
    /// First parameter.
    pub u: f64,
    /// Second parameter.
    pub v: f64,
    /// Weight, including the domain Jacobian.
    pub weight: f64,
}

/// Tensor-product rule on the unit square.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareRule {
    order: usize,
    points: Vec<QuadPoint>,
}

impl SquareRule {
    /// `order x order` points.
    pub fn new(order: usize) -> Result<Self> {
        let gl = GaussLegendre::new(order)?;
        let mut points = Vec::with_capacity(order * order);
        for (&u, &wu) in gl.nodes.iter().zip(&gl.weights) {
            for (&v, &wv) in gl.nodes.iter().zip(&gl.weights) {
                points.push(QuadPoint { u, v, weight: wu * wv });
            }
        }
        Ok(Self { order, points })
    }

    /// Points per direction.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Sample points; weights sum to 1.
    pub fn points(&self) -> &[QuadPoint] {
        &self.points
    }
}

/// Collapsed rule on the triangle `u, v >= 0, u + v <= 1`.
///
/// The square is mapped onto the triangle by `v = (1 - u) t`, so the
/// weights carry the factor `1 - u` and sum to 1/2.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleRule {
    order: usize,
    points: Vec<QuadPoint>,
}

impl TriangleRule {
    /// `order x order` points.
    pub fn new(order: usize) -> Result<Self> {
        let gl = GaussLegendre::new(order)?;
        let mut points = Vec::with_capacity(order * order);
        for (&u, &wu) in gl.nodes.iter().zip(&gl.weights) {
            for (&t, &wt) in gl.nodes.iter().zip(&gl.weights) {
                points.push(QuadPoint {
                    u,
                    v: (1.0 - u) * t,
                    weight: wu * wt * (1.0 - u),
                });
            }
        }
        Ok(Self { order, points })
    }

    /// Points per direction.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Sample points; weights sum to 1/2.
    pub fn points(&self) -> &[QuadPoint] {
        &self.points
    }
}
