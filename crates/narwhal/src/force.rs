//! Pairwise force kinds.
//!
//! Every force is evaluated from the point of view of one endpoint (the *target*): the engine
//! calls [`Force::force`] once per endpoint of a pair with the roles swapped, so asymmetric
//! kinds are possible and symmetric ones need no special casing.
//!
//! Sign convention: `displacement = source.position - target.position`, and the returned vector
//! is the force acting on `target`.

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::{Result, ensure_positive};
use crate::geom::{Vec2, clamped_norm};

/// Smallest distance used when normalizing a displacement.
pub const MIN_DISTANCE: f64 = 0.01;

/// Read-only snapshot of a node taken at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f64,
}

pub trait Force: Debug + Send + Sync {
    /// Force exerted on `target` by its relation with `source`.
    fn force(&self, source: &Body, target: &Body, displacement: Vec2) -> Vec2;
}

/// Shared forces, e.g. one queued as a [`Command`](crate::Command) and cloned with it.
impl<F: Force + ?Sized> Force for Arc<F> {
    fn force(&self, source: &Body, target: &Body, displacement: Vec2) -> Vec2 {
        (**self).force(source, target, displacement)
    }
}

/// Hooke spring toward a rest length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    stiffness: f64,
    rest_length: f64,
}

impl Spring {
    pub fn new(stiffness: f64, rest_length: f64) -> Result<Self> {
        Ok(Self {
            stiffness: ensure_positive("stiffness", stiffness)?,
            rest_length: ensure_positive("rest length", rest_length)?,
        })
    }

    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    pub fn rest_length(&self) -> f64 {
        self.rest_length
    }
}

impl Force for Spring {
    fn force(&self, _source: &Body, _target: &Body, displacement: Vec2) -> Vec2 {
        let n = clamped_norm(&displacement, MIN_DISTANCE);
        // Stretched (n > l0) pulls the target toward the source, compressed pushes it away.
        displacement * (self.stiffness * (n - self.rest_length) / n)
    }
}

/// Inverse-square push between two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repulsion {
    strength: f64,
}

impl Repulsion {
    pub fn new(strength: f64) -> Result<Self> {
        Ok(Self {
            strength: ensure_positive("repulsion strength", strength)?,
        })
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }
}

impl Force for Repulsion {
    fn force(&self, _source: &Body, _target: &Body, displacement: Vec2) -> Vec2 {
        let n = clamped_norm(&displacement, MIN_DISTANCE);
        -displacement * (self.strength / (n * n * n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::vec2;

    fn body(x: f64, y: f64) -> Body {
        Body {
            position: vec2(x, y),
            velocity: Vec2::zeros(),
            mass: 1.0,
        }
    }

    #[test]
    fn spring_is_zero_at_rest_length() {
        let spring = Spring::new(10.0, 5.0).unwrap();
        let (a, b) = (body(0.0, 0.0), body(3.0, 4.0));
        let f = spring.force(&b, &a, b.position - a.position);
        assert_eq!(f, Vec2::zeros());
    }

    #[test]
    fn stretched_spring_pulls_both_endpoints_together() {
        let spring = Spring::new(2.0, 1.0).unwrap();
        let (a, b) = (body(0.0, 0.0), body(3.0, 0.0));
        let on_a = spring.force(&b, &a, b.position - a.position);
        let on_b = spring.force(&a, &b, a.position - b.position);
        assert_eq!(on_a, vec2(4.0, 0.0));
        assert_eq!(on_b, vec2(-4.0, 0.0));
    }

    #[test]
    fn compressed_spring_pushes_endpoints_apart() {
        let spring = Spring::new(2.0, 4.0).unwrap();
        let (a, b) = (body(0.0, 0.0), body(0.0, 1.0));
        let on_a = spring.force(&b, &a, b.position - a.position);
        assert!(on_a.y < 0.0, "expected push away from b, got {on_a:?}");
    }

    #[test]
    fn coincident_nodes_stay_finite() {
        let spring = Spring::new(2.0, 4.0).unwrap();
        let repulsion = Repulsion::new(1.0).unwrap();
        let a = body(1.0, 1.0);
        let f = spring.force(&a, &a, Vec2::zeros());
        let r = repulsion.force(&a, &a, Vec2::zeros());
        assert!(f.x.is_finite() && f.y.is_finite());
        assert!(r.x.is_finite() && r.y.is_finite());
    }

    #[test]
    fn repulsion_points_away_from_source() {
        let repulsion = Repulsion::new(8.0).unwrap();
        let (a, b) = (body(0.0, 0.0), body(2.0, 0.0));
        let on_a = repulsion.force(&b, &a, b.position - a.position);
        assert_eq!(on_a, vec2(-2.0, 0.0));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(Spring::new(0.0, 1.0).is_err());
        assert!(Spring::new(1.0, -1.0).is_err());
        assert!(Spring::new(f64::NAN, 1.0).is_err());
        assert!(Repulsion::new(0.0).is_err());
    }
}
