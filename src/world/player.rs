use glam::Vec2;

/// World-space height of every wall, floor at `0`.
pub const WALL_HEIGHT: f32 = 1.0;

/// Keeps the eye strictly between floor and ceiling.
pub const EYE_MARGIN: f32 = 0.05;

/// Player view-point in world space.
///
/// * `pos` is in grid units, `+y` points south.
/// * `z` holds eye height above the floor.
/// * `tilt` is the pitch in radians, positive looks up.
/// * `bob` is the walk-bob index, produced by the simulation and turned into
///   a horizon offset by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    angle: f32, // radians (0 = east, clockwise on screen since +y is south)
    pub z: f32,
    pub tilt: f32,
    pub bob: i32,
}

impl Player {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        Self {
            pos,
            angle: angle.rem_euclid(std::f32::consts::TAU),
            z: WALL_HEIGHT * 0.5,
            tilt: 0.0,
            bob: 0,
        }
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle.rem_euclid(std::f32::consts::TAU);
    }

    /// Tile the player currently stands in.
    #[inline]
    pub fn tile(&self) -> (i32, i32) {
        (self.pos.x.floor() as i32, self.pos.y.floor() as i32)
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector along the heading.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Unit vector to the player's right on screen.
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        // +y is south, so right-hand is the CCW perpendicular in math terms
        self.forward().perp()
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Displacement for `forward` units ahead and `side` units to the right.
    pub fn step_vector(&self, forward: f32, side: f32) -> Vec2 {
        self.forward() * forward + self.right() * side
    }

    /// Positive turns right.
    pub fn turn(&mut self, delta: f32) {
        self.set_angle(self.angle + delta);
    }

    pub fn look(&mut self, delta: f32, max_tilt: f32) {
        self.tilt = (self.tilt + delta).clamp(-max_tilt, max_tilt);
    }

    pub fn raise(&mut self, delta: f32) {
        self.z = (self.z + delta).clamp(EYE_MARGIN, WALL_HEIGHT - EYE_MARGIN);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
