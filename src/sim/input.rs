use bitflags::bitflags;
use thiserror::Error;

bitflags! {
    /// One tick's input snapshot, keyed by logical action.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Actions: u16 {
        const FORWARD      = 1 << 0;
        const BACK         = 1 << 1;
        const STRAFE_LEFT  = 1 << 2;
        const STRAFE_RIGHT = 1 << 3;
        const TURN_LEFT    = 1 << 4;
        const TURN_RIGHT   = 1 << 5;
        const LOOK_UP      = 1 << 6;
        const LOOK_DOWN    = 1 << 7;
        // Raise / lower the viewpoint.
        const RAISE        = 1 << 8;
        const LOWER        = 1 << 9;
        // Use a door.  Edge-triggered by the tick runner.
        const INTERACT     = 1 << 10;
        const FIRE         = 1 << 11;
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown input action `{0}`")]
    UnknownAction(String),
}

impl Actions {
    /// Logical names accepted by [`from_pairs`](Self::from_pairs), in bit order.
    pub const NAMES: [(&'static str, Actions); 12] = [
        ("forward", Actions::FORWARD),
        ("back", Actions::BACK),
        ("strafe_left", Actions::STRAFE_LEFT),
        ("strafe_right", Actions::STRAFE_RIGHT),
        ("turn_left", Actions::TURN_LEFT),
        ("turn_right", Actions::TURN_RIGHT),
        ("look_up", Actions::LOOK_UP),
        ("look_down", Actions::LOOK_DOWN),
        ("raise", Actions::RAISE),
        ("lower", Actions::LOWER),
        ("interact", Actions::INTERACT),
        ("fire", Actions::FIRE),
    ];

    pub fn by_name(name: &str) -> Result<Actions, InputError> {
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, a)| a)
            .ok_or_else(|| InputError::UnknownAction(name.to_string()))
    }

    /// Build a snapshot from an input collaborator's `{name: pressed}` table.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Actions, InputError>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut out = Actions::empty();
        for (name, pressed) in pairs {
            out.set(Self::by_name(name)?, pressed);
        }
        Ok(out)
    }

    /// `+1`, `-1` or `0` for an opposing pair of actions.
    #[inline]
    pub fn axis(self, positive: Actions, negative: Actions) -> f32 {
        self.contains(positive) as i32 as f32 - self.contains(negative) as i32 as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_set_and_clear_flags() {
        let a = Actions::from_pairs([("forward", true), ("fire", true), ("back", false)]).unwrap();
        assert_eq!(a, Actions::FORWARD | Actions::FIRE);
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert_eq!(
            Actions::from_pairs([("jump", true)]).unwrap_err(),
            InputError::UnknownAction("jump".into())
        );
    }

    #[test]
    fn opposing_actions_cancel() {
        let a = Actions::FORWARD | Actions::BACK | Actions::TURN_LEFT;
        assert_eq!(a.axis(Actions::FORWARD, Actions::BACK), 0.0);
        assert_eq!(a.axis(Actions::TURN_RIGHT, Actions::TURN_LEFT), -1.0);
    }

    #[test]
    fn every_flag_has_a_name() {
        let all = Actions::NAMES
            .iter()
            .fold(Actions::empty(), |acc, &(_, a)| acc | a);
        assert_eq!(all, Actions::all());
    }
}
