/// The rover's simulated emotional state, as reported by `Get Face`.
///
/// Only the exact replies `Happy` and `Sad` are recognised.
///
/// # Example
///
/// ```
/// use rover_panel::Mood;
///
/// assert_eq!(Mood::from_reply("Sad"), Some(Mood::Sad));
/// assert_eq!(Mood::from_reply("sad"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Happy,
    Sad,
}

impl Mood {
    pub fn from_reply(reply: &str) -> Option<Self> {
        match reply {
            "Happy" => Some(Mood::Happy),
            "Sad" => Some(Mood::Sad),
            _ => None,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Mood::Happy => "^ w ^ Y",
            Mood::Sad => ". _ .",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact() {
        assert_eq!(Mood::from_reply("Happy"), Some(Mood::Happy));
        assert_eq!(Mood::from_reply("Sad"), Some(Mood::Sad));
        assert_eq!(Mood::from_reply(""), None);
        assert_eq!(Mood::from_reply("HAPPY"), None);
        assert_eq!(Mood::from_reply(" Sad"), None);
    }
}
