/// Direction of a like mutation: `+1` or `-1`, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeDelta {
    Like,
    Unlike,
}

impl LikeDelta {
    pub fn value(self) -> i64 {
        match self {
            Self::Like => 1,
            Self::Unlike => -1,
        }
    }

    /// Parse a raw delta; anything other than `1` or `-1` is rejected.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Like),
            -1 => Some(Self::Unlike),
            _ => None,
        }
    }

    /// Apply the delta to a count, clamping at zero.
    pub fn apply(self, count: u32) -> u32 {
        match self {
            Self::Like => count.saturating_add(1),
            Self::Unlike => count.saturating_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value() {
        assert_eq!(LikeDelta::from_value(1), Some(LikeDelta::Like));
        assert_eq!(LikeDelta::from_value(-1), Some(LikeDelta::Unlike));
        assert_eq!(LikeDelta::from_value(0), None);
        assert_eq!(LikeDelta::from_value(2), None);
    }

    #[test]
    fn test_apply_clamps() {
        assert_eq!(LikeDelta::Unlike.apply(0), 0);
        assert_eq!(LikeDelta::Unlike.apply(3), 2);
        assert_eq!(LikeDelta::Like.apply(3), 4);
    }
}
