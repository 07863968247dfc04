use std::fmt;

/// Color channel recorded by a filtered sensor site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str("R"),
            Self::Green => f.write_str("G"),
            Self::Blue => f.write_str("B"),
        }
    }
}

/// Position of a pixel inside the repeating 2x2 tile.
///
/// ```text
/// R G      y odd
/// G B      y even
/// ```
/// Columns alternate with `x`: odd columns carry R/G, even columns G/B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CfaSite {
    /// Odd x, odd y.
    Red,
    /// Even x, odd y: green sharing its row with red samples.
    GreenRedRow,
    /// Odd x, even y: green sharing its row with blue samples.
    GreenBlueRow,
    /// Even x, even y.
    Blue,
}

impl CfaSite {
    pub fn channel(self) -> Channel {
        match self {
            CfaSite::Red => Channel::Red,
            CfaSite::GreenRedRow | CfaSite::GreenBlueRow => Channel::Green,
            CfaSite::Blue => Channel::Blue,
        }
    }
}

/// The RGGB color filter array. Classification depends only on the parity
/// of each coordinate, so the filter and the reconstructor agree on every
/// pixel as long as they share the same coordinate system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorFilterPattern;

impl ColorFilterPattern {
    pub const RGGB: ColorFilterPattern = ColorFilterPattern;

    pub fn site(&self, x: usize, y: usize) -> CfaSite {
        match (x % 2 == 1, y % 2 == 1) {
            (true, true) => CfaSite::Red,
            (false, true) => CfaSite::GreenRedRow,
            (true, false) => CfaSite::GreenBlueRow,
            (false, false) => CfaSite::Blue,
        }
    }

    pub fn channel(&self, x: usize, y: usize) -> Channel {
        self.site(x, y).channel()
    }
}

impl fmt::Display for ColorFilterPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RGGB")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity_classification() {
        let cfa = ColorFilterPattern::RGGB;
        assert_eq!(cfa.channel(1, 1), Channel::Red);
        assert_eq!(cfa.channel(0, 0), Channel::Blue);
        assert_eq!(cfa.channel(1, 0), Channel::Green);
        assert_eq!(cfa.channel(0, 1), Channel::Green);

        assert_eq!(cfa.site(1, 0), CfaSite::GreenBlueRow);
        assert_eq!(cfa.site(0, 1), CfaSite::GreenRedRow);
    }

    #[test]
    fn test_pattern_tiles_every_two_pixels() {
        let cfa = ColorFilterPattern::RGGB;
        for y in 0..8 {
            for x in 0..8 {
                let site = cfa.site(x, y);
                assert_eq!(cfa.site(x + 2, y), site);
                assert_eq!(cfa.site(x, y + 2), site);
                assert_eq!(cfa.site(x % 2, y % 2), site);
            }
        }
    }

    #[test]
    fn test_two_greens_per_tile() {
        let cfa = ColorFilterPattern::RGGB;
        let greens = [(0, 0), (1, 0), (0, 1), (1, 1)]
            .iter()
            .filter(|&&(x, y)| cfa.channel(x, y) == Channel::Green)
            .count();
        assert_eq!(greens, 2);
    }
}
