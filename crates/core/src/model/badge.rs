/// Cosmetic badge tier for a difficulty level (presentation metadata).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeTier {
    pub name: &'static str,
    pub color: &'static str,
}

/// Badge tiers in level order; the table length defines the level ceiling.
pub const BADGE_TIERS: [BadgeTier; 10] = [
    BadgeTier { name: "Heatblast", color: "#FF5722" },
    BadgeTier { name: "Four Arms", color: "#E53935" },
    BadgeTier { name: "Grey Matter", color: "#607D8B" },
    BadgeTier { name: "XLR8", color: "#2196F3" },
    BadgeTier { name: "Diamondhead", color: "#009688" },
    BadgeTier { name: "Cannonbolt", color: "#FFC107" },
    BadgeTier { name: "Wildvine", color: "#4CAF50" },
    BadgeTier { name: "Upgrade", color: "#3F51B5" },
    BadgeTier { name: "Ghostfreak", color: "#9C27B0" },
    BadgeTier { name: "Way Big", color: "#795548" },
];

/// Highest reachable level.
pub const MAX_LEVEL: u8 = BADGE_TIERS.len() as u8;

/// Badge earned at the given level, if the level is in range.
#[must_use]
pub fn badge_for_level(level: u8) -> Option<&'static BadgeTier> {
    if level == 0 {
        return None;
    }
    BADGE_TIERS.get(usize::from(level) - 1)
}

/// Badge unlocked by the next level-up, `None` at the ceiling.
#[must_use]
pub fn next_badge(level: u8) -> Option<&'static BadgeTier> {
    BADGE_TIERS.get(usize::from(level))
}
