/// Gradient used for any category not in the table
pub const DEFAULT_GRADIENT: &str = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)";

const CATEGORY_GRADIENTS: &[(&str, &str)] = &[
    ("Programming", "linear-gradient(135deg, #667eea 0%, #764ba2 100%)"),
    ("Software Engineering", "linear-gradient(135deg, #f093fb 0%, #f5576c 100%)"),
    ("Machine Learning", "linear-gradient(135deg, #4facfe 0%, #00f2fe 100%)"),
    ("Data Science", "linear-gradient(135deg, #fa709a 0%, #fee140 100%)"),
    ("Algorithms", "linear-gradient(135deg, #43e97b 0%, #38f9d7 100%)"),
    ("Web Development", "linear-gradient(135deg, #a8edea 0%, #fed6e3 100%)"),
    ("Networking", "linear-gradient(135deg, #ff9a56 0%, #ff6a88 100%)"),
    ("Cloud Computing", "linear-gradient(135deg, #5f72bd 0%, #9921e8 100%)"),
];

/// Cover background for a book category (exact, case-sensitive match)
pub fn category_gradient(category: &str) -> &'static str {
    CATEGORY_GRADIENTS
        .iter()
        .find(|(name, _)| *name == category)
        .map_or(DEFAULT_GRADIENT, |(_, gradient)| gradient)
}
