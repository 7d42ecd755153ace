#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub color: Rgb,
}

/// Topics offered during onboarding, in display order.
pub const CATEGORY_CATALOG: [Category; 11] = [
    Category { name: "Technology", color: Rgb(0xFF, 0x63, 0x47) },
    Category { name: "Science", color: Rgb(0x46, 0x82, 0xB4) },
    Category { name: "Health", color: Rgb(0x32, 0xCD, 0x32) },
    Category { name: "Sports", color: Rgb(0xFF, 0xA5, 0x00) },
    Category { name: "Business", color: Rgb(0x8A, 0x2B, 0xE2) },
    Category { name: "Entertainment", color: Rgb(0xFF, 0x69, 0xB4) },
    Category { name: "Travel", color: Rgb(0x20, 0xB2, 0xAA) },
    Category { name: "Food", color: Rgb(0xFF, 0x45, 0x00) },
    Category { name: "Lifestyle", color: Rgb(0x00, 0xFF, 0x7F) },
    Category { name: "Politics", color: Rgb(0x80, 0x00, 0x80) },
    Category { name: "Environment", color: Rgb(0x00, 0x80, 0x80) },
];

/// Case-insensitive catalog lookup, so stored names like `technology` still
/// pick up their chip color.
pub fn find_category(name: &str) -> Option<&'static Category> {
    CATEGORY_CATALOG
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}
