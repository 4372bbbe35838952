/// Spending category assigned to receipts and to their individual line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Category {
    Food,
    Furniture,
    Stationery,
    Medicine,
    BabyAccessories,
    MobileAccessories,
    PetItems,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Furniture,
        Category::Stationery,
        Category::Medicine,
        Category::BabyAccessories,
        Category::MobileAccessories,
        Category::PetItems,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Furniture => "Furniture",
            Category::Stationery => "Stationery",
            Category::Medicine => "Medicine",
            Category::BabyAccessories => "Baby Accessories",
            Category::MobileAccessories => "Mobile Accessories",
            Category::PetItems => "Pet Items",
            Category::Other => "Other",
        }
    }

    /// Resolves a free-form label (as returned by the annotation service or
    /// typed by a user). Case and whitespace are ignored. Anything that does
    /// not name a known category resolves to `Other`.
    pub fn from_label(label: &str) -> Self {
        let wanted = normalize(label);
        Self::ALL
            .into_iter()
            .find(|c| normalize(c.label()) == wanted)
            .unwrap_or(Category::Other)
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Food", Category::Food)]
    #[case("baby accessories", Category::BabyAccessories)]
    #[case("MobileAccessories", Category::MobileAccessories)]
    #[case("  Pet Items ", Category::PetItems)]
    #[case("Groceries", Category::Other)]
    #[case("", Category::Other)]
    fn resolves_labels(#[case] label: &str, #[case] expected: Category) {
        assert_eq!(Category::from_label(label), expected);
    }

    #[test]
    fn labels_resolve_to_themselves() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), category);
        }
    }
}
