//! The static category table shared by the transaction form, the table view,
//! and the dashboard charts.
//!
//! Categories are referenced by key from transaction records; the label and
//! color live here rather than in the database so they can be tweaked without
//! a migration.

use super::models::TransactionKind;

/// A category that transactions can be labelled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// The stable key stored on transaction records.
    pub key: &'static str,
    /// The label shown in the UI.
    pub label: &'static str,
    /// The badge and chart color as a CSS hex string.
    pub color: &'static str,
    /// Which kind of transaction the category applies to.
    pub kind: TransactionKind,
}

/// Every category, income first, in the order they are offered in forms.
pub const CATEGORIES: &[Category] = &[
    Category {
        key: "salary",
        label: "Salary",
        color: "#22c55e",
        kind: TransactionKind::Income,
    },
    Category {
        key: "freelance",
        label: "Freelance",
        color: "#06b6d4",
        kind: TransactionKind::Income,
    },
    Category {
        key: "investments",
        label: "Investments",
        color: "#6366f1",
        kind: TransactionKind::Income,
    },
    Category {
        key: "other-income",
        label: "Other Income",
        color: "#64748b",
        kind: TransactionKind::Income,
    },
    Category {
        key: "housing",
        label: "Housing",
        color: "#ef4444",
        kind: TransactionKind::Expense,
    },
    Category {
        key: "transportation",
        label: "Transportation",
        color: "#f97316",
        kind: TransactionKind::Expense,
    },
    Category {
        key: "groceries",
        label: "Groceries",
        color: "#84cc16",
        kind: TransactionKind::Expense,
    },
    Category {
        key: "utilities",
        label: "Utilities",
        color: "#0ea5e9",
        kind: TransactionKind::Expense,
    },
    Category {
        key: "entertainment",
        label: "Entertainment",
        color: "#8b5cf6",
        kind: TransactionKind::Expense,
    },
    Category {
        key: "food",
        label: "Food & Dining",
        color: "#f59e0b",
        kind: TransactionKind::Expense,
    },
    Category {
        key: "shopping",
        label: "Shopping",
        color: "#ec4899",
        kind: TransactionKind::Expense,
    },
    Category {
        key: "healthcare",
        label: "Healthcare",
        color: "#14b8a6",
        kind: TransactionKind::Expense,
    },
    Category {
        key: "education",
        label: "Education",
        color: "#3b82f6",
        kind: TransactionKind::Expense,
    },
    Category {
        key: "travel",
        label: "Travel",
        color: "#a855f7",
        kind: TransactionKind::Expense,
    },
    Category {
        key: "other",
        label: "Other",
        color: "#6b7280",
        kind: TransactionKind::Expense,
    },
];

/// The badge color used when a transaction references an unknown category key.
const FALLBACK_COLOR: &str = "#6b7280";

/// Look up a category by its key.
pub fn get_category(key: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| category.key == key)
}

/// The display color for a category key, falling back to gray for keys that
/// are no longer in the table.
pub fn category_color(key: &str) -> &'static str {
    get_category(key)
        .map(|category| category.color)
        .unwrap_or(FALLBACK_COLOR)
}

/// The display label for a category key. Unknown keys display as themselves so
/// stale data still renders.
pub fn category_label(key: &str) -> &str {
    get_category(key)
        .map(|category| category.label)
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::{CATEGORIES, FALLBACK_COLOR, category_color, category_label, get_category};

    #[test]
    fn keys_are_unique() {
        for (i, category) in CATEGORIES.iter().enumerate() {
            let duplicate = CATEGORIES
                .iter()
                .skip(i + 1)
                .find(|other| other.key == category.key);

            assert!(
                duplicate.is_none(),
                "duplicate category key {:?}",
                category.key
            );
        }
    }

    #[test]
    fn finds_known_category() {
        let category = get_category("groceries").expect("groceries should exist");

        assert_eq!(category.label, "Groceries");
    }

    #[test]
    fn unknown_key_gets_fallback_color_and_own_label() {
        assert_eq!(category_color("floppy-disks"), FALLBACK_COLOR);
        assert_eq!(category_label("floppy-disks"), "floppy-disks");
    }
}
