//! Static store layout: departments plus entry and exit doors.
//!
//! The layout is built once at store construction and never mutated. It
//! maps each [`ProductCategory`] to the centre of its department, falling
//! back to the exit for categories without a department.

use storesim_types::{Position, ProductCategory};

/// Width of a standard department.
pub const DEPARTMENT_WIDTH: i32 = 100;

/// Height of a standard department.
pub const DEPARTMENT_HEIGHT: i32 = 200;

/// Default entry door.
pub const DEFAULT_ENTRY: Position = Position::new(50, 500);

/// Default exit door.
pub const DEFAULT_EXIT: Position = Position::new(750, 575);

/// A named rectangular region selling one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    /// Display name.
    pub name: String,
    /// What the department sells.
    pub category: ProductCategory,
    /// Top-left corner.
    pub origin: Position,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Department {
    /// A rectangular department.
    pub fn new(
        name: impl Into<String>,
        category: ProductCategory,
        origin: Position,
        width: i32,
        height: i32,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            origin,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// A point section: a zero-sized department.
    pub fn point(name: impl Into<String>, category: ProductCategory, at: Position) -> Self {
        Self::new(name, category, at, 0, 0)
    }

    /// Centre of the rectangle, rounded toward the origin.
    pub const fn center(&self) -> Position {
        Position::new(
            self.origin.x.saturating_add(half(self.width)),
            self.origin.y.saturating_add(half(self.height)),
        )
    }
}

const fn half(extent: i32) -> i32 {
    match extent.checked_div(2) {
        Some(value) => value,
        None => 0,
    }
}

/// Departments and doors of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    departments: Vec<Department>,
    entry: Position,
    exit: Position,
}

impl StoreLayout {
    /// Build a layout from explicit parts.
    pub const fn new(departments: Vec<Department>, entry: Position, exit: Position) -> Self {
        Self {
            departments,
            entry,
            exit,
        }
    }

    /// The five reference departments with the default doors.
    pub fn standard() -> Self {
        let departments = [
            (ProductCategory::Dairy, Position::new(200, 100)),
            (ProductCategory::Vegetables, Position::new(400, 100)),
            (ProductCategory::Meat, Position::new(600, 100)),
            (ProductCategory::Bread, Position::new(200, 350)),
            (ProductCategory::Sugar, Position::new(400, 350)),
        ]
        .into_iter()
        .map(|(category, origin)| {
            Department::new(
                category.department_name(),
                category,
                origin,
                DEPARTMENT_WIDTH,
                DEPARTMENT_HEIGHT,
            )
        })
        .collect();
        Self::new(departments, DEFAULT_ENTRY, DEFAULT_EXIT)
    }

    /// Replace the entry and exit doors.
    #[must_use]
    pub const fn with_doors(mut self, entry: Position, exit: Position) -> Self {
        self.entry = entry;
        self.exit = exit;
        self
    }

    /// All departments, in construction order.
    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// The entry door.
    pub const fn entry(&self) -> Position {
        self.entry
    }

    /// The exit door.
    pub const fn exit(&self) -> Position {
        self.exit
    }

    /// The first department selling `category`.
    pub fn department_for(&self, category: ProductCategory) -> Option<&Department> {
        self.departments.iter().find(|d| d.category == category)
    }

    /// Where a customer wanting `category` should walk to. Categories with
    /// no department resolve to the exit.
    pub fn target_for(&self, category: ProductCategory) -> Position {
        self.department_for(category)
            .map_or(self.exit, Department::center)
    }

    /// Categories that have a department, in construction order.
    pub fn categories(&self) -> Vec<ProductCategory> {
        self.departments.iter().map(|d| d.category).collect()
    }
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_layout_has_five_departments() {
        let layout = StoreLayout::standard();
        assert_eq!(layout.departments().len(), 5);
        assert_eq!(layout.entry(), Position::new(50, 500));
        assert_eq!(layout.exit(), Position::new(750, 575));
    }

    #[test]
    fn target_is_department_center() {
        let layout = StoreLayout::standard();
        assert_eq!(layout.target_for(ProductCategory::Vegetables), Position::new(450, 200));
        assert_eq!(layout.target_for(ProductCategory::Sugar), Position::new(450, 450));
    }

    #[test]
    fn unknown_category_targets_exit() {
        let layout = StoreLayout::standard();
        assert_eq!(layout.target_for(ProductCategory::Unknown), layout.exit());
    }

    #[test]
    fn missing_department_targets_exit() {
        let layout = StoreLayout::new(
            vec![Department::point("Bakery", ProductCategory::Bread, Position::new(10, 10))],
            Position::new(0, 0),
            Position::new(99, 99),
        );
        assert_eq!(layout.target_for(ProductCategory::Bread), Position::new(10, 10));
        assert_eq!(layout.target_for(ProductCategory::Meat), Position::new(99, 99));
    }

    #[test]
    fn department_names_resolve_back_to_categories() {
        let layout = StoreLayout::standard();
        for department in layout.departments() {
            assert_eq!(ProductCategory::from_label(&department.name), department.category);
        }
    }
}
