//! Users and categories master sheets.
//!
//! Both are read-only lookup lists with a header row. Unlike tasks, rows
//! with empty cells are kept: a blank line in a master sheet is visible
//! data the operator curates, not noise to drop.

use serde::{Deserialize, Serialize};

use crate::task::cell_or_empty;

/// Column span of the users sheet.
pub const USER_SPAN: &str = "A:C";

/// Column span of the categories sheet.
pub const CATEGORY_SPAN: &str = "A:A";

/// A row of the users master sheet. Email is the stable identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
    pub role: String,
}

/// A row of the categories master sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

/// Map a raw grid to users: header row skipped, every data row kept.
pub fn parse_user_grid(values: &[Vec<String>]) -> Vec<User> {
    if values.len() < 2 {
        return Vec::new();
    }
    values[1..]
        .iter()
        .map(|row| User {
            email: cell_or_empty(row, 0).to_string(),
            name: cell_or_empty(row, 1).to_string(),
            role: cell_or_empty(row, 2).to_string(),
        })
        .collect()
}

/// Map a raw grid to categories: header row skipped, every data row kept.
pub fn parse_category_grid(values: &[Vec<String>]) -> Vec<Category> {
    if values.len() < 2 {
        return Vec::new();
    }
    values[1..]
        .iter()
        .map(|row| Category {
            name: cell_or_empty(row, 0).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_of(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn user_grid_needs_two_rows() {
        assert!(parse_user_grid(&[]).is_empty());
        assert!(parse_user_grid(&[row_of(&["email", "name", "role"])]).is_empty());
    }

    #[test]
    fn user_grid_maps_columns_in_order() {
        let grid = vec![
            row_of(&["email", "name", "role"]),
            row_of(&["alice@example.com", "Alice", "admin"]),
            row_of(&["bob@example.com", "Bob"]),
        ];

        let users = parse_user_grid(&grid);
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].email, "alice@example.com");
        assert_eq!(users[0].name, "Alice");
        assert_eq!(users[0].role, "admin");
        assert_eq!(users[1].role, "");
    }

    #[test]
    fn user_grid_keeps_empty_rows() {
        let grid = vec![row_of(&["email", "name", "role"]), row_of(&["", "", ""])];

        let users = parse_user_grid(&grid);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0], User {
            email: String::new(),
            name: String::new(),
            role: String::new(),
        });
    }

    #[test]
    fn category_grid_keeps_empty_names() {
        let grid = vec![row_of(&["name"]), row_of(&["Errand"]), row_of(&[""])];

        let categories = parse_category_grid(&grid);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Errand");
        assert_eq!(categories[1].name, "");
    }
}
