use std::num::NonZeroU32;

use super::{
    a1_notation::{quote_sheet_title, A1Notation, ToA1Notation},
    column::Column,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub col: Column,
    /// 1-based, as displayed in the sheet.
    pub row: NonZeroU32,
}

impl CellPosition {
    pub const TOP_LEFT: CellPosition = CellPosition {
        col: Column::FIRST,
        row: NonZeroU32::MIN,
    };
}

impl ToA1Notation for CellPosition {
    fn to_a1_notation(&self, sheet_name: Option<&str>) -> A1Notation {
        match sheet_name {
            Some(sheet_name) => {
                format!("{}!{}{}", quote_sheet_title(sheet_name), self.col, self.row).into()
            }
            None => format!("{}{}", self.col, self.row).into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellPosition,
    pub end: CellPosition,
    pub sheet_title: Option<String>,
}

impl CellRange {
    /// Range anchored at `A1` spanning `row_count` x `column_count` cells.
    /// Returns `None` for an empty extent.
    pub fn from_top_left(row_count: u32, column_count: u32) -> Option<Self> {
        Some(Self {
            start: CellPosition::TOP_LEFT,
            end: CellPosition {
                col: Column::new(column_count)?,
                row: NonZeroU32::new(row_count)?,
            },
            sheet_title: None,
        })
    }

    pub fn with_sheet_title(self, sheet_title: impl Into<String>) -> Self {
        Self {
            sheet_title: Some(sheet_title.into()),
            ..self
        }
    }
}

impl ToA1Notation for CellRange {
    fn to_a1_notation(&self, sheet_name: Option<&str>) -> A1Notation {
        let sheet_name = sheet_name.or(self.sheet_title.as_deref());
        let start = self.start.to_a1_notation(sheet_name);
        let end = self.end.to_a1_notation(None);
        format!("{}:{}", start, end).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_top_left_extent() {
        let range = CellRange::from_top_left(11, 4).unwrap();
        assert_eq!(range.start, CellPosition::TOP_LEFT);
        assert_eq!(range.end.row.get(), 11);
        assert_eq!(range.end.col, Column::new(4).unwrap());
    }

    #[test]
    fn test_from_top_left_rejects_empty_extent() {
        assert_eq!(CellRange::from_top_left(0, 4), None);
        assert_eq!(CellRange::from_top_left(3, 0), None);
    }

    #[test]
    fn test_range_a1_notation_without_sheet() {
        let range = CellRange::from_top_left(11, 4).unwrap();
        assert_eq!(range.to_a1_notation(None).as_ref(), "A1:D11");
    }

    #[test]
    fn test_range_a1_notation_uses_own_sheet_title() {
        let range = CellRange::from_top_left(2, 28)
            .unwrap()
            .with_sheet_title("Sheet1");
        assert_eq!(range.to_a1_notation(None).as_ref(), "'Sheet1'!A1:AB2");
    }

    #[test]
    fn test_range_a1_notation_explicit_sheet_wins() {
        let range = CellRange::from_top_left(1, 1)
            .unwrap()
            .with_sheet_title("Sheet1");
        assert_eq!(
            range.to_a1_notation(Some("Produtos")).as_ref(),
            "'Produtos'!A1:A1"
        );
    }

    #[test]
    fn test_position_a1_notation() {
        assert_eq!(CellPosition::TOP_LEFT.to_a1_notation(None).as_ref(), "A1");
    }
}
