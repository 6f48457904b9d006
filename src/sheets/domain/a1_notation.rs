use std::fmt::Formatter;

/// A range reference such as `'Sheet1'!A1:D11`, passed verbatim to the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Notation(String);

impl std::fmt::Display for A1Notation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<A1Notation> for String {
    fn from(a1_notation: A1Notation) -> Self {
        a1_notation.0
    }
}

impl From<String> for A1Notation {
    fn from(s: String) -> Self {
        A1Notation(s)
    }
}

impl AsRef<str> for A1Notation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub trait ToA1Notation {
    fn to_a1_notation(&self, sheet_name: Option<&str>) -> A1Notation;
}

/// Sheet titles are always quoted; embedded quotes are doubled.
pub fn quote_sheet_title(sheet_title: &str) -> String {
    format!("'{}'", sheet_title.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain_title() {
        assert_eq!(quote_sheet_title("Sheet1"), "'Sheet1'");
    }

    #[test]
    fn test_quote_title_with_spaces_and_quotes() {
        assert_eq!(quote_sheet_title("Bob's data"), "'Bob''s data'");
    }

    #[test]
    fn test_a1_notation_conversions() {
        let a1 = A1Notation::from("A1:B2".to_string());
        assert_eq!(a1.as_ref(), "A1:B2");
        assert_eq!(a1.to_string(), "A1:B2");
        assert_eq!(String::from(a1), "A1:B2");
    }
}
