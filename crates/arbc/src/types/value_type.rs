use crate::lexer::Keyword;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Integer,
    Decimal,
    String,
    Char,
    Boolean,
}

impl ValueType {
    /// Map a type keyword (`entero`, `cadena`, ...) to its value type
    pub fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::Integer => Some(ValueType::Integer),
            Keyword::Decimal => Some(ValueType::Decimal),
            Keyword::String => Some(ValueType::String),
            Keyword::Char => Some(ValueType::Char),
            Keyword::Boolean => Some(ValueType::Boolean),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ValueType::Integer | ValueType::Decimal)
    }

    /// String and char values cannot be ordered with `<`, `>`, `<=`, `>=`
    pub fn is_textual(self) -> bool {
        matches!(self, ValueType::String | ValueType::Char)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Integer => write!(f, "integer"),
            ValueType::Decimal => write!(f, "decimal"),
            ValueType::String => write!(f, "string"),
            ValueType::Char => write!(f, "char"),
            ValueType::Boolean => write!(f, "boolean"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_keyword() {
        assert_eq!(ValueType::from_keyword(Keyword::Integer), Some(ValueType::Integer));
        assert_eq!(ValueType::from_keyword(Keyword::Boolean), Some(ValueType::Boolean));
        assert_eq!(ValueType::from_keyword(Keyword::While), None);
    }

    #[test]
    fn test_classification() {
        assert!(ValueType::Decimal.is_numeric());
        assert!(!ValueType::Char.is_numeric());
        assert!(ValueType::Char.is_textual());
        assert!(!ValueType::Boolean.is_textual());
    }
}
