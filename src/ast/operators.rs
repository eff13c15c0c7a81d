/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// Less than or equal (`<=`)
    LessThanOrEqual,
    /// Equal (`==`)
    Equal,
    /// Greater than or equal (`>=`)
    GreaterThanOrEqual,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
}

impl Comparator {
    /// Every comparator in the order the parser searches for them. Two-character
    /// symbols come first so `<` and `>` never split a `<=` or `>=`.
    pub const ALL: [Comparator; 6] = [
        Comparator::LessThanOrEqual,
        Comparator::Equal,
        Comparator::GreaterThanOrEqual,
        Comparator::NotEqual,
        Comparator::LessThan,
        Comparator::GreaterThan,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::LessThanOrEqual => "<=",
            Comparator::Equal => "==",
            Comparator::GreaterThanOrEqual => ">=",
            Comparator::NotEqual => "!=",
            Comparator::LessThan => "<",
            Comparator::GreaterThan => ">",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Comparator> {
        Comparator::ALL.into_iter().find(|c| c.symbol() == symbol)
    }
}

impl std::fmt::Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[test]
fn test_symbol_lookup() {
    for comparator in Comparator::ALL {
        assert_eq!(Comparator::from_symbol(comparator.symbol()), Some(comparator));
    }
    assert_eq!(Comparator::from_symbol("="), None);
    assert_eq!(Comparator::from_symbol("<>"), None);
}
