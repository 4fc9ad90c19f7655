//! Numeric main menu.

use std::io::{self, Write};

const RULE_WIDTH: usize = 50;

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddBook,
    ListBooks,
    AddMember,
    ListMembers,
    Borrow,
    Return,
    Exit,
}

impl MenuChoice {
    /// Menu order as displayed; `Exit` is listed last but keyed `0`.
    pub const ALL: [MenuChoice; 7] = [
        Self::AddBook,
        Self::ListBooks,
        Self::AddMember,
        Self::ListMembers,
        Self::Borrow,
        Self::Return,
        Self::Exit,
    ];

    pub fn key(self) -> char {
        match self {
            Self::AddBook => '1',
            Self::ListBooks => '2',
            Self::AddMember => '3',
            Self::ListMembers => '4',
            Self::Borrow => '5',
            Self::Return => '6',
            Self::Exit => '0',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AddBook => "Add Books",
            Self::ListBooks => "List Books",
            Self::AddMember => "Add Members",
            Self::ListMembers => "List Members",
            Self::Borrow => "Borrow Books",
            Self::Return => "Return Books",
            Self::Exit => "Exit the Portal",
        }
    }

    /// Parses one line of user input; surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        let key = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::ALL.into_iter().find(|choice| choice.key() == key)
    }
}

/// Writes the banner and the numbered options.
pub fn render_menu(out: &mut impl Write) -> io::Result<()> {
    let heavy = "=".repeat(RULE_WIDTH);
    writeln!(out, "{heavy}")?;
    writeln!(out, "Library Management System")?;
    writeln!(out, "{heavy}")?;
    for choice in MenuChoice::ALL {
        writeln!(out, "{}. {}", choice.key(), choice.label())?;
    }
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::{render_menu, MenuChoice};

    #[test]
    fn parse_maps_digits_to_choices() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::AddBook));
        assert_eq!(MenuChoice::parse(" 6 \n"), Some(MenuChoice::Return));
        assert_eq!(MenuChoice::parse("0"), Some(MenuChoice::Exit));
    }

    #[test]
    fn parse_rejects_unknown_input() {
        for raw in ["", "7", "10", "add", "-1"] {
            assert_eq!(MenuChoice::parse(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn menu_lists_exit_last() {
        let mut out = Vec::new();
        render_menu(&mut out).expect("render menu");
        let text = String::from_utf8(out).expect("utf-8 menu");
        let exit_at = text.find("0. Exit the Portal").expect("exit entry");
        let return_at = text.find("6. Return Books").expect("return entry");
        assert!(return_at < exit_at);
    }
}
